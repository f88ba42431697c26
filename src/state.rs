use crate::error::{GncError, GncResult};
use nalgebra::{Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// Norms below this are treated as zero-length before normalization.
pub const NORMALIZATION_EPSILON: f64 = 1e-12;

/// Full spacecraft state estimate.
///
/// Position and velocity are expressed in the target-centred LVLH frame.
/// The attitude quaternion is scalar-first and is expected to be unit-norm
/// between updates; raw arithmetic on it does not re-normalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GncState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub attitude: Vector4<f64>,
    pub angular_rate: Vector3<f64>,
    pub timestamp: f64,
}

impl Default for GncState {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            attitude: Vector4::new(1.0, 0.0, 0.0, 0.0),
            angular_rate: Vector3::zeros(),
            timestamp: 0.0,
        }
    }
}

impl GncState {
    pub fn new(
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        attitude: Vector4<f64>,
        angular_rate: Vector3<f64>,
        timestamp: f64,
    ) -> Self {
        Self {
            position,
            velocity,
            attitude,
            angular_rate,
            timestamp,
        }
    }

    /// Distance from the target (the LVLH origin).
    pub fn range(&self) -> f64 {
        self.position.norm()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.velocity.iter().all(|v| v.is_finite())
            && self.attitude.iter().all(|v| v.is_finite())
            && self.angular_rate.iter().all(|v| v.is_finite())
            && self.timestamp.is_finite()
    }

    /// Tracking errors against `desired`: (position, velocity, attitude).
    ///
    /// Attitude error is the Euclidean norm of the raw quaternion difference.
    pub fn tracking_errors(&self, desired: &GncState) -> (f64, f64, f64) {
        (
            (self.position - desired.position).norm(),
            (self.velocity - desired.velocity).norm(),
            (self.attitude - desired.attitude).norm(),
        )
    }
}

/// Actuator command for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GncCommand {
    pub thrust: Vector3<f64>,
    pub torque: Vector3<f64>,
    pub wheel_speeds: Vector4<f64>,
    pub timestamp: f64,
}

impl Default for GncCommand {
    fn default() -> Self {
        Self::zero(0.0)
    }
}

impl GncCommand {
    pub fn zero(timestamp: f64) -> Self {
        Self {
            thrust: Vector3::zeros(),
            torque: Vector3::zeros(),
            wheel_speeds: Vector4::zeros(),
            timestamp,
        }
    }

    pub fn thrust_magnitude(&self) -> f64 {
        self.thrust.norm()
    }

    pub fn is_zero(&self) -> bool {
        self.thrust.iter().all(|v| *v == 0.0)
            && self.torque.iter().all(|v| *v == 0.0)
            && self.wheel_speeds.iter().all(|v| *v == 0.0)
    }
}

pub fn unit_vector(v: &Vector3<f64>, context: &'static str) -> GncResult<Vector3<f64>> {
    let norm = v.norm();
    if !norm.is_finite() || norm < NORMALIZATION_EPSILON {
        return Err(GncError::DegenerateVector { context });
    }
    Ok(v / norm)
}

pub fn unit_quaternion(q: &Vector4<f64>, context: &'static str) -> GncResult<Vector4<f64>> {
    let norm = q.norm();
    if !norm.is_finite() || norm < NORMALIZATION_EPSILON {
        return Err(GncError::DegenerateVector { context });
    }
    Ok(q / norm)
}
