//! Minimal stage implementations for demos and closed-loop tests.
//!
//! These are deliberately simple: dead reckoning with star-tracker attitude,
//! a guidance law that holds the target point, a saturated PD controller and
//! a point-mass truth model to close the loop. Mission estimators and
//! guidance laws plug in through the same traits.

use crate::error::{GncError, GncResult};
use crate::mode::GncMode;
use crate::sensors::{Measurements, SensorKind, TrueState};
use crate::stages::{Actuator, ControlStage, GuidanceStage, NavigationStage};
use crate::state::{unit_quaternion, GncCommand, GncState};
use nalgebra::{Vector3, Vector4};
use tracing::{debug, trace};

/// Propagates position and velocity over a fixed step using IMU specific
/// force, and takes attitude and rate straight from the star tracker and gyros.
#[derive(Debug, Clone)]
pub struct DeadReckoningNavigation {
    step: f64,
}

impl DeadReckoningNavigation {
    pub fn new(step: f64) -> GncResult<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(GncError::InvalidTimeStep(step));
        }
        Ok(Self { step })
    }
}

impl NavigationStage for DeadReckoningNavigation {
    fn update(&mut self, measurements: &Measurements, previous: &GncState) -> GncResult<GncState> {
        let mut estimate = previous.clone();

        if let Some(imu) = measurements.valid(SensorKind::Imu) {
            if imu.data.len() < 6 {
                return Err(GncError::stage("navigation", "truncated IMU sample"));
            }
            let accel = Vector3::new(imu.data[0], imu.data[1], imu.data[2]);
            estimate.position += previous.velocity * self.step + accel * (0.5 * self.step * self.step);
            estimate.velocity += accel * self.step;
            estimate.angular_rate = Vector3::new(imu.data[3], imu.data[4], imu.data[5]);
            estimate.timestamp = imu.timestamp;
        } else {
            estimate.position += previous.velocity * self.step;
            estimate.timestamp = previous.timestamp + self.step;
        }

        if let Some(star_tracker) = measurements.valid(SensorKind::StarTracker) {
            if let &[w, x, y, z] = star_tracker.data.as_slice() {
                estimate.attitude = unit_quaternion(&Vector4::new(w, x, y, z), "navigation attitude")?;
            }
        }

        trace!(
            range = estimate.range(),
            speed = estimate.speed(),
            "dead reckoning update"
        );
        Ok(estimate)
    }
}

/// Desired state is the target itself, stamped with the current time.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldTargetGuidance;

impl GuidanceStage for HoldTargetGuidance {
    fn compute_command(
        &mut self,
        current: &GncState,
        target: &GncState,
        _mode: GncMode,
    ) -> GncResult<GncState> {
        Ok(GncState {
            timestamp: current.timestamp,
            ..target.clone()
        })
    }
}

/// Speed-limited translation control with rate damping.
///
/// The position error sets a velocity command, capped at `max_speed`, which
/// is tracked proportionally. Thrust is saturated at `max_thrust`; in `safe`
/// mode no thrust is commanded.
#[derive(Debug, Clone)]
pub struct PdController {
    /// Velocity command per metre of position error [1/s].
    pub position_gain: f64,
    /// Thrust per unit velocity error [N s/m].
    pub velocity_gain: f64,
    pub rate_gain: f64,
    pub max_speed: f64,
    pub max_thrust: f64,
}

impl Default for PdController {
    fn default() -> Self {
        Self {
            position_gain: 0.01,
            velocity_gain: 50.0,
            rate_gain: 0.5,
            max_speed: 0.2,
            max_thrust: 2.0,
        }
    }
}

impl ControlStage for PdController {
    fn compute_command(
        &mut self,
        current: &GncState,
        desired: &GncState,
        mode: GncMode,
    ) -> GncResult<GncCommand> {
        let mut command = GncCommand::zero(current.timestamp);
        command.torque = -current.angular_rate * self.rate_gain;

        if mode == GncMode::Safe {
            return Ok(command);
        }

        let closing = clamp_norm(
            (desired.position - current.position) * self.position_gain,
            self.max_speed,
        );
        let velocity_command = desired.velocity + closing;
        let thrust = (velocity_command - current.velocity) * self.velocity_gain;
        command.thrust = clamp_norm(thrust, self.max_thrust);

        Ok(command)
    }
}

fn clamp_norm(v: Vector3<f64>, limit: f64) -> Vector3<f64> {
    let norm = v.norm();
    if norm > limit {
        v * (limit / norm)
    } else {
        v
    }
}

/// Actuator that records every command it receives.
#[derive(Debug, Default)]
pub struct RecordingActuator {
    applied: Vec<GncCommand>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> &[GncCommand] {
        &self.applied
    }

    pub fn total_impulse(&self, dt: f64) -> f64 {
        self.applied.iter().map(|c| c.thrust_magnitude() * dt).sum()
    }
}

impl Actuator for RecordingActuator {
    fn apply(&mut self, command: &GncCommand) -> GncResult<()> {
        debug!(
            thrust_n = command.thrust_magnitude(),
            timestamp = command.timestamp,
            "actuator command applied"
        );
        self.applied.push(command.clone());
        Ok(())
    }
}

/// Point-mass truth model in the target frame.
///
/// Thrust accelerates the spacecraft; torque and attitude dynamics are not
/// modelled. Camera and LIDAR inputs are derived from the propagated position.
#[derive(Debug, Clone)]
pub struct PointMassTruth {
    state: TrueState,
    mass: f64,
    time: f64,
}

impl PointMassTruth {
    pub fn new(state: TrueState, mass: f64) -> GncResult<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(GncError::stage("truth", format!("invalid spacecraft mass {mass}")));
        }
        let mut truth = Self {
            state,
            mass,
            time: 0.0,
        };
        truth.refresh_geometry();
        Ok(truth)
    }

    pub fn true_state(&self) -> &TrueState {
        &self.state
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Estimate seeded from truth, for starting a run.
    pub fn initial_estimate(&self) -> GncState {
        GncState::new(
            self.state.position,
            self.state.velocity,
            self.state.attitude,
            self.state.angular_rate,
            self.time,
        )
    }

    pub fn step(&mut self, command: &GncCommand, dt: f64) -> GncResult<()> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(GncError::InvalidTimeStep(dt));
        }

        let accel = command.thrust / self.mass;
        self.state.position += self.state.velocity * dt + accel * (0.5 * dt * dt);
        self.state.velocity += accel * dt;
        self.state.acceleration = accel;
        self.time += dt;
        self.refresh_geometry();
        Ok(())
    }

    fn refresh_geometry(&mut self) {
        let range = self.state.position.norm();
        self.state.target_distance = Some(range);
        // Target seen straight down the boresight.
        self.state.target_position_body = Some(Vector3::new(0.0, 0.0, range.max(1.0)));
        if self.state.surface_normal.is_none() {
            self.state.surface_normal = Some(Vector3::z());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorMeasurement;

    #[test]
    fn test_controller_saturates_thrust() {
        let mut controller = PdController::default();
        let current = GncState {
            position: Vector3::new(1000.0, 0.0, 0.0),
            ..GncState::default()
        };
        let command = controller
            .compute_command(&current, &GncState::default(), GncMode::Approach)
            .unwrap();
        assert!((command.thrust_magnitude() - controller.max_thrust).abs() < 1e-12);
        assert!(command.thrust.x < 0.0);
    }

    #[test]
    fn test_controller_holds_thrust_in_safe_mode() {
        let mut controller = PdController::default();
        let current = GncState {
            position: Vector3::new(100.0, 0.0, 0.0),
            ..GncState::default()
        };
        let command = controller
            .compute_command(&current, &GncState::default(), GncMode::Safe)
            .unwrap();
        assert_eq!(command.thrust, Vector3::zeros());
    }

    #[test]
    fn test_dead_reckoning_without_imu_coasts() {
        let mut navigation = DeadReckoningNavigation::new(0.5).unwrap();
        let previous = GncState {
            velocity: Vector3::new(1.0, 0.0, 0.0),
            ..GncState::default()
        };
        let estimate = navigation.update(&Measurements::new(), &previous).unwrap();
        assert!((estimate.position.x - 0.5).abs() < 1e-12);
        assert!((estimate.timestamp - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_dead_reckoning_skips_invalid_entries() {
        let mut navigation = DeadReckoningNavigation::new(0.1).unwrap();
        let mut measurements = Measurements::new();
        measurements.insert(SensorMeasurement::invalid(SensorKind::StarTracker, 0.1));
        let estimate = navigation.update(&measurements, &GncState::default()).unwrap();
        assert_eq!(estimate.attitude, GncState::default().attitude);
    }

    #[test]
    fn test_truth_accelerates_along_thrust() {
        let mut truth = PointMassTruth::new(TrueState::default(), 100.0).unwrap();
        let mut command = GncCommand::zero(0.0);
        command.thrust = Vector3::new(10.0, 0.0, 0.0);
        truth.step(&command, 1.0).unwrap();
        assert!((truth.true_state().velocity.x - 0.1).abs() < 1e-12);
        assert!((truth.true_state().position.x - 0.05).abs() < 1e-12);
        assert_eq!(truth.true_state().target_distance, Some(truth.true_state().position.norm()));
    }

    #[test]
    fn test_zero_step_is_rejected() {
        assert!(DeadReckoningNavigation::new(0.0).is_err());
    }
}
