//! Stochastic sensor models.
//!
//! Each model maps a true physical quantity to a noisy measurement. Physical
//! visibility limits (field of view, maximum range) produce an invalid
//! measurement, never an error; errors are reserved for numerical faults such
//! as normalizing a zero-length vector.

pub mod camera;
pub mod imu;
pub mod lidar;
pub mod star_tracker;
pub mod suite;
pub mod sun_sensor;

pub use camera::OpticalCamera;
pub use imu::{Imu, ImuInput};
pub use lidar::{Lidar, LidarInput};
pub use star_tracker::StarTracker;
pub use suite::{Measurements, SensorSuite, TrueState};
pub use sun_sensor::SunSensor;

use crate::error::{GncError, GncResult};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Imu,
    StarTracker,
    SunSensor,
    OpticalCamera,
    Lidar,
}

impl SensorKind {
    pub const ALL: [SensorKind; 5] = [
        SensorKind::Imu,
        SensorKind::StarTracker,
        SensorKind::SunSensor,
        SensorKind::OpticalCamera,
        SensorKind::Lidar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SensorKind::Imu => "imu",
            SensorKind::StarTracker => "star_tracker",
            SensorKind::SunSensor => "sun_sensor",
            SensorKind::OpticalCamera => "optical_camera",
            SensorKind::Lidar => "lidar",
        }
    }

    /// Width of the data vector this sensor produces.
    pub fn data_width(self) -> usize {
        match self {
            SensorKind::Imu => 6,
            SensorKind::StarTracker | SensorKind::Lidar => 4,
            SensorKind::SunSensor | SensorKind::OpticalCamera => 3,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sensor reading. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorMeasurement {
    pub kind: SensorKind,
    pub data: Vec<f64>,
    pub timestamp: f64,
    pub valid: bool,
    /// Per-component standard deviation, same width as `data` when present.
    pub uncertainty: Option<Vec<f64>>,
}

impl SensorMeasurement {
    pub fn valid(kind: SensorKind, data: Vec<f64>, uncertainty: Vec<f64>, timestamp: f64) -> Self {
        debug_assert_eq!(
            data.len(),
            uncertainty.len(),
            "{} uncertainty width must match data width",
            kind
        );
        Self {
            kind,
            data,
            timestamp,
            valid: true,
            uncertainty: Some(uncertainty),
        }
    }

    /// Zero-filled placeholder for a target outside the sensor's envelope.
    pub fn invalid(kind: SensorKind, timestamp: f64) -> Self {
        Self {
            kind,
            data: vec![0.0; kind.data_width()],
            timestamp,
            valid: false,
            uncertainty: None,
        }
    }
}

/// Common shape of every sensor model.
pub trait Sensor {
    type Input;

    fn kind(&self) -> SensorKind;
    fn measure(&mut self, input: &Self::Input, timestamp: f64) -> GncResult<SensorMeasurement>;
}

/// Zero-mean Gaussian noise source with its own random stream.
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    rng: StdRng,
}

impl GaussianNoise {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn sample(&mut self, sigma: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        z * sigma
    }

    pub fn sample_vector3(&mut self, sigma: f64) -> Vector3<f64> {
        Vector3::new(self.sample(sigma), self.sample(sigma), self.sample(sigma))
    }
}

/// Noise and geometry parameters for the whole suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub imu_accel_noise: f64,
    pub imu_gyro_noise: f64,
    pub imu_accel_bias: Vector3<f64>,
    pub imu_gyro_bias: Vector3<f64>,
    pub star_tracker_noise: f64,
    pub sun_sensor_noise: f64,
    /// Full cone angle in radians.
    pub sun_sensor_fov: f64,
    pub camera_focal_length: f64,
    pub camera_pixel_size: f64,
    pub camera_resolution: (u32, u32),
    pub lidar_range_noise: f64,
    pub lidar_normal_noise: f64,
    pub lidar_max_range: f64,
    /// Fixed seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            imu_accel_noise: 1e-4,
            imu_gyro_noise: 1e-6,
            imu_accel_bias: Vector3::zeros(),
            imu_gyro_bias: Vector3::zeros(),
            star_tracker_noise: 0.001_f64.to_radians(),
            sun_sensor_noise: 0.5_f64.to_radians(),
            sun_sensor_fov: 120.0_f64.to_radians(),
            camera_focal_length: 0.1,
            camera_pixel_size: 5e-6,
            camera_resolution: (1024, 1024),
            lidar_range_noise: 0.1,
            lidar_normal_noise: 1.0_f64.to_radians(),
            lidar_max_range: 5000.0,
            seed: None,
        }
    }
}

pub(crate) fn check_sigma(sensor: &'static str, sigma: f64) -> GncResult<f64> {
    if sigma.is_finite() && sigma >= 0.0 {
        Ok(sigma)
    } else {
        Err(GncError::InvalidNoise { sensor, sigma })
    }
}

/// Angle between a unit vector and the body +Z boresight.
pub fn boresight_angle(unit: &Vector3<f64>) -> f64 {
    unit.z.clamp(-1.0, 1.0).acos()
}

/// Perturb a unit direction in azimuth/elevation and rebuild the unit vector.
pub(crate) fn perturb_direction(unit: &Vector3<f64>, noise: &mut GaussianNoise, sigma: f64) -> Vector3<f64> {
    let azimuth = unit.y.atan2(unit.x) + noise.sample(sigma);
    let elevation = unit.z.clamp(-1.0, 1.0).asin() + noise.sample(sigma);

    Vector3::new(
        elevation.cos() * azimuth.cos(),
        elevation.cos() * azimuth.sin(),
        elevation.sin(),
    )
}
