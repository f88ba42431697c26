use super::{
    GaussianNoise, Imu, ImuInput, Lidar, LidarInput, OpticalCamera, Sensor, SensorConfig,
    SensorKind, SensorMeasurement, StarTracker, SunSensor,
};
use crate::error::GncResult;
use nalgebra::{Vector3, Vector4};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// True physical state handed to the sensor models.
///
/// Optional inputs model instruments that are not always applicable; a
/// sensor whose input is absent is skipped for the cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrueState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub acceleration: Vector3<f64>,
    pub attitude: Vector4<f64>,
    pub angular_rate: Vector3<f64>,
    pub sun_direction: Option<Vector3<f64>>,
    pub target_position_body: Option<Vector3<f64>>,
    pub target_distance: Option<f64>,
    pub surface_normal: Option<Vector3<f64>>,
}

impl Default for TrueState {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            attitude: Vector4::new(1.0, 0.0, 0.0, 0.0),
            angular_rate: Vector3::zeros(),
            sun_direction: None,
            target_position_body: None,
            target_distance: None,
            surface_normal: None,
        }
    }
}

/// Measurement set for one cycle, keyed by sensor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    entries: BTreeMap<SensorKind, SensorMeasurement>,
}

impl Measurements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, measurement: SensorMeasurement) {
        self.entries.insert(measurement.kind, measurement);
    }

    pub fn get(&self, kind: SensorKind) -> Option<&SensorMeasurement> {
        self.entries.get(&kind)
    }

    /// Entry for `kind` only if present and valid.
    pub fn valid(&self, kind: SensorKind) -> Option<&SensorMeasurement> {
        self.get(kind).filter(|m| m.valid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorMeasurement> {
        self.entries.values()
    }

    pub fn valid_count(&self) -> usize {
        self.entries.values().filter(|m| m.valid).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, kind: SensorKind) -> bool {
        self.entries.contains_key(&kind)
    }
}

/// The five GNC sensors behind one measurement request.
#[derive(Debug)]
pub struct SensorSuite {
    pub imu: Imu,
    pub star_tracker: StarTracker,
    pub sun_sensor: SunSensor,
    pub optical_camera: OpticalCamera,
    pub lidar: Lidar,
    last_measurements: Measurements,
}

impl SensorSuite {
    /// Build the suite; each sensor gets an independent noise stream derived
    /// from `config.seed` when one is set.
    pub fn new(config: &SensorConfig) -> GncResult<Self> {
        let stream = |index: u64| match config.seed {
            Some(seed) => GaussianNoise::from_seed(seed.wrapping_add(index)),
            None => GaussianNoise::from_entropy(),
        };

        Ok(Self {
            imu: Imu::new(config, stream(0))?,
            star_tracker: StarTracker::new(config, stream(1))?,
            sun_sensor: SunSensor::new(config, stream(2))?,
            optical_camera: OpticalCamera::new(config, stream(3))?,
            lidar: Lidar::new(config, stream(4))?,
            last_measurements: Measurements::new(),
        })
    }

    pub fn with_seed(seed: u64) -> GncResult<Self> {
        Self::new(&SensorConfig {
            seed: Some(seed),
            ..SensorConfig::default()
        })
    }

    /// Sample every applicable sensor once.
    ///
    /// IMU and star tracker always report; sun sensor, camera and LIDAR only
    /// when their true-state input is present. The set is retained for
    /// diagnostics.
    pub fn get_all_measurements(&mut self, state: &TrueState, timestamp: f64) -> GncResult<&Measurements> {
        let mut measurements = Measurements::new();

        measurements.insert(self.imu.measure(
            &ImuInput {
                specific_force: state.acceleration,
                angular_rate: state.angular_rate,
            },
            timestamp,
        )?);

        measurements.insert(self.star_tracker.measure(&state.attitude, timestamp)?);

        if let Some(sun_direction) = &state.sun_direction {
            measurements.insert(self.sun_sensor.measure(sun_direction, timestamp)?);
        }

        if let Some(target) = &state.target_position_body {
            measurements.insert(self.optical_camera.measure(target, timestamp)?);
        }

        if let Some(distance) = state.target_distance {
            let input = LidarInput {
                distance,
                surface_normal: state.surface_normal.unwrap_or_else(Vector3::z),
            };
            measurements.insert(self.lidar.measure(&input, timestamp)?);
        }

        debug!(
            timestamp,
            total = measurements.len(),
            valid = measurements.valid_count(),
            "sensor suite sampled"
        );

        self.last_measurements = measurements;
        Ok(&self.last_measurements)
    }

    pub fn last_measurements(&self) -> &Measurements {
        &self.last_measurements
    }

    pub fn sensor_kinds(&self) -> [SensorKind; 5] {
        [
            self.imu.kind(),
            self.star_tracker.kind(),
            self.sun_sensor.kind(),
            self.optical_camera.kind(),
            self.lidar.kind(),
        ]
    }
}
