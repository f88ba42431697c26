use super::{check_sigma, GaussianNoise, Sensor, SensorConfig, SensorKind, SensorMeasurement};
use crate::error::{GncError, GncResult};
use crate::state::unit_vector;
use nalgebra::Vector3;

#[derive(Debug, Clone, PartialEq)]
pub struct LidarInput {
    /// True distance to the surface [m].
    pub distance: f64,
    /// True surface normal, unit vector.
    pub surface_normal: Vector3<f64>,
}

/// Laser range finder with surface-normal estimation.
///
/// Output layout is `[range, nx, ny, nz]` with a unit-norm normal.
#[derive(Debug)]
pub struct Lidar {
    range_noise: f64,
    normal_noise: f64,
    max_range: f64,
    noise: GaussianNoise,
}

impl Lidar {
    pub fn new(config: &SensorConfig, noise: GaussianNoise) -> GncResult<Self> {
        if !(config.lidar_max_range.is_finite() && config.lidar_max_range > 0.0) {
            return Err(GncError::InvalidConfigValue {
                key: "lidar_max_range",
                value: config.lidar_max_range,
                reason: "maximum range must be positive",
            });
        }
        Ok(Self {
            range_noise: check_sigma("lidar range", config.lidar_range_noise)?,
            normal_noise: check_sigma("lidar normal", config.lidar_normal_noise)?,
            max_range: config.lidar_max_range,
            noise,
        })
    }

    pub fn max_range(&self) -> f64 {
        self.max_range
    }
}

impl Sensor for Lidar {
    type Input = LidarInput;

    fn kind(&self) -> SensorKind {
        SensorKind::Lidar
    }

    fn measure(&mut self, input: &LidarInput, timestamp: f64) -> GncResult<SensorMeasurement> {
        if !input.distance.is_finite() || input.distance < 0.0 || input.distance > self.max_range {
            return Ok(SensorMeasurement::invalid(SensorKind::Lidar, timestamp));
        }

        let range = input.distance + self.noise.sample(self.range_noise);
        let noisy_normal = input.surface_normal + self.noise.sample_vector3(self.normal_noise);
        let normal = unit_vector(&noisy_normal, "lidar surface normal")?;

        let mut data = Vec::with_capacity(4);
        data.push(range);
        data.extend(normal.iter().copied());

        Ok(SensorMeasurement::valid(
            SensorKind::Lidar,
            data,
            vec![self.range_noise, self.normal_noise, self.normal_noise, self.normal_noise],
            timestamp,
        ))
    }
}
