use super::{
    boresight_angle, check_sigma, perturb_direction, GaussianNoise, Sensor, SensorConfig,
    SensorKind, SensorMeasurement,
};
use crate::error::{GncError, GncResult};
use crate::state::unit_vector;
use nalgebra::Vector3;

/// Coarse sun direction in the body frame, boresight along +Z.
#[derive(Debug)]
pub struct SunSensor {
    noise_angle: f64,
    fov: f64,
    noise: GaussianNoise,
}

impl SunSensor {
    pub fn new(config: &SensorConfig, noise: GaussianNoise) -> GncResult<Self> {
        if !(config.sun_sensor_fov.is_finite() && config.sun_sensor_fov > 0.0) {
            return Err(GncError::InvalidConfigValue {
                key: "sun_sensor_fov",
                value: config.sun_sensor_fov,
                reason: "field of view must be positive",
            });
        }
        Ok(Self {
            noise_angle: check_sigma("sun sensor", config.sun_sensor_noise)?,
            fov: config.sun_sensor_fov,
            noise,
        })
    }

    /// Full field-of-view cone angle [rad].
    pub fn fov(&self) -> f64 {
        self.fov
    }

    /// True when `direction` is strictly inside the half-angle cone.
    pub fn in_view(&self, direction: &Vector3<f64>) -> GncResult<bool> {
        let unit = unit_vector(direction, "sun direction")?;
        Ok(boresight_angle(&unit) < self.fov / 2.0)
    }
}

impl Sensor for SunSensor {
    type Input = Vector3<f64>;

    fn kind(&self) -> SensorKind {
        SensorKind::SunSensor
    }

    fn measure(&mut self, sun_direction: &Vector3<f64>, timestamp: f64) -> GncResult<SensorMeasurement> {
        let unit = unit_vector(sun_direction, "sun direction")?;
        if boresight_angle(&unit) >= self.fov / 2.0 {
            return Ok(SensorMeasurement::invalid(SensorKind::SunSensor, timestamp));
        }

        let measured = perturb_direction(&unit, &mut self.noise, self.noise_angle);

        Ok(SensorMeasurement::valid(
            SensorKind::SunSensor,
            measured.iter().copied().collect(),
            vec![self.noise_angle; 3],
            timestamp,
        ))
    }
}
