use super::{check_sigma, GaussianNoise, Sensor, SensorConfig, SensorKind, SensorMeasurement};
use crate::error::GncResult;
use crate::state::unit_quaternion;
use nalgebra::Vector4;

pub const STAR_TRACKER_UPDATE_RATE_HZ: f64 = 5.0;

/// Absolute three-axis attitude from star-field matching.
///
/// Noise is added independently to each quaternion component and the result is
/// re-normalized. This is a simplification rather than a rotation-manifold
/// noise model; the reported uncertainty is the raw per-component sigma.
#[derive(Debug)]
pub struct StarTracker {
    noise_attitude: f64,
    update_rate_hz: f64,
    noise: GaussianNoise,
}

impl StarTracker {
    pub fn new(config: &SensorConfig, noise: GaussianNoise) -> GncResult<Self> {
        Ok(Self {
            noise_attitude: check_sigma("star tracker", config.star_tracker_noise)?,
            update_rate_hz: STAR_TRACKER_UPDATE_RATE_HZ,
            noise,
        })
    }

    pub fn update_rate_hz(&self) -> f64 {
        self.update_rate_hz
    }
}

impl Sensor for StarTracker {
    type Input = Vector4<f64>;

    fn kind(&self) -> SensorKind {
        SensorKind::StarTracker
    }

    fn measure(&mut self, attitude: &Vector4<f64>, timestamp: f64) -> GncResult<SensorMeasurement> {
        let sigma = self.noise_attitude;
        let noisy = attitude
            + Vector4::new(
                self.noise.sample(sigma),
                self.noise.sample(sigma),
                self.noise.sample(sigma),
                self.noise.sample(sigma),
            );
        let measured = unit_quaternion(&noisy, "star tracker attitude")?;

        Ok(SensorMeasurement::valid(
            SensorKind::StarTracker,
            measured.iter().copied().collect(),
            vec![sigma; 4],
            timestamp,
        ))
    }
}
