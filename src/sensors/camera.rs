use super::{
    boresight_angle, perturb_direction, GaussianNoise, Sensor, SensorConfig, SensorKind,
    SensorMeasurement,
};
use crate::error::{GncError, GncResult};
use crate::state::unit_vector;
use nalgebra::Vector3;

/// Optical navigation camera producing a line-of-sight unit vector.
///
/// The camera looks along body +Z. Angular noise is one pixel,
/// `pixel_size / focal_length`, applied to azimuth and elevation.
#[derive(Debug)]
pub struct OpticalCamera {
    focal_length: f64,
    pixel_size: f64,
    resolution: (u32, u32),
    fov: f64,
    noise: GaussianNoise,
}

impl OpticalCamera {
    pub fn new(config: &SensorConfig, noise: GaussianNoise) -> GncResult<Self> {
        let focal_length = config.camera_focal_length;
        let pixel_size = config.camera_pixel_size;

        if !(focal_length.is_finite() && focal_length > 0.0) {
            return Err(GncError::InvalidConfigValue {
                key: "camera_focal_length",
                value: focal_length,
                reason: "focal length must be positive",
            });
        }
        if !(pixel_size.is_finite() && pixel_size > 0.0) {
            return Err(GncError::InvalidConfigValue {
                key: "camera_pixel_size",
                value: pixel_size,
                reason: "pixel size must be positive",
            });
        }

        let resolution = config.camera_resolution;
        let fov = 2.0 * (f64::from(resolution.0) * pixel_size / (2.0 * focal_length)).atan();

        Ok(Self {
            focal_length,
            pixel_size,
            resolution,
            fov,
            noise,
        })
    }

    /// Full horizontal field of view [rad].
    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    /// One-pixel angular noise [rad].
    pub fn angular_noise(&self) -> f64 {
        self.pixel_size / self.focal_length
    }

    /// Strictly inside the half field of view.
    pub fn in_view(&self, target_position: &Vector3<f64>) -> GncResult<bool> {
        let line_of_sight = unit_vector(target_position, "camera line of sight")?;
        Ok(boresight_angle(&line_of_sight) < self.fov / 2.0)
    }
}

impl Sensor for OpticalCamera {
    type Input = Vector3<f64>;

    fn kind(&self) -> SensorKind {
        SensorKind::OpticalCamera
    }

    fn measure(&mut self, target_position: &Vector3<f64>, timestamp: f64) -> GncResult<SensorMeasurement> {
        if !self.in_view(target_position)? {
            return Ok(SensorMeasurement::invalid(SensorKind::OpticalCamera, timestamp));
        }
        let line_of_sight = unit_vector(target_position, "camera line of sight")?;

        let sigma = self.angular_noise();
        let measured = perturb_direction(&line_of_sight, &mut self.noise, sigma);

        Ok(SensorMeasurement::valid(
            SensorKind::OpticalCamera,
            measured.iter().copied().collect(),
            vec![sigma; 3],
            timestamp,
        ))
    }
}
