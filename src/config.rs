//! GNC configuration surface.
//!
//! A flat set of named numeric parameters with mission defaults. Unknown keys
//! and out-of-range values are rejected at load time; the only other writers
//! are [`GncConfig::set`] and mode-entry side effects in the orchestrator.

use crate::error::{GncError, GncResult};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const PROXIMITY_MAX_APPROACH_VELOCITY: f64 = 0.3;
pub const DESCENT_MAX_APPROACH_VELOCITY: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKey {
    RdvArrivalPosition,
    RdvPositionTolerance,
    RdvVelocityTolerance,
    TagLandingAccuracy,
    TagAttitudeTolerance,
    TagVerticalVelocity,
    TagHorizontalVelocity,
    ControlFrequency,
    NavigationFrequency,
    GuidanceFrequency,
    MinSafeDistance,
    MaxApproachVelocity,
    AbortAltitude,
    AttitudeAccuracy,
    PositionAccuracy,
    VelocityAccuracy,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 16] = [
        ConfigKey::RdvArrivalPosition,
        ConfigKey::RdvPositionTolerance,
        ConfigKey::RdvVelocityTolerance,
        ConfigKey::TagLandingAccuracy,
        ConfigKey::TagAttitudeTolerance,
        ConfigKey::TagVerticalVelocity,
        ConfigKey::TagHorizontalVelocity,
        ConfigKey::ControlFrequency,
        ConfigKey::NavigationFrequency,
        ConfigKey::GuidanceFrequency,
        ConfigKey::MinSafeDistance,
        ConfigKey::MaxApproachVelocity,
        ConfigKey::AbortAltitude,
        ConfigKey::AttitudeAccuracy,
        ConfigKey::PositionAccuracy,
        ConfigKey::VelocityAccuracy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::RdvArrivalPosition => "rdv_arrival_position",
            ConfigKey::RdvPositionTolerance => "rdv_position_tolerance",
            ConfigKey::RdvVelocityTolerance => "rdv_velocity_tolerance",
            ConfigKey::TagLandingAccuracy => "tag_landing_accuracy",
            ConfigKey::TagAttitudeTolerance => "tag_attitude_tolerance",
            ConfigKey::TagVerticalVelocity => "tag_vertical_velocity",
            ConfigKey::TagHorizontalVelocity => "tag_horizontal_velocity",
            ConfigKey::ControlFrequency => "control_frequency",
            ConfigKey::NavigationFrequency => "navigation_frequency",
            ConfigKey::GuidanceFrequency => "guidance_frequency",
            ConfigKey::MinSafeDistance => "min_safe_distance",
            ConfigKey::MaxApproachVelocity => "max_approach_velocity",
            ConfigKey::AbortAltitude => "abort_altitude",
            ConfigKey::AttitudeAccuracy => "attitude_accuracy",
            ConfigKey::PositionAccuracy => "position_accuracy",
            ConfigKey::VelocityAccuracy => "velocity_accuracy",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            ConfigKey::RdvArrivalPosition | ConfigKey::RdvPositionTolerance => "km",
            ConfigKey::TagLandingAccuracy
            | ConfigKey::MinSafeDistance
            | ConfigKey::AbortAltitude
            | ConfigKey::PositionAccuracy => "m",
            ConfigKey::RdvVelocityTolerance
            | ConfigKey::TagVerticalVelocity
            | ConfigKey::TagHorizontalVelocity
            | ConfigKey::MaxApproachVelocity
            | ConfigKey::VelocityAccuracy => "m/s",
            ConfigKey::TagAttitudeTolerance | ConfigKey::AttitudeAccuracy => "deg",
            ConfigKey::ControlFrequency
            | ConfigKey::NavigationFrequency
            | ConfigKey::GuidanceFrequency => "Hz",
        }
    }

    pub fn is_vector(self) -> bool {
        matches!(self, ConfigKey::RdvArrivalPosition)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = GncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| GncError::UnknownConfigKey(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GncConfig {
    // Mission parameters
    pub rdv_arrival_position: Vector3<f64>,
    pub rdv_position_tolerance: f64,
    pub rdv_velocity_tolerance: f64,
    pub tag_landing_accuracy: f64,
    pub tag_attitude_tolerance: f64,
    pub tag_vertical_velocity: f64,
    pub tag_horizontal_velocity: f64,

    // Loop rates
    pub control_frequency: f64,
    pub navigation_frequency: f64,
    pub guidance_frequency: f64,

    // Safety envelope
    pub min_safe_distance: f64,
    pub max_approach_velocity: f64,
    pub abort_altitude: f64,

    // Performance requirements (3-sigma)
    pub attitude_accuracy: f64,
    pub position_accuracy: f64,
    pub velocity_accuracy: f64,
}

impl Default for GncConfig {
    fn default() -> Self {
        Self {
            rdv_arrival_position: Vector3::new(20.0, 0.0, 0.0),
            rdv_position_tolerance: 2.4,
            rdv_velocity_tolerance: 0.12,
            tag_landing_accuracy: 25.0,
            tag_attitude_tolerance: 10.0,
            tag_vertical_velocity: 0.10,
            tag_horizontal_velocity: 0.05,

            control_frequency: 10.0,
            navigation_frequency: 5.0,
            guidance_frequency: 1.0,

            min_safe_distance: 50.0,
            max_approach_velocity: 0.5,
            abort_altitude: 100.0,

            attitude_accuracy: 0.1,
            position_accuracy: 25.0,
            velocity_accuracy: 0.025,
        }
    }
}

impl GncConfig {
    /// Parse a JSON object of overrides on top of the defaults.
    ///
    /// Every key must name a known parameter; the result is validated before
    /// it is returned.
    pub fn from_json_str(json: &str) -> GncResult<Self> {
        let overrides: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        for key in overrides.keys() {
            key.parse::<ConfigKey>()?;
        }

        let config: GncConfig = serde_json::from_value(serde_json::Value::Object(overrides))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> GncResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_pretty(&self) -> GncResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> GncResult<()> {
        if !self.rdv_arrival_position.iter().all(|v| v.is_finite()) {
            return Err(GncError::InvalidConfigValue {
                key: ConfigKey::RdvArrivalPosition.as_str(),
                value: f64::NAN,
                reason: "components must be finite",
            });
        }

        for key in ConfigKey::ALL.iter().copied().filter(|key| !key.is_vector()) {
            if let Some(value) = self.get(key) {
                check_value(key, value)?;
            }
        }

        Ok(())
    }

    /// Scalar value of `key`; `None` for the vector-valued arrival position.
    pub fn get(&self, key: ConfigKey) -> Option<f64> {
        let value = match key {
            ConfigKey::RdvArrivalPosition => return None,
            ConfigKey::RdvPositionTolerance => self.rdv_position_tolerance,
            ConfigKey::RdvVelocityTolerance => self.rdv_velocity_tolerance,
            ConfigKey::TagLandingAccuracy => self.tag_landing_accuracy,
            ConfigKey::TagAttitudeTolerance => self.tag_attitude_tolerance,
            ConfigKey::TagVerticalVelocity => self.tag_vertical_velocity,
            ConfigKey::TagHorizontalVelocity => self.tag_horizontal_velocity,
            ConfigKey::ControlFrequency => self.control_frequency,
            ConfigKey::NavigationFrequency => self.navigation_frequency,
            ConfigKey::GuidanceFrequency => self.guidance_frequency,
            ConfigKey::MinSafeDistance => self.min_safe_distance,
            ConfigKey::MaxApproachVelocity => self.max_approach_velocity,
            ConfigKey::AbortAltitude => self.abort_altitude,
            ConfigKey::AttitudeAccuracy => self.attitude_accuracy,
            ConfigKey::PositionAccuracy => self.position_accuracy,
            ConfigKey::VelocityAccuracy => self.velocity_accuracy,
        };
        Some(value)
    }

    /// Validated reconfiguration of a single scalar parameter.
    pub fn set(&mut self, key: ConfigKey, value: f64) -> GncResult<()> {
        check_value(key, value)?;

        let slot = match key {
            ConfigKey::RdvArrivalPosition => {
                return Err(GncError::InvalidConfigValue {
                    key: key.as_str(),
                    value,
                    reason: "vector-valued key, use set_arrival_position",
                })
            }
            ConfigKey::RdvPositionTolerance => &mut self.rdv_position_tolerance,
            ConfigKey::RdvVelocityTolerance => &mut self.rdv_velocity_tolerance,
            ConfigKey::TagLandingAccuracy => &mut self.tag_landing_accuracy,
            ConfigKey::TagAttitudeTolerance => &mut self.tag_attitude_tolerance,
            ConfigKey::TagVerticalVelocity => &mut self.tag_vertical_velocity,
            ConfigKey::TagHorizontalVelocity => &mut self.tag_horizontal_velocity,
            ConfigKey::ControlFrequency => &mut self.control_frequency,
            ConfigKey::NavigationFrequency => &mut self.navigation_frequency,
            ConfigKey::GuidanceFrequency => &mut self.guidance_frequency,
            ConfigKey::MinSafeDistance => &mut self.min_safe_distance,
            ConfigKey::MaxApproachVelocity => &mut self.max_approach_velocity,
            ConfigKey::AbortAltitude => &mut self.abort_altitude,
            ConfigKey::AttitudeAccuracy => &mut self.attitude_accuracy,
            ConfigKey::PositionAccuracy => &mut self.position_accuracy,
            ConfigKey::VelocityAccuracy => &mut self.velocity_accuracy,
        };
        *slot = value;
        Ok(())
    }

    pub fn set_arrival_position(&mut self, position_km: Vector3<f64>) -> GncResult<()> {
        if !position_km.iter().all(|v| v.is_finite()) {
            return Err(GncError::InvalidConfigValue {
                key: ConfigKey::RdvArrivalPosition.as_str(),
                value: f64::NAN,
                reason: "components must be finite",
            });
        }
        self.rdv_arrival_position = position_km;
        Ok(())
    }

    /// Attitude accuracy requirement converted to radians.
    pub fn attitude_accuracy_rad(&self) -> f64 {
        self.attitude_accuracy.to_radians()
    }
}

fn check_value(key: ConfigKey, value: f64) -> GncResult<()> {
    let reason = if !value.is_finite() {
        Some("value must be finite")
    } else if value <= 0.0 {
        Some("value must be positive")
    } else if key == ConfigKey::TagAttitudeTolerance && value > 180.0 {
        Some("angle must not exceed 180 degrees")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(GncError::InvalidConfigValue {
            key: key.as_str(),
            value,
            reason,
        }),
        None => Ok(()),
    }
}
