use thiserror::Error;

pub type GncResult<T> = Result<T, GncError>;

#[derive(Debug, Error)]
pub enum GncError {
    #[error("Unknown configuration key: {0}")]
    UnknownConfigKey(String),

    #[error("Invalid value {value} for configuration key {key}: {reason}")]
    InvalidConfigValue {
        key: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Configuration file error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// A zero-length vector reached a normalization step.
    #[error("Degenerate vector in {context}: cannot normalize zero-length vector")]
    DegenerateVector { context: &'static str },

    #[error("Non-finite state produced by {stage} stage")]
    NonFiniteState { stage: &'static str },

    #[error("Invalid cycle time step: {0} s")]
    InvalidTimeStep(f64),

    #[error("Invalid noise standard deviation {sigma} for {sensor}")]
    InvalidNoise { sensor: &'static str, sigma: f64 },

    #[error("{stage} stage failed: {message}")]
    Stage {
        stage: &'static str,
        message: String,
    },
}

impl GncError {
    pub fn stage(stage: &'static str, message: impl Into<String>) -> Self {
        GncError::Stage {
            stage,
            message: message.into(),
        }
    }
}
