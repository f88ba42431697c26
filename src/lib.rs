//! # GNC Simulator Core
//!
//! Closed-loop guidance, navigation and control core for an autonomous
//! spacecraft performing rendezvous and touch-and-go operations near a small
//! body.
//!
//! ## Features
//!
//! - **Sensor models**: IMU, star tracker, sun sensor, optical camera and LIDAR
//!   with seeded Gaussian noise and physical visibility limits
//! - **Control cycle**: Navigate, guide, control, log and supervise in a fixed
//!   order with pluggable stages
//! - **Safety supervision**: Minimum distance and approach velocity envelope with
//!   a deterministic abort command
//! - **Mode management**: Mission phases with velocity limits tightened on entry
//! - **Performance monitoring**: 3-sigma compliance against mission requirements
//! - **Multi-rate scheduling**: Separate navigation, guidance and control rates
//!
//! ## Quick Start
//!
//! ```rust
//! use gncsim::{GncMode, GncState, GncSystem, SensorSuite, TrueState};
//! use nalgebra::Vector3;
//!
//! let mut gnc = GncSystem::with_defaults();
//! gnc.set_mode(GncMode::Cruise);
//! gnc.set_current_state(GncState {
//!     position: Vector3::new(200.0, 0.0, 0.0),
//!     ..GncState::default()
//! })?;
//!
//! let mut sensors = SensorSuite::with_seed(42)?;
//! let measurements = sensors.get_all_measurements(&TrueState::default(), 0.0)?.clone();
//!
//! let (state, command) = gnc.run_cycle(&measurements, &GncState::default(), 0.1)?;
//! assert!(gnc.is_safe());
//! assert!(command.is_zero());
//! assert_eq!(state.position.x, 200.0);
//! # Ok::<(), gncsim::GncError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`gnc`] - Orchestrator and public API
//! - [`sensors`] - Sensor models and the sensor suite
//! - [`stages`] - Navigation, guidance, control and actuator contracts
//! - [`safety`] - Safety envelope checks and abort command
//! - [`performance`] - Tracking error log and compliance statistics
//! - [`scheduler`] - Multi-rate stage release
//! - [`config`] - Configuration surface and validation

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod gnc;
pub mod mode;
pub mod performance;
pub mod reference;
pub mod requirements;
pub mod safety;
pub mod scheduler;
pub mod sensors;
pub mod stages;
pub mod state;
pub mod telemetry;

// Re-export main public types for convenience
pub use config::{ConfigKey, GncConfig};
pub use error::{GncError, GncResult};
pub use gnc::GncSystem;
pub use mode::{ControlAuthority, GncEvent, GncMode};
pub use performance::{PerformanceMonitor, PerformanceSample, PerformanceSummary};
pub use requirements::{PerformanceRequirement, Requirement, RequirementKind};
pub use safety::{SafetySupervisor, SafetyVerdict, SafetyViolation};
pub use scheduler::{DueStages, RateScheduler};
pub use sensors::{
    Measurements, Sensor, SensorConfig, SensorKind, SensorMeasurement, SensorSuite, TrueState,
};
pub use stages::{Actuator, ControlStage, GuidanceStage, NavigationStage};
pub use state::{GncCommand, GncState};
pub use telemetry::CycleTelemetry;
