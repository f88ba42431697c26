use crate::config::GncConfig;
use crate::requirements::PerformanceRequirement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of most recent samples used for compliance statistics.
pub const COMPLIANCE_WINDOW: usize = 100;
const SIGMA_BOUND: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub position_error: f64,
    pub velocity_error: f64,
    pub attitude_error: f64,
    pub control_effort: f64,
    pub timestamp: f64,
}

/// Append-only per-cycle tracking record for the whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceLog {
    position_error: Vec<f64>,
    velocity_error: Vec<f64>,
    attitude_error: Vec<f64>,
    control_effort: Vec<f64>,
    timestamps: Vec<f64>,
}

impl PerformanceLog {
    pub fn append(&mut self, sample: PerformanceSample) {
        self.position_error.push(sample.position_error);
        self.velocity_error.push(sample.velocity_error);
        self.attitude_error.push(sample.attitude_error);
        self.control_effort.push(sample.control_effort);
        self.timestamps.push(sample.timestamp);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn position_error(&self) -> &[f64] {
        &self.position_error
    }

    pub fn velocity_error(&self) -> &[f64] {
        &self.velocity_error
    }

    pub fn attitude_error(&self) -> &[f64] {
        &self.attitude_error
    }

    pub fn control_effort(&self) -> &[f64] {
        &self.control_effort
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub mission_duration: f64,
    pub samples: usize,
    pub mean_position_error: f64,
    pub std_position_error: f64,
    pub mean_velocity_error: f64,
    pub std_velocity_error: f64,
    pub total_control_effort: f64,
    pub requirements_compliance: BTreeMap<PerformanceRequirement, bool>,
}

#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    log: PerformanceLog,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sample: PerformanceSample) {
        self.log.append(sample);
    }

    pub fn log(&self) -> &PerformanceLog {
        &self.log
    }

    /// 3-sigma of the most recent window of each error series against its
    /// configured requirement. Empty until the first sample is logged.
    pub fn compliance(&self, config: &GncConfig) -> BTreeMap<PerformanceRequirement, bool> {
        let mut compliance = BTreeMap::new();
        if self.log.is_empty() {
            return compliance;
        }

        for requirement in PerformanceRequirement::ALL {
            let series = match requirement {
                PerformanceRequirement::AttitudeAccuracy => self.log.attitude_error(),
                PerformanceRequirement::PositionAccuracy => self.log.position_error(),
                PerformanceRequirement::VelocityAccuracy => self.log.velocity_error(),
            };
            let spread = SIGMA_BOUND * std_dev(recent(series));
            compliance.insert(requirement, spread <= requirement.threshold(config));
        }

        compliance
    }

    pub fn summary(&self, config: &GncConfig) -> Option<PerformanceSummary> {
        let mission_duration = *self.log.timestamps().last()?;

        Some(PerformanceSummary {
            mission_duration,
            samples: self.log.len(),
            mean_position_error: mean(self.log.position_error()),
            std_position_error: std_dev(self.log.position_error()),
            mean_velocity_error: mean(self.log.velocity_error()),
            std_velocity_error: std_dev(self.log.velocity_error()),
            total_control_effort: self.log.control_effort().iter().sum(),
            requirements_compliance: self.compliance(config),
        })
    }
}

fn recent(series: &[f64]) -> &[f64] {
    &series[series.len().saturating_sub(COMPLIANCE_WINDOW)..]
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by N).
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
