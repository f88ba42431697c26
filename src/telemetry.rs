use crate::mode::{ControlAuthority, GncMode};
use crate::safety::SafetyViolation;
use crate::scheduler::DueStages;
use crate::state::{GncCommand, GncState};
use serde::{Deserialize, Serialize};

/// Snapshot of one completed control cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleTelemetry {
    pub cycle: u64,
    pub dt: f64,
    pub mode: GncMode,
    pub authority: ControlAuthority,
    pub stages_run: DueStages,
    pub valid_measurements: usize,
    pub estimated_state: GncState,
    pub desired_state: GncState,
    pub command: GncCommand,
    pub safe: bool,
    pub aborted: bool,
    /// Computation fault raised while supervising this cycle.
    pub fault: Option<String>,
    pub violations: Vec<SafetyViolation>,
    /// Time since guidance last produced the desired state; `None` until the
    /// first guidance result. Non-zero values mark a stale trajectory point.
    pub guidance_age: Option<f64>,
}

impl CycleTelemetry {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
