use crate::config::ConfigKey;
use crate::safety::SafetyViolation;
use heapless::Vec;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_GNC_EVENTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GncMode {
    Safe,
    Cruise,
    Approach,
    Proximity,
    Descent,
    Surface,
    Ascent,
}

impl GncMode {
    pub const ALL: [GncMode; 7] = [
        GncMode::Safe,
        GncMode::Cruise,
        GncMode::Approach,
        GncMode::Proximity,
        GncMode::Descent,
        GncMode::Surface,
        GncMode::Ascent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GncMode::Safe => "safe",
            GncMode::Cruise => "cruise",
            GncMode::Approach => "approach",
            GncMode::Proximity => "proximity",
            GncMode::Descent => "descent",
            GncMode::Surface => "surface",
            GncMode::Ascent => "ascent",
        }
    }

    /// Phases designed to operate inside the minimum safe distance.
    pub fn allows_close_approach(self) -> bool {
        matches!(self, GncMode::Descent | GncMode::Surface)
    }

    /// Velocity limit imposed on entry, if this mode tightens it.
    pub fn entry_velocity_limit(self) -> Option<f64> {
        match self {
            GncMode::Proximity => Some(crate::config::PROXIMITY_MAX_APPROACH_VELOCITY),
            GncMode::Descent => Some(crate::config::DESCENT_MAX_APPROACH_VELOCITY),
            _ => None,
        }
    }
}

impl fmt::Display for GncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GncMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GncMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown GNC mode: {s}"))
    }
}

/// Who may issue commands. Annotation only; does not gate the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAuthority {
    Ground,
    Autonomous,
    Hybrid,
}

impl ControlAuthority {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlAuthority::Ground => "ground",
            ControlAuthority::Autonomous => "autonomous",
            ControlAuthority::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for ControlAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ControlAuthority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ground" => Ok(ControlAuthority::Ground),
            "autonomous" => Ok(ControlAuthority::Autonomous),
            "hybrid" => Ok(ControlAuthority::Hybrid),
            _ => Err(format!("unknown control authority: {s}")),
        }
    }
}

/// Notifications emitted by the orchestrator for external observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GncEvent {
    ModeTransition {
        from: GncMode,
        to: GncMode,
        timestamp: f64,
    },
    AuthorityChange {
        from: ControlAuthority,
        to: ControlAuthority,
        timestamp: f64,
    },
    ConfigTightened {
        key: ConfigKey,
        from: f64,
        to: f64,
    },
    SafetyViolation {
        violation: SafetyViolation,
        timestamp: f64,
    },
    AbortCommanded {
        thrust: [f64; 3],
        timestamp: f64,
    },
    ComputationFault {
        message: String,
        timestamp: f64,
    },
}

/// Bounded event history; the oldest entry is dropped when full.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<GncEvent, MAX_GNC_EVENTS>,
    dropped: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: GncEvent) {
        if self.events.is_full() {
            self.events.remove(0);
            self.dropped = self.dropped.saturating_add(1);
        }
        let _ = self.events.push(event);
    }

    pub fn events(&self) -> &[GncEvent] {
        &self.events
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Take every recorded event, leaving the log empty.
    pub fn drain(&mut self) -> std::vec::Vec<GncEvent> {
        let drained = self.events.iter().cloned().collect();
        self.events.clear();
        drained
    }

    pub fn capacity(&self) -> usize {
        MAX_GNC_EVENTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_drops_oldest_when_full() {
        let mut log = EventLog::new();
        for i in 0..(MAX_GNC_EVENTS + 3) {
            log.record(GncEvent::ConfigTightened {
                key: ConfigKey::MaxApproachVelocity,
                from: i as f64,
                to: 0.0,
            });
        }
        assert_eq!(log.events().len(), MAX_GNC_EVENTS);
        assert_eq!(log.dropped(), 3);
        match &log.events()[0] {
            GncEvent::ConfigTightened { from, .. } => assert_eq!(*from, 3.0),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_mode_names_parse() {
        for mode in GncMode::ALL {
            assert_eq!(mode.as_str().parse::<GncMode>().unwrap(), mode);
        }
        assert!("tag".parse::<GncMode>().is_err());
    }
}
