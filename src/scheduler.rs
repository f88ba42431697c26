use crate::config::GncConfig;
use crate::error::{GncError, GncResult};
use serde::{Deserialize, Serialize};

/// Slack applied when comparing accumulated release times.
const TIME_EPSILON: f64 = 1e-9;

/// Which stages are released on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DueStages {
    pub navigation: bool,
    pub guidance: bool,
    pub control: bool,
}

impl DueStages {
    pub const ALL: DueStages = DueStages {
        navigation: true,
        guidance: true,
        control: true,
    };

    pub fn any(&self) -> bool {
        self.navigation || self.guidance || self.control
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchedulerStats {
    pub ticks: u64,
    pub navigation_releases: u64,
    pub guidance_releases: u64,
    pub control_releases: u64,
    pub missed_releases: u64,
}

#[derive(Debug, Clone)]
struct StageClock {
    period: f64,
    next_release: f64,
}

impl StageClock {
    fn new(frequency: f64, key: &'static str, start_time: f64) -> GncResult<Self> {
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(GncError::InvalidConfigValue {
                key,
                value: frequency,
                reason: "frequency must be positive",
            });
        }
        Ok(Self {
            period: 1.0 / frequency,
            next_release: start_time,
        })
    }

    /// Release if due; returns the number of periods skipped past `time`.
    fn poll(&mut self, time: f64) -> Option<u64> {
        if time + TIME_EPSILON < self.next_release {
            return None;
        }

        let mut missed = ((time + TIME_EPSILON - self.next_release) / self.period)
            .floor()
            .max(0.0) as u64;
        self.next_release += (missed as f64 + 1.0) * self.period;
        // Division can land one period short at large offsets.
        if self.next_release <= time + TIME_EPSILON {
            self.next_release += self.period;
            missed += 1;
        }
        Some(missed)
    }
}

/// Releases navigation, guidance and control at their configured rates.
///
/// This is an aid for callers that drive the loop at several rates; the
/// orchestrator itself never reads the clock. Stages released on the same
/// tick still run in navigate, guide, control order.
#[derive(Debug, Clone)]
pub struct RateScheduler {
    navigation: StageClock,
    guidance: StageClock,
    control: StageClock,
    stats: SchedulerStats,
}

impl RateScheduler {
    pub fn new(config: &GncConfig, start_time: f64) -> GncResult<Self> {
        Ok(Self {
            navigation: StageClock::new(config.navigation_frequency, "navigation_frequency", start_time)?,
            guidance: StageClock::new(config.guidance_frequency, "guidance_frequency", start_time)?,
            control: StageClock::new(config.control_frequency, "control_frequency", start_time)?,
            stats: SchedulerStats::default(),
        })
    }

    /// Fastest configured period; a natural tick for the caller's loop.
    pub fn base_period(&self) -> f64 {
        self.navigation
            .period
            .min(self.guidance.period)
            .min(self.control.period)
    }

    pub fn poll(&mut self, time: f64) -> GncResult<DueStages> {
        if !time.is_finite() {
            return Err(GncError::InvalidTimeStep(time));
        }
        self.stats.ticks = self.stats.ticks.saturating_add(1);

        let mut due = DueStages::default();
        if let Some(missed) = self.navigation.poll(time) {
            due.navigation = true;
            self.stats.navigation_releases += 1;
            self.stats.missed_releases += missed;
        }
        if let Some(missed) = self.guidance.poll(time) {
            due.guidance = true;
            self.stats.guidance_releases += 1;
            self.stats.missed_releases += missed;
        }
        if let Some(missed) = self.control.poll(time) {
            due.control = true;
            self.stats.control_releases += 1;
            self.stats.missed_releases += missed;
        }
        Ok(due)
    }

    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }
}
