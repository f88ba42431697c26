use crate::config::{ConfigKey, GncConfig};
use crate::error::{GncError, GncResult};
use crate::mode::{ControlAuthority, EventLog, GncEvent, GncMode};
use crate::performance::{PerformanceMonitor, PerformanceSample, PerformanceSummary};
use crate::requirements::PerformanceRequirement;
use crate::safety::{SafetySupervisor, SafetyVerdict};
use crate::scheduler::DueStages;
use crate::sensors::Measurements;
use crate::stages::{ControlStage, GuidanceStage, NavigationStage};
use crate::state::{GncCommand, GncState};
use crate::telemetry::CycleTelemetry;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

/// Closed-loop GNC orchestrator.
///
/// Owns the estimated and desired states, the mode and authority flags, the
/// safety supervisor and the performance log. Each cycle runs navigate,
/// guide, control, log and supervise in that order. A cycle is applied
/// atomically: if any step fails, no state is changed.
pub struct GncSystem {
    config: GncConfig,
    mode: GncMode,
    authority: ControlAuthority,

    current_state: GncState,
    desired_state: GncState,
    last_control_command: GncCommand,
    last_command: GncCommand,
    guidance_timestamp: Option<f64>,

    navigation: Option<Box<dyn NavigationStage>>,
    guidance: Option<Box<dyn GuidanceStage>>,
    control: Option<Box<dyn ControlStage>>,

    supervisor: SafetySupervisor,
    monitor: PerformanceMonitor,
    events: EventLog,
    last_telemetry: Option<CycleTelemetry>,
    cycle_count: u64,
}

impl GncSystem {
    /// Build the orchestrator in `safe` mode under `ground` authority.
    ///
    /// The configuration is validated first; a partially valid configuration
    /// never reaches a running system.
    pub fn new(config: GncConfig) -> GncResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, SafetySupervisor::new()))
    }

    pub fn with_defaults() -> Self {
        Self::from_parts(GncConfig::default(), SafetySupervisor::new())
    }

    pub fn with_supervisor(config: GncConfig, supervisor: SafetySupervisor) -> GncResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, supervisor))
    }

    fn from_parts(config: GncConfig, supervisor: SafetySupervisor) -> Self {
        Self {
            config,
            mode: GncMode::Safe,
            authority: ControlAuthority::Ground,
            current_state: GncState::default(),
            desired_state: GncState::default(),
            last_control_command: GncCommand::default(),
            last_command: GncCommand::default(),
            guidance_timestamp: None,
            navigation: None,
            guidance: None,
            control: None,
            supervisor,
            monitor: PerformanceMonitor::new(),
            events: EventLog::new(),
            last_telemetry: None,
            cycle_count: 0,
        }
    }

    pub fn initialize_subsystems(
        &mut self,
        navigation: Option<Box<dyn NavigationStage>>,
        guidance: Option<Box<dyn GuidanceStage>>,
        control: Option<Box<dyn ControlStage>>,
    ) {
        self.navigation = navigation;
        self.guidance = guidance;
        self.control = control;
        info!(
            navigation = self.navigation.is_some(),
            guidance = self.guidance.is_some(),
            control = self.control.is_some(),
            "GNC stages connected"
        );
    }

    pub fn attach_navigation(&mut self, stage: Box<dyn NavigationStage>) {
        self.navigation = Some(stage);
    }

    pub fn attach_guidance(&mut self, stage: Box<dyn GuidanceStage>) {
        self.guidance = Some(stage);
    }

    pub fn attach_control(&mut self, stage: Box<dyn ControlStage>) {
        self.control = Some(stage);
    }

    pub fn detach_all(&mut self) {
        self.navigation = None;
        self.guidance = None;
        self.control = None;
    }

    pub fn set_mode(&mut self, mode: GncMode) {
        let from = self.mode;
        self.mode = mode;

        info!(from = %from, to = %mode, "GNC mode transition");
        self.events.record(GncEvent::ModeTransition {
            from,
            to: mode,
            timestamp: self.current_state.timestamp,
        });

        if let Some(limit) = mode.entry_velocity_limit() {
            self.tighten_velocity_limit(limit);
        }
    }

    fn tighten_velocity_limit(&mut self, limit: f64) {
        let previous = self.config.max_approach_velocity;
        if limit >= previous {
            return;
        }

        self.config.max_approach_velocity = limit;
        info!(
            key = %ConfigKey::MaxApproachVelocity,
            from = previous,
            to = limit,
            "velocity limit tightened on mode entry"
        );
        self.events.record(GncEvent::ConfigTightened {
            key: ConfigKey::MaxApproachVelocity,
            from: previous,
            to: limit,
        });
    }

    pub fn set_authority(&mut self, authority: ControlAuthority) {
        let from = self.authority;
        self.authority = authority;

        info!(from = %from, to = %authority, "control authority changed");
        self.events.record(GncEvent::AuthorityChange {
            from,
            to: authority,
            timestamp: self.current_state.timestamp,
        });
    }

    /// Explicit reconfiguration of one parameter.
    pub fn reconfigure(&mut self, key: ConfigKey, value: f64) -> GncResult<()> {
        self.config.set(key, value)?;
        info!(key = %key, value, "GNC reconfigured");
        Ok(())
    }

    /// Overwrite the state estimate, e.g. to seed a run from truth.
    pub fn set_current_state(&mut self, state: GncState) -> GncResult<()> {
        ensure_finite(&state, "injected")?;
        self.current_state = state;
        Ok(())
    }

    /// Run one full cycle with every stage released.
    pub fn run_cycle(
        &mut self,
        measurements: &Measurements,
        target: &GncState,
        dt: f64,
    ) -> GncResult<(GncState, GncCommand)> {
        self.run_scheduled_cycle(measurements, target, dt, DueStages::ALL)
    }

    /// Run one cycle executing only the released stages.
    ///
    /// Stages not released this tick keep their previous output: the estimate
    /// and desired state carry over and the last control command is held.
    /// A carried-over desired state may be older than the estimate; its age is
    /// reported as `guidance_age` in the cycle telemetry.
    pub fn run_scheduled_cycle(
        &mut self,
        measurements: &Measurements,
        target: &GncState,
        dt: f64,
        due: DueStages,
    ) -> GncResult<(GncState, GncCommand)> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(GncError::InvalidTimeStep(dt));
        }

        // 1. Navigate
        let current = match self.navigation.as_mut() {
            Some(navigation) if due.navigation => {
                let estimate = navigation.update(measurements, &self.current_state)?;
                ensure_finite(&estimate, "navigation")?;
                estimate
            }
            _ => self.current_state.clone(),
        };

        // 2. Guide
        let mut guidance_timestamp = self.guidance_timestamp;
        let desired = match self.guidance.as_mut() {
            Some(guidance) if due.guidance => {
                let desired = guidance.compute_command(&current, target, self.mode)?;
                ensure_finite(&desired, "guidance")?;
                guidance_timestamp = Some(current.timestamp);
                desired
            }
            _ => self.desired_state.clone(),
        };

        // 3. Control
        let control_command = match self.control.as_mut() {
            Some(control) if due.control => control.compute_command(&current, &desired, self.mode)?,
            Some(_) => self.last_control_command.clone(),
            None => GncCommand::zero(current.timestamp),
        };

        // 4. Log
        let (position_error, velocity_error, attitude_error) = current.tracking_errors(&desired);
        let sample = PerformanceSample {
            position_error,
            velocity_error,
            attitude_error,
            control_effort: control_command.thrust_magnitude(),
            timestamp: current.timestamp,
        };

        // 5. Supervise
        let verdict = self.supervisor.evaluate(&current, self.mode, &self.config);
        let (command, fault) = if verdict.is_safe() {
            (control_command.clone(), None)
        } else {
            match self.supervisor.generate_safe_command(&current) {
                Ok(abort) => (abort, None),
                // No escape direction on the target itself: hold zero thrust.
                Err(fault @ GncError::DegenerateVector { .. }) => {
                    (GncCommand::zero(current.timestamp), Some(fault))
                }
                Err(other) => return Err(other),
            }
        };

        // Every fallible step is done; commit.
        self.monitor.record(sample);
        let aborted = !verdict.is_safe() && fault.is_none();
        self.supervisor
            .record(&verdict, aborted, self.mode, current.timestamp);
        self.record_verdict(&verdict, &command, fault.as_ref(), current.timestamp);

        self.cycle_count = self.cycle_count.saturating_add(1);
        self.current_state = current;
        self.desired_state = desired;
        self.guidance_timestamp = guidance_timestamp;
        self.last_control_command = control_command;
        self.last_command = command;

        self.last_telemetry = Some(CycleTelemetry {
            cycle: self.cycle_count,
            dt,
            mode: self.mode,
            authority: self.authority,
            stages_run: due,
            valid_measurements: measurements.valid_count(),
            estimated_state: self.current_state.clone(),
            desired_state: self.desired_state.clone(),
            command: self.last_command.clone(),
            safe: verdict.is_safe(),
            aborted,
            fault: fault.map(|f| f.to_string()),
            violations: verdict.violations().to_vec(),
            guidance_age: self
                .guidance_timestamp
                .map(|t| self.current_state.timestamp - t),
        });

        debug!(
            cycle = self.cycle_count,
            mode = %self.mode,
            safe = verdict.is_safe(),
            thrust = self.last_command.thrust_magnitude(),
            "GNC cycle complete"
        );

        Ok((self.current_state.clone(), self.last_command.clone()))
    }

    fn record_verdict(
        &mut self,
        verdict: &SafetyVerdict,
        command: &GncCommand,
        fault: Option<&GncError>,
        timestamp: f64,
    ) {
        if verdict.is_safe() {
            return;
        }

        for violation in verdict.violations() {
            warn!(?violation, mode = %self.mode, timestamp, "safety envelope violated");
            self.events.record(GncEvent::SafetyViolation {
                violation: *violation,
                timestamp,
            });
        }

        if let Some(fault) = fault {
            error!(%fault, timestamp, "abort command could not be generated");
            self.events.record(GncEvent::ComputationFault {
                message: fault.to_string(),
                timestamp,
            });
            return;
        }

        warn!(
            thrust_n = command.thrust_magnitude(),
            timestamp, "abort command substituted for control output"
        );
        self.events.record(GncEvent::AbortCommanded {
            thrust: [command.thrust.x, command.thrust.y, command.thrust.z],
            timestamp,
        });
    }

    /// Safety check of the current estimate under the current mode.
    pub fn is_safe(&self) -> bool {
        self.supervisor
            .is_safe(&self.current_state, self.mode, &self.config)
    }

    pub fn generate_safe_command(&self) -> GncResult<GncCommand> {
        self.supervisor.generate_safe_command(&self.current_state)
    }

    pub fn compliance(&self) -> BTreeMap<PerformanceRequirement, bool> {
        self.monitor.compliance(&self.config)
    }

    pub fn summary(&self) -> Option<PerformanceSummary> {
        self.monitor.summary(&self.config)
    }

    pub fn mode(&self) -> GncMode {
        self.mode
    }

    pub fn authority(&self) -> ControlAuthority {
        self.authority
    }

    pub fn config(&self) -> &GncConfig {
        &self.config
    }

    pub fn current_state(&self) -> &GncState {
        &self.current_state
    }

    pub fn desired_state(&self) -> &GncState {
        &self.desired_state
    }

    /// Command issued on the last cycle, after any safety override.
    pub fn last_command(&self) -> &GncCommand {
        &self.last_command
    }

    pub fn supervisor(&self) -> &SafetySupervisor {
        &self.supervisor
    }

    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GncEvent> {
        self.events.drain()
    }

    pub fn last_telemetry(&self) -> Option<&CycleTelemetry> {
        self.last_telemetry.as_ref()
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }
}

impl Default for GncSystem {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn ensure_finite(state: &GncState, stage: &'static str) -> GncResult<()> {
    if state.is_finite() {
        Ok(())
    } else {
        Err(GncError::NonFiniteState { stage })
    }
}
