use gncsim::reference::{
    DeadReckoningNavigation, HoldTargetGuidance, PdController, PointMassTruth, RecordingActuator,
};
use gncsim::{
    Actuator, GncConfig, GncEvent, GncMode, GncState, GncSystem, RateScheduler, SensorConfig,
    SensorSuite, TrueState,
};
use nalgebra::Vector3;
use std::time::Duration;
use tokio::time;
use tracing::{error, info, warn};

const MAX_CYCLES: u64 = 20_000;
/// Simulated seconds per wall-clock second.
const TIME_WARP: f64 = 10.0;
const SPACECRAFT_MASS_KG: f64 = 500.0;
const HOLD_POINT_M: f64 = 80.0;
const ARRIVAL_TOLERANCE_M: f64 = 2.0;
const SENSOR_SEED: u64 = 7;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("🛰️  GNC Closed-Loop Simulator");
    println!("============================");

    let config = match std::env::args().nth(1) {
        Some(path) => GncConfig::from_json_file(path)?,
        None => GncConfig::default(),
    };

    let control_period = 1.0 / config.control_frequency;
    let mut scheduler = RateScheduler::new(&config, 0.0)?;
    let base_period = scheduler.base_period();

    let mut gnc = GncSystem::new(config.clone())?;
    gnc.initialize_subsystems(
        Some(Box::new(DeadReckoningNavigation::new(1.0 / config.navigation_frequency)?)),
        Some(Box::new(HoldTargetGuidance)),
        Some(Box::new(PdController::default())),
    );
    gnc.set_mode(GncMode::Approach);

    let mut truth = PointMassTruth::new(
        TrueState {
            position: Vector3::new(300.0, 40.0, -20.0),
            velocity: Vector3::new(-0.15, 0.0, 0.0),
            sun_direction: Some(Vector3::new(0.2, 0.1, 0.9)),
            ..TrueState::default()
        },
        SPACECRAFT_MASS_KG,
    )?;
    gnc.set_current_state(truth.initial_estimate())?;

    let mut sensors = SensorSuite::new(&SensorConfig {
        seed: Some(SENSOR_SEED),
        ..SensorConfig::default()
    })?;
    let mut actuator = RecordingActuator::new();

    let target = GncState {
        position: Vector3::new(HOLD_POINT_M, 0.0, 0.0),
        ..GncState::default()
    };

    info!(
        control_hz = config.control_frequency,
        navigation_hz = config.navigation_frequency,
        guidance_hz = config.guidance_frequency,
        "simulation started"
    );

    // Main loop paced at the fastest stage rate
    let mut interval = time::interval(Duration::from_secs_f64(base_period / TIME_WARP));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => {
                warn!("interrupt received, stopping simulation");
                break;
            }
        }

        let now = truth.time();
        let due = scheduler.poll(now)?;
        if !due.any() {
            truth.step(gnc.last_command(), base_period)?;
            continue;
        }

        let measurements = sensors.get_all_measurements(truth.true_state(), now)?;
        let command = match gnc.run_scheduled_cycle(measurements, &target, control_period, due) {
            Ok((_, command)) => command,
            Err(e) => {
                error!("❌ GNC cycle failed: {}", e);
                break;
            }
        };

        actuator.apply(&command)?;
        truth.step(&command, base_period)?;

        for event in gnc.drain_events() {
            match event {
                GncEvent::AbortCommanded { thrust, timestamp } => {
                    warn!(?thrust, timestamp, "🚨 abort thrust applied");
                }
                other => info!(event = ?other, "GNC event"),
            }
        }

        if let Some(telemetry) = gnc.last_telemetry() {
            if telemetry.cycle % 50 == 0 {
                info!("📡 TELEMETRY: {}", telemetry.to_json()?);
            }
        }

        let miss = (truth.true_state().position - target.position).norm();
        if miss < ARRIVAL_TOLERANCE_M && truth.true_state().velocity.norm() < config.rdv_velocity_tolerance {
            info!(miss_m = miss, time_s = truth.time(), "hold point reached");
            break;
        }
        if gnc.cycle_count() >= MAX_CYCLES {
            warn!(miss_m = miss, "cycle limit reached before arrival");
            break;
        }
    }

    let stats = scheduler.stats();
    info!(
        ticks = stats.ticks,
        navigation = stats.navigation_releases,
        guidance = stats.guidance_releases,
        control = stats.control_releases,
        missed = stats.missed_releases,
        "scheduler statistics"
    );

    if let Some(summary) = gnc.summary() {
        info!("📊 SUMMARY: {}", serde_json::to_string(&summary)?);
    }
    info!(
        impulse_ns = actuator.total_impulse(control_period),
        commands = actuator.applied().len(),
        "actuator usage"
    );

    println!("🚀 GNC Simulator stopped");

    Ok(())
}
