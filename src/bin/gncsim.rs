use clap::{App, Arg, ArgMatches, SubCommand};
use colored::*;
use gncsim::reference::{DeadReckoningNavigation, HoldTargetGuidance, PdController, PointMassTruth};
use gncsim::{
    ConfigKey, CycleTelemetry, GncConfig, GncMode, GncState, GncSystem, SensorConfig, SensorSuite,
    TrueState,
};
use nalgebra::{Vector3, Vector4};
use tracing::Level;

const DEFAULT_CYCLES: &str = "100";
const DEFAULT_SEED: &str = "42";
const SPACECRAFT_MASS_KG: f64 = 500.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("gncsim")
        .version("0.1.0")
        .author("Space Systems Engineering Team")
        .about("🛰️  GNC Simulator - Closed-loop proximity operations guidance, navigation and control")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("JSON configuration overrides")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .takes_value(true)
                .possible_values(&["json", "table"])
                .default_value("table")
                .global(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Enable debug logging")
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("config")
                .about("⚙️  Configuration inspection")
                .subcommand(
                    SubCommand::with_name("show")
                        .about("Print the effective configuration")
                )
                .subcommand(
                    SubCommand::with_name("validate")
                        .about("Validate a configuration file")
                        .arg(
                            Arg::with_name("file")
                                .help("Configuration file to check")
                                .required(true)
                        )
                )
        )
        .subcommand(
            SubCommand::with_name("sensors")
                .about("📡 Sample the sensor suite once on the reference scenario")
                .arg(seed_arg())
        )
        .subcommand(
            SubCommand::with_name("run")
                .about("🚀 Run a closed-loop approach")
                .long_about("Runs the GNC cycle against a point-mass truth model with dead-reckoning navigation, hold-target guidance and PD control, then reports performance compliance")
                .arg(seed_arg())
                .arg(
                    Arg::with_name("cycles")
                        .short("n")
                        .long("cycles")
                        .value_name("COUNT")
                        .help("Number of control cycles")
                        .takes_value(true)
                        .default_value(DEFAULT_CYCLES)
                        .validator(|v| match v.parse::<u32>() {
                            Ok(_) => Ok(()),
                            Err(_) => Err("Cycle count must be a positive integer".into()),
                        }),
                )
                .arg(
                    Arg::with_name("mode")
                        .short("m")
                        .long("mode")
                        .value_name("MODE")
                        .help("GNC mode for the run")
                        .takes_value(true)
                        .possible_values(&[
                            "safe", "cruise", "approach", "proximity", "descent", "surface", "ascent",
                        ])
                        .default_value("approach"),
                )
        )
        .get_matches();

    let verbose = matches.is_present("verbose");
    let format = matches.value_of("format").unwrap_or("table");

    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let config = match matches.value_of("config") {
        Some(path) => GncConfig::from_json_file(path)?,
        None => GncConfig::default(),
    };

    match matches.subcommand() {
        ("config", Some(sub_matches)) => handle_config_command(sub_matches, &config, format)?,
        ("sensors", Some(sub_matches)) => handle_sensors(sub_matches, format)?,
        ("run", Some(sub_matches)) => handle_run(sub_matches, config, format, verbose)?,
        _ => {
            println!("{}", "No command specified. Use --help for usage information.".yellow());
            println!("{}", "Quick start:".bright_green());
            println!("  {}", "gncsim sensors".bright_cyan());
            println!("  {}", "gncsim run --cycles 200 --mode approach".bright_cyan());
        }
    }

    Ok(())
}

fn seed_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("seed")
        .short("s")
        .long("seed")
        .value_name("SEED")
        .help("Noise seed for reproducible runs")
        .takes_value(true)
        .default_value(DEFAULT_SEED)
        .validator(|v| match v.parse::<u64>() {
            Ok(_) => Ok(()),
            Err(_) => Err("Seed must be a valid number".into()),
        })
}

fn parse_seed(matches: &ArgMatches<'_>) -> Result<u64, Box<dyn std::error::Error>> {
    Ok(matches.value_of("seed").unwrap_or(DEFAULT_SEED).parse()?)
}

fn handle_config_command(
    matches: &ArgMatches<'_>,
    config: &GncConfig,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        ("show", Some(_)) => print_config(config, format)?,
        ("validate", Some(sub_matches)) => {
            let path = sub_matches.value_of("file").unwrap_or_default();
            match GncConfig::from_json_file(path) {
                Ok(_) => println!("{} {} is valid", "✅".green(), path.bright_white()),
                Err(e) => {
                    println!("{} {}: {}", "❌".red(), path.bright_white(), e.to_string().bright_red());
                    std::process::exit(1);
                }
            }
        }
        _ => {
            println!("{}", "Config subcommand required. Use 'gncsim config --help' for options.".yellow());
        }
    }
    Ok(())
}

fn print_config(config: &GncConfig, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if format == "json" {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    println!("{}", "⚙️  GNC Configuration".bright_blue().bold());
    println!("{}", "═══════════════════".bright_blue());
    let arrival = config.rdv_arrival_position;
    println!(
        "  {:<26} [{:.1}, {:.1}, {:.1}] {}",
        ConfigKey::RdvArrivalPosition.as_str().bright_white(),
        arrival.x,
        arrival.y,
        arrival.z,
        ConfigKey::RdvArrivalPosition.unit().dimmed()
    );
    for key in ConfigKey::ALL {
        if let Some(value) = config.get(key) {
            println!(
                "  {:<26} {} {}",
                key.as_str().bright_white(),
                value.to_string().bright_cyan(),
                key.unit().dimmed()
            );
        }
    }
    Ok(())
}

/// Illustrative far-field state used to exercise every sensor at once.
fn reference_truth() -> TrueState {
    TrueState {
        position: Vector3::new(2_500_000.0, 200_000.0, -50_000.0),
        velocity: Vector3::new(-1.18, -1.97, 0.16),
        acceleration: Vector3::zeros(),
        attitude: Vector4::new(1.0, 0.0, 0.0, 0.0),
        angular_rate: Vector3::new(0.001, -0.0005, 0.0002),
        sun_direction: Some(Vector3::new(0.5, 0.3, 0.8).normalize()),
        target_position_body: Some(Vector3::new(100.0, 50.0, 200.0)),
        target_distance: Some(223.6),
        surface_normal: Some(Vector3::new(0.0, 0.0, 1.0)),
    }
}

fn handle_sensors(matches: &ArgMatches<'_>, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut suite = SensorSuite::new(&SensorConfig {
        seed: Some(parse_seed(matches)?),
        ..SensorConfig::default()
    })?;
    let measurements = suite.get_all_measurements(&reference_truth(), 0.0)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(measurements)?);
        return Ok(());
    }

    println!("{}", "📡 Sensor Suite Measurements".bright_blue().bold());
    println!("{}", "══════════════════════════".bright_blue());
    for measurement in measurements.iter() {
        let status = if measurement.valid {
            "VALID".bright_green()
        } else {
            "INVALID".bright_red()
        };
        let data: Vec<String> = measurement.data.iter().map(|v| format!("{v:.6}")).collect();
        println!(
            "  {:<15} {:<8} [{}]",
            measurement.kind.as_str().bright_white(),
            status,
            data.join(", ")
        );
    }
    println!(
        "\n  {} {}/{}",
        "Valid:".bright_white(),
        measurements.valid_count(),
        measurements.len()
    );
    Ok(())
}

fn handle_run(
    matches: &ArgMatches<'_>,
    config: GncConfig,
    format: &str,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let cycles: u32 = matches.value_of("cycles").unwrap_or(DEFAULT_CYCLES).parse()?;
    let mode: GncMode = matches.value_of("mode").unwrap_or("approach").parse()?;
    let seed = parse_seed(matches)?;

    let dt = 1.0 / config.control_frequency;
    let mut gnc = GncSystem::new(config)?;
    gnc.set_mode(mode);
    gnc.initialize_subsystems(
        Some(Box::new(DeadReckoningNavigation::new(dt)?)),
        Some(Box::new(HoldTargetGuidance)),
        Some(Box::new(PdController::default())),
    );

    let mut truth = PointMassTruth::new(
        TrueState {
            position: Vector3::new(400.0, 30.0, -10.0),
            velocity: Vector3::new(-0.2, 0.0, 0.0),
            sun_direction: Some(Vector3::new(0.5, 0.3, 0.8)),
            ..TrueState::default()
        },
        SPACECRAFT_MASS_KG,
    )?;
    gnc.set_current_state(truth.initial_estimate())?;

    let target = GncState {
        position: Vector3::new(80.0, 0.0, 0.0),
        ..GncState::default()
    };

    let mut sensors = SensorSuite::with_seed(seed)?;

    if format == "table" {
        println!("{}", "🚀 Closed-loop run".bright_green().bold());
        println!(
            "{} mode={} cycles={} dt={:.3}s seed={}",
            "Starting".dimmed(),
            mode.to_string().bright_cyan(),
            cycles,
            dt,
            seed
        );
    }

    for _ in 0..cycles {
        let measurements = sensors.get_all_measurements(truth.true_state(), truth.time())?;
        let (_, command) = gnc.run_cycle(measurements, &target, dt)?;
        truth.step(&command, dt)?;

        if let Some(telemetry) = gnc.last_telemetry() {
            match format {
                "json" => println!("{}", telemetry.to_json()?),
                _ if verbose || !telemetry.safe => print_cycle(telemetry),
                _ => {}
            }
        }
    }

    let summary = gnc.summary();
    if format == "json" {
        println!("{}", serde_json::to_string(&summary)?);
        return Ok(());
    }

    let Some(summary) = summary else {
        println!("{}", "No cycles executed".yellow());
        return Ok(());
    };

    println!("\n{}", "📊 Performance Summary".bright_white().bold());
    println!("  {:<24} {:.1} s", "Mission duration:", summary.mission_duration);
    println!("  {:<24} {}", "Samples:", summary.samples);
    println!(
        "  {:<24} {:.3} ± {:.3} m",
        "Position error:", summary.mean_position_error, summary.std_position_error
    );
    println!(
        "  {:<24} {:.4} ± {:.4} m/s",
        "Velocity error:", summary.mean_velocity_error, summary.std_velocity_error
    );
    println!("  {:<24} {:.3} N", "Total control effort:", summary.total_control_effort);
    println!(
        "  {:<24} {}",
        "Final range:",
        format!("{:.2} m", truth.true_state().position.norm()).bright_cyan()
    );

    println!("\n{}", "✅ Requirements".bright_white().bold());
    for (requirement, compliant) in &summary.requirements_compliance {
        let verdict = if *compliant {
            "PASS".bright_green()
        } else {
            "FAIL".bright_red()
        };
        println!("  {:<20} {}", requirement.id().bright_white(), verdict);
        if let Some(entry) = requirement.catalog_entry() {
            println!("  {}", entry.text.dimmed());
        }
    }

    let stats = gnc.supervisor().stats();
    if stats.unsafe_cycles > 0 {
        println!(
            "\n{} {} of {} cycles aborted by the safety supervisor",
            "⚠️".yellow(),
            stats.unsafe_cycles,
            stats.checks_performed
        );
    }

    Ok(())
}

fn print_cycle(telemetry: &CycleTelemetry) {
    let status = if telemetry.safe {
        "SAFE".bright_green()
    } else {
        "ABORT".bright_red()
    };
    let state = &telemetry.estimated_state;
    println!(
        "  #{:<5} t={:>7.2}s {:<6} range={:>9.2} m speed={:.3} m/s thrust={:.3} N",
        telemetry.cycle,
        state.timestamp,
        status,
        state.range(),
        state.speed(),
        telemetry.command.thrust_magnitude()
    );
    for violation in &telemetry.violations {
        println!("         {} {:?}", "⚠️".yellow(), violation);
    }
}
