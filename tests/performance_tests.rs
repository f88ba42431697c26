use gncsim::performance::COMPLIANCE_WINDOW;
use gncsim::*;

fn sample(position_error: f64, timestamp: f64) -> PerformanceSample {
    PerformanceSample {
        position_error,
        velocity_error: 0.0,
        attitude_error: 0.0,
        control_effort: 0.5,
        timestamp,
    }
}

/// Alternating 0 / `peak` series; its standard deviation is `peak / 2`.
fn alternating(monitor: &mut PerformanceMonitor, peak: f64, count: usize) {
    for i in 0..count {
        let value = if i % 2 == 0 { 0.0 } else { peak };
        monitor.record(sample(value, i as f64 * 0.1));
    }
}

#[test]
fn test_compliance_is_empty_before_first_sample() {
    let monitor = PerformanceMonitor::new();
    assert!(monitor.compliance(&GncConfig::default()).is_empty());
    assert!(monitor.summary(&GncConfig::default()).is_none());
}

#[test]
fn test_position_compliance_within_three_sigma() {
    let mut monitor = PerformanceMonitor::new();
    alternating(&mut monitor, 16.0, 100);

    let compliance = monitor.compliance(&GncConfig::default());

    assert_eq!(compliance.len(), 3);
    assert!(compliance[&PerformanceRequirement::PositionAccuracy]);
    assert!(compliance[&PerformanceRequirement::VelocityAccuracy]);
    assert!(compliance[&PerformanceRequirement::AttitudeAccuracy]);
}

#[test]
fn test_position_compliance_violated() {
    let mut monitor = PerformanceMonitor::new();
    alternating(&mut monitor, 18.0, 100);

    let compliance = monitor.compliance(&GncConfig::default());

    assert!(!compliance[&PerformanceRequirement::PositionAccuracy]);
    assert!(compliance[&PerformanceRequirement::VelocityAccuracy]);
}

#[test]
fn test_compliance_uses_most_recent_window() {
    let mut monitor = PerformanceMonitor::new();
    alternating(&mut monitor, 500.0, 50);
    for i in 0..COMPLIANCE_WINDOW {
        monitor.record(sample(3.0, 10.0 + i as f64));
    }

    let compliance = monitor.compliance(&GncConfig::default());
    assert!(compliance[&PerformanceRequirement::PositionAccuracy]);

    // The full history still carries the early spread
    let summary = monitor.summary(&GncConfig::default()).unwrap();
    assert!(summary.std_position_error > 10.0);
}

#[test]
fn test_thresholds_follow_configuration() {
    let mut monitor = PerformanceMonitor::new();
    alternating(&mut monitor, 16.0, 100);

    let config = GncConfig {
        position_accuracy: 20.0,
        ..GncConfig::default()
    };
    assert!(!monitor.compliance(&config)[&PerformanceRequirement::PositionAccuracy]);
}

#[test]
fn test_attitude_threshold_is_in_radians() {
    let config = GncConfig::default();
    let threshold = PerformanceRequirement::AttitudeAccuracy.threshold(&config);
    assert!((threshold - 0.1_f64.to_radians()).abs() < 1e-15);

    let mut monitor = PerformanceMonitor::new();
    for i in 0..100 {
        let attitude_error = if i % 2 == 0 { 0.0 } else { 0.01 };
        monitor.record(PerformanceSample {
            attitude_error,
            ..sample(0.0, f64::from(i))
        });
    }
    // 3 * 0.005 rad is about 0.86 degrees
    assert!(!monitor.compliance(&config)[&PerformanceRequirement::AttitudeAccuracy]);
}

#[test]
fn test_summary_statistics() {
    let mut monitor = PerformanceMonitor::new();
    monitor.record(sample(2.0, 0.5));
    monitor.record(sample(4.0, 1.0));
    monitor.record(sample(6.0, 1.5));

    let summary = monitor.summary(&GncConfig::default()).unwrap();

    assert_eq!(summary.samples, 3);
    assert_eq!(summary.mission_duration, 1.5);
    assert!((summary.mean_position_error - 4.0).abs() < 1e-12);
    assert!((summary.std_position_error - (8.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    assert_eq!(summary.mean_velocity_error, 0.0);
    assert!((summary.total_control_effort - 1.5).abs() < 1e-12);
    assert_eq!(summary.requirements_compliance.len(), 3);
}

#[test]
fn test_requirement_identifiers() {
    assert_eq!(PerformanceRequirement::AttitudeAccuracy.id(), "R-SYS-01");
    assert_eq!(PerformanceRequirement::PositionAccuracy.id(), "R-SYS-03-position");
    assert_eq!(PerformanceRequirement::VelocityAccuracy.id(), "R-SYS-03-velocity");
    assert_eq!(PerformanceRequirement::PositionAccuracy.to_string(), "R-SYS-03-position");
}

#[test]
fn test_system_logs_one_sample_per_cycle() {
    let mut gnc = GncSystem::with_defaults();
    gnc.set_mode(GncMode::Approach);
    gnc.set_current_state(GncState {
        position: nalgebra::Vector3::new(120.0, 0.0, 0.0),
        timestamp: 7.0,
        ..GncState::default()
    })
    .unwrap();

    for _ in 0..COMPLIANCE_WINDOW {
        gnc.run_cycle(&Measurements::new(), &GncState::default(), 0.1)
            .unwrap();
    }

    let log = gnc.monitor().log();
    assert_eq!(log.len(), COMPLIANCE_WINDOW);
    assert!(log.position_error().iter().all(|e| *e == 120.0));
    assert!(log.timestamps().iter().all(|t| *t == 7.0));

    // Constant error has zero spread
    let compliance = gnc.compliance();
    assert!(compliance.values().all(|ok| *ok));
}
