use gncsim::sensors::*;
use gncsim::state::unit_vector;
use gncsim::*;
use nalgebra::{Vector3, Vector4};

fn seeded(seed: u64) -> GaussianNoise {
    GaussianNoise::from_seed(seed)
}

fn scenario_truth() -> TrueState {
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

fn assert_widths_match(measurement: &SensorMeasurement) {
    assert_eq!(measurement.data.len(), measurement.kind.data_width());
    if measurement.valid {
        let uncertainty = measurement.uncertainty.as_ref().expect("valid measurement has uncertainty");
        assert_eq!(uncertainty.len(), measurement.data.len());
    }
}

#[test]
fn test_imu_measurement_layout() {
    let config = SensorConfig::default();
    let mut imu = Imu::new(&config, seeded(1)).unwrap();
    let input = ImuInput {
        specific_force: Vector3::new(0.01, 0.0, -0.02),
        angular_rate: Vector3::new(0.001, 0.0, 0.0),
    };

    let measurement = imu.measure(&input, 1.5).unwrap();

    assert_eq!(measurement.kind, SensorKind::Imu);
    assert!(measurement.valid);
    assert_eq!(measurement.timestamp, 1.5);
    assert_widths_match(&measurement);
    assert_eq!(
        measurement.uncertainty.unwrap(),
        vec![1e-4, 1e-4, 1e-4, 1e-6, 1e-6, 1e-6]
    );
    assert!((measurement.data[0] - 0.01).abs() < 1e-3);
    assert!((measurement.data[3] - 0.001).abs() < 1e-5);
}

#[test]
fn test_imu_applies_bias_and_keeps_history() {
    let config = SensorConfig {
        imu_accel_noise: 0.0,
        imu_gyro_noise: 0.0,
        imu_accel_bias: Vector3::new(0.5, 0.0, 0.0),
        imu_gyro_bias: Vector3::new(0.0, 0.25, 0.0),
        ..SensorConfig::default()
    };
    let mut imu = Imu::new(&config, seeded(2)).unwrap();
    let input = ImuInput {
        specific_force: Vector3::zeros(),
        angular_rate: Vector3::zeros(),
    };

    for step in 0..3 {
        let measurement = imu.measure(&input, f64::from(step)).unwrap();
        assert_eq!(measurement.data, vec![0.5, 0.0, 0.0, 0.0, 0.25, 0.0]);
    }

    assert_eq!(imu.history_len(), 3);
    let timestamps: Vec<f64> = imu.history().map(|s| s.timestamp).collect();
    assert_eq!(timestamps, vec![0.0, 1.0, 2.0]);
}

#[test]
fn test_star_tracker_output_is_unit_quaternion() {
    let config = SensorConfig {
        star_tracker_noise: 0.05,
        ..SensorConfig::default()
    };
    let mut tracker = StarTracker::new(&config, seeded(3)).unwrap();
    let attitude = Vector4::new(0.7, 0.1, -0.1, 0.7);

    for step in 0..50 {
        let measurement = tracker.measure(&attitude, f64::from(step)).unwrap();
        assert_widths_match(&measurement);
        let norm = measurement.data.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12, "quaternion norm {norm}");
        assert_eq!(measurement.uncertainty.as_ref().unwrap(), &vec![0.05; 4]);
    }

    assert_eq!(tracker.update_rate_hz(), 5.0);
}

#[test]
fn test_sun_sensor_in_view() {
    let config = SensorConfig::default();
    let mut sun = SunSensor::new(&config, seeded(4)).unwrap();

    let measurement = sun.measure(&Vector3::new(0.5, 0.3, 0.8), 2.0).unwrap();

    assert!(measurement.valid);
    assert_widths_match(&measurement);
    let norm = measurement.data.iter().map(|v| v * v).sum::<f64>().sqrt();
    assert!((norm - 1.0).abs() < 1e-12);
}

#[test]
fn test_sun_sensor_out_of_view_is_invalid() {
    let config = SensorConfig::default();
    let mut sun = SunSensor::new(&config, seeded(5)).unwrap();

    // 90 degrees off boresight, beyond the 60 degree half-angle
    let measurement = sun.measure(&Vector3::new(1.0, 0.0, 0.0), 3.0).unwrap();

    assert!(!measurement.valid);
    assert_eq!(measurement.data, vec![0.0; 3]);
    assert!(measurement.uncertainty.is_none());
    assert_eq!(measurement.timestamp, 3.0);
}

#[test]
fn test_sun_sensor_boundary_angle_is_invalid() {
    let direction: Vector3<f64> = Vector3::new(1.0, 0.0, 1.0);
    let half_angle = boresight_angle(&direction.normalize());
    let config = SensorConfig {
        sun_sensor_fov: 2.0 * half_angle,
        ..SensorConfig::default()
    };
    let mut sun = SunSensor::new(&config, seeded(6)).unwrap();

    assert!(!sun.in_view(&direction).unwrap());
    assert!(!sun.measure(&direction, 0.0).unwrap().valid);

    let inside = Vector3::new(0.99, 0.0, 1.0);
    assert!(sun.in_view(&inside).unwrap());
    assert!(sun.measure(&inside, 0.0).unwrap().valid);
}

#[test]
fn test_sun_sensor_rejects_zero_direction() {
    let mut sun = SunSensor::new(&SensorConfig::default(), seeded(7)).unwrap();
    let result = sun.measure(&Vector3::zeros(), 0.0);
    assert!(matches!(result, Err(GncError::DegenerateVector { .. })));
}

#[test]
fn test_camera_field_of_view_from_optics() {
    let camera = OpticalCamera::new(&SensorConfig::default(), seeded(8)).unwrap();
    let expected = 2.0 * (1024.0 * 5e-6 / (2.0 * 0.1_f64)).atan();
    assert!((camera.fov() - expected).abs() < 1e-15);
    assert!((camera.angular_noise() - 5e-5).abs() < 1e-15);
    assert_eq!(camera.resolution(), (1024, 1024));
}

#[test]
fn test_camera_line_of_sight() {
    let mut camera = OpticalCamera::new(&SensorConfig::default(), seeded(9)).unwrap();

    let on_axis = camera.measure(&Vector3::new(0.1, -0.2, 300.0), 4.0).unwrap();
    assert!(on_axis.valid);
    assert_widths_match(&on_axis);
    assert_eq!(on_axis.uncertainty.as_ref().unwrap(), &vec![5e-5; 3]);
    assert!(on_axis.data[2] > 0.999);

    // Roughly 29 degrees off boresight against a ~1.5 degree half-angle
    let off_axis = camera.measure(&Vector3::new(100.0, 50.0, 200.0), 4.0).unwrap();
    assert!(!off_axis.valid);
    assert_eq!(off_axis.data, vec![0.0; 3]);
}

#[test]
fn test_camera_boundary_angle_is_invalid() {
    // 1024 px of 2^-10 m over a 0.5 m focal length: half field of view is atan(1)
    let config = SensorConfig {
        camera_focal_length: 0.5,
        camera_pixel_size: 0.000_976_562_5,
        camera_resolution: (1024, 1024),
        ..SensorConfig::default()
    };
    let mut camera = OpticalCamera::new(&config, seeded(14)).unwrap();
    let half_fov = camera.fov() / 2.0;
    assert_eq!(half_fov, 1.0_f64.atan());

    let boundary: Vector3<f64> = Vector3::new(1.0, 0.0, 1.0);
    let angle = boresight_angle(&unit_vector(&boundary, "boundary").unwrap());
    assert!((angle - half_fov).abs() < 1e-15);
    assert!(angle >= half_fov);

    assert!(!camera.in_view(&boundary).unwrap());
    let measurement = camera.measure(&boundary, 2.0).unwrap();
    assert!(!measurement.valid);
    assert_eq!(measurement.data, vec![0.0; 3]);

    let inside = Vector3::new(0.99, 0.0, 1.0);
    assert!(camera.in_view(&inside).unwrap());
    assert!(camera.measure(&inside, 2.0).unwrap().valid);
}

#[test]
fn test_camera_zero_vector_is_a_computation_fault() {
    let mut camera = OpticalCamera::new(&SensorConfig::default(), seeded(10)).unwrap();
    let result = camera.measure(&Vector3::zeros(), 0.0);
    assert!(matches!(result, Err(GncError::DegenerateVector { .. })));
}

#[test]
fn test_lidar_range_and_normal() {
    let mut lidar = Lidar::new(&SensorConfig::default(), seeded(11)).unwrap();
    let input = LidarInput {
        distance: 223.6,
        surface_normal: Vector3::new(0.0, 0.0, 1.0),
    };

    let measurement = lidar.measure(&input, 5.0).unwrap();

    assert!(measurement.valid);
    assert_widths_match(&measurement);
    assert!((measurement.data[0] - 223.6).abs() < 1.0);
    let normal_norm = measurement.data[1..].iter().map(|v| v * v).sum::<f64>().sqrt();
    assert!((normal_norm - 1.0).abs() < 1e-12);
    let uncertainty = measurement.uncertainty.unwrap();
    assert_eq!(uncertainty[0], 0.1);
    assert!((uncertainty[1] - 1.0_f64.to_radians()).abs() < 1e-15);
}

#[test]
fn test_lidar_max_range_is_inclusive() {
    let mut lidar = Lidar::new(&SensorConfig::default(), seeded(12)).unwrap();
    assert_eq!(lidar.max_range(), 5000.0);

    let at_limit = LidarInput {
        distance: 5000.0,
        surface_normal: Vector3::z(),
    };
    assert!(lidar.measure(&at_limit, 0.0).unwrap().valid);

    let beyond = LidarInput {
        distance: 5000.5,
        surface_normal: Vector3::z(),
    };
    let measurement = lidar.measure(&beyond, 0.0).unwrap();
    assert!(!measurement.valid);
    assert_eq!(measurement.data, vec![0.0; 4]);
    assert!(measurement.uncertainty.is_none());
}

#[test]
fn test_lidar_negative_distance_is_invalid() {
    let mut lidar = Lidar::new(&SensorConfig::default(), seeded(13)).unwrap();
    let input = LidarInput {
        distance: -10.0,
        surface_normal: Vector3::z(),
    };

    let measurement = lidar.measure(&input, 1.0).unwrap();

    assert!(!measurement.valid);
    assert_eq!(measurement.data, vec![0.0; 4]);

    let at_zero = LidarInput {
        distance: 0.0,
        surface_normal: Vector3::z(),
    };
    assert!(lidar.measure(&at_zero, 1.0).unwrap().valid);
}

#[test]
fn test_negative_noise_is_rejected() {
    let config = SensorConfig {
        lidar_range_noise: -0.1,
        ..SensorConfig::default()
    };
    assert!(matches!(
        Lidar::new(&config, seeded(13)),
        Err(GncError::InvalidNoise { .. })
    ));
    assert!(SensorSuite::new(&config).is_err());
}

#[test]
fn test_suite_reports_only_applicable_sensors() {
    let mut suite = SensorSuite::with_seed(21).unwrap();
    let measurements = suite.get_all_measurements(&TrueState::default(), 0.0).unwrap();

    assert_eq!(measurements.len(), 2);
    assert!(measurements.contains(SensorKind::Imu));
    assert!(measurements.contains(SensorKind::StarTracker));
    assert!(!measurements.contains(SensorKind::SunSensor));
    assert!(!measurements.contains(SensorKind::OpticalCamera));
    assert!(!measurements.contains(SensorKind::Lidar));
}

#[test]
fn test_suite_lidar_defaults_surface_normal() {
    let mut suite = SensorSuite::with_seed(22).unwrap();
    let truth = TrueState {
        target_distance: Some(100.0),
        ..TrueState::default()
    };

    let measurements = suite.get_all_measurements(&truth, 0.0).unwrap();
    let lidar = measurements.valid(SensorKind::Lidar).unwrap();
    assert!(lidar.data[3] > 0.9);
}

#[test]
fn test_reference_scenario_measurement_set() {
    let mut suite = SensorSuite::with_seed(42).unwrap();
    let measurements = suite.get_all_measurements(&scenario_truth(), 10.0).unwrap();

    assert_eq!(measurements.len(), 5);
    for kind in SensorKind::ALL {
        let measurement = measurements.get(kind).unwrap();
        assert_eq!(measurement.timestamp, 10.0);
        assert_widths_match(measurement);
    }

    assert!(measurements.valid(SensorKind::Imu).is_some());
    assert!(measurements.valid(SensorKind::StarTracker).is_some());
    assert!(measurements.valid(SensorKind::SunSensor).is_some());
    assert!(measurements.valid(SensorKind::Lidar).is_some());
    // The target sits about 29 degrees off boresight, far outside the
    // narrow-angle camera's field of view.
    assert!(measurements.valid(SensorKind::OpticalCamera).is_none());
    assert_eq!(measurements.valid_count(), 4);

    assert_eq!(suite.last_measurements().len(), 5);
}

#[test]
fn test_seeded_suites_are_reproducible() {
    let mut a = SensorSuite::with_seed(99).unwrap();
    let mut b = SensorSuite::with_seed(99).unwrap();
    let truth = scenario_truth();

    for step in 0..5 {
        let t = f64::from(step) * 0.1;
        let ma = a.get_all_measurements(&truth, t).unwrap().clone();
        let mb = b.get_all_measurements(&truth, t).unwrap().clone();
        assert_eq!(ma, mb);
    }

    let mut c = SensorSuite::with_seed(100).unwrap();
    let mc = c.get_all_measurements(&truth, 0.0).unwrap().clone();
    let ma = SensorSuite::with_seed(99)
        .unwrap()
        .get_all_measurements(&truth, 0.0)
        .unwrap()
        .clone();
    assert_ne!(ma, mc);
}

#[test]
fn test_sensor_kinds_in_suite_order() {
    let suite = SensorSuite::with_seed(0).unwrap();
    assert_eq!(suite.sensor_kinds(), SensorKind::ALL);
}
