use gncsim::*;
use nalgebra::Vector3;

#[test]
fn test_default_configuration() {
    let config = GncConfig::default();
    assert_eq!(config.rdv_arrival_position, Vector3::new(20.0, 0.0, 0.0));
    assert_eq!(config.rdv_position_tolerance, 2.4);
    assert_eq!(config.rdv_velocity_tolerance, 0.12);
    assert_eq!(config.tag_landing_accuracy, 25.0);
    assert_eq!(config.tag_attitude_tolerance, 10.0);
    assert_eq!(config.tag_vertical_velocity, 0.10);
    assert_eq!(config.tag_horizontal_velocity, 0.05);
    assert_eq!(config.control_frequency, 10.0);
    assert_eq!(config.navigation_frequency, 5.0);
    assert_eq!(config.guidance_frequency, 1.0);
    assert_eq!(config.min_safe_distance, 50.0);
    assert_eq!(config.max_approach_velocity, 0.5);
    assert_eq!(config.abort_altitude, 100.0);
    assert_eq!(config.attitude_accuracy, 0.1);
    assert_eq!(config.position_accuracy, 25.0);
    assert_eq!(config.velocity_accuracy, 0.025);
}

#[test]
fn test_json_overrides_keep_remaining_defaults() {
    let config = GncConfig::from_json_str(
        r#"{
            "min_safe_distance": 75.0,
            "control_frequency": 20,
            "rdv_arrival_position": [10.0, -2.0, 0.5]
        }"#,
    )
    .unwrap();

    assert_eq!(config.min_safe_distance, 75.0);
    assert_eq!(config.control_frequency, 20.0);
    assert_eq!(config.rdv_arrival_position, Vector3::new(10.0, -2.0, 0.5));
    assert_eq!(config.max_approach_velocity, 0.5);
    assert_eq!(config.guidance_frequency, 1.0);
}

#[test]
fn test_unknown_key_is_rejected() {
    let result = GncConfig::from_json_str(r#"{"min_safe_distance": 60.0, "warp_drive": 9.0}"#);
    match result {
        Err(GncError::UnknownConfigKey(key)) => assert_eq!(key, "warp_drive"),
        other => panic!("expected unknown key error, got {other:?}"),
    }
}

#[test]
fn test_out_of_range_values_are_rejected() {
    for json in [
        r#"{"navigation_frequency": 0.0}"#,
        r#"{"max_approach_velocity": -0.5}"#,
        r#"{"tag_attitude_tolerance": 270.0}"#,
    ] {
        assert!(
            matches!(
                GncConfig::from_json_str(json),
                Err(GncError::InvalidConfigValue { .. })
            ),
            "{json} should be rejected"
        );
    }
}

#[test]
fn test_malformed_document_is_rejected() {
    assert!(matches!(
        GncConfig::from_json_str("{ not json"),
        Err(GncError::ConfigParse(_))
    ));
    assert!(matches!(
        GncConfig::from_json_str(r#"{"min_safe_distance": "far"}"#),
        Err(GncError::ConfigParse(_))
    ));
    assert!(matches!(
        GncConfig::from_json_str("[1, 2, 3]"),
        Err(GncError::ConfigParse(_))
    ));
}

#[test]
fn test_configuration_file_round_trip() {
    let path = std::env::temp_dir().join(format!("gncsim-config-{}.json", std::process::id()));
    let mut config = GncConfig::default();
    config.set(ConfigKey::AbortAltitude, 150.0).unwrap();
    std::fs::write(&path, config.to_json_pretty().unwrap()).unwrap();

    let loaded = GncConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, config);
    assert_eq!(loaded.abort_altitude, 150.0);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let result = GncConfig::from_json_file("/nonexistent/gncsim/config.json");
    assert!(matches!(result, Err(GncError::ConfigIo(_))));
}

#[test]
fn test_keyed_access() {
    let mut config = GncConfig::default();

    assert_eq!(config.get(ConfigKey::MinSafeDistance), Some(50.0));
    assert_eq!(config.get(ConfigKey::RdvArrivalPosition), None);

    config.set(ConfigKey::GuidanceFrequency, 2.0).unwrap();
    assert_eq!(config.guidance_frequency, 2.0);

    assert!(config.set(ConfigKey::RdvArrivalPosition, 1.0).is_err());
    assert!(config.set(ConfigKey::GuidanceFrequency, f64::NAN).is_err());
    assert_eq!(config.guidance_frequency, 2.0);

    config
        .set_arrival_position(Vector3::new(15.0, 1.0, 0.0))
        .unwrap();
    assert_eq!(config.rdv_arrival_position.x, 15.0);
}

#[test]
fn test_key_names_and_units() {
    assert_eq!(
        "max_approach_velocity".parse::<ConfigKey>().unwrap(),
        ConfigKey::MaxApproachVelocity
    );
    assert!("maxApproachVelocity".parse::<ConfigKey>().is_err());
    assert_eq!(ConfigKey::ControlFrequency.unit(), "Hz");
    assert_eq!(ConfigKey::TagAttitudeTolerance.unit(), "deg");
    assert_eq!(ConfigKey::ALL.len(), 16);
}
