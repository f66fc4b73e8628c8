// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证 config_kv 读取、默认值回落与非法配置即时失败
// ==========================================


use simontok_stockout::config::{
    config_keys, ConfigError, ConfigManager, PredictionConfig, PredictionConfigReader,
};
use simontok_stockout::domain::types::DaysRounding;
use test_helpers::{create_test_db, insert_config, open_test_connection};

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_empty_config_uses_defaults() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let config = PredictionConfigReader::load_prediction_config(&config_manager)
        .await
        .expect("defaults should load");

    assert_eq!(config, PredictionConfig::default());
    assert_eq!(config.window_days, 30);
    assert_eq!(config.trend_threshold, 0.10);
    assert_eq!(config.severity.critical_days, 1.0);
    assert_eq!(config.severity.high_days, 3.0);
    assert_eq!(config.severity.medium_days, 5.0);
    assert_eq!(config.critical_filter_days, 5.0);
    assert_eq!(config.days_rounding, DaysRounding::Exact);
}

#[tokio::test]
async fn test_stored_values_override_defaults() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_config(&conn, config_keys::WINDOW_DAYS, "14").unwrap();
    insert_config(&conn, config_keys::TREND_THRESHOLD, " 0.2 ").unwrap();
    insert_config(&conn, config_keys::SEVERITY_HIGH_DAYS, "2.5").unwrap();
    insert_config(&conn, config_keys::CRITICAL_FILTER_DAYS, "4").unwrap();
    insert_config(&conn, config_keys::DAYS_ROUNDING, "ROUND").unwrap();

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let config = config_manager.load_prediction_config().unwrap();

    assert_eq!(config.window_days, 14);
    assert_eq!(config.trend_threshold, 0.2);
    assert_eq!(config.severity.high_days, 2.5);
    assert_eq!(config.critical_filter_days, 4.0);
    assert_eq!(config.days_rounding, DaysRounding::Round);
}

#[tokio::test]
async fn test_zero_window_fails_fast() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_config(&conn, config_keys::WINDOW_DAYS, "0").unwrap();

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let err = config_manager.load_prediction_config().unwrap_err();

    assert!(matches!(err, ConfigError::InvalidWindow(0)));
}

#[tokio::test]
async fn test_unordered_thresholds_fail_fast() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_config(&conn, config_keys::SEVERITY_CRITICAL_DAYS, "4").unwrap();
    insert_config(&conn, config_keys::SEVERITY_HIGH_DAYS, "3").unwrap();

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let err = config_manager.load_prediction_config().unwrap_err();

    assert!(matches!(err, ConfigError::UnorderedThresholds { .. }));
}

#[tokio::test]
async fn test_unknown_rounding_fails_fast() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_config(&conn, config_keys::DAYS_ROUNDING, "ceil").unwrap();

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let err = config_manager.load_prediction_config().unwrap_err();

    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == config_keys::DAYS_ROUNDING));
}

#[tokio::test]
async fn test_config_snapshot_reflects_stored_keys() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_config(&conn, config_keys::SEVERITY_MEDIUM_DAYS, "6").unwrap();

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let snapshot: serde_json::Value =
        serde_json::from_str(&config_manager.get_config_snapshot().unwrap()).unwrap();

    assert_eq!(snapshot[config_keys::SEVERITY_MEDIUM_DAYS], "6");
}

#[tokio::test]
async fn test_oversized_window_fails_fast() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_config(&conn, config_keys::WINDOW_DAYS, "100000000").unwrap();

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let err = config_manager.load_prediction_config().unwrap_err();

    assert!(matches!(err, ConfigError::InvalidWindow(100_000_000)));
}

#[tokio::test]
async fn test_utc_offset_override_and_bounds() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_config(&conn, config_keys::UTC_OFFSET_MINUTES, "480").unwrap();

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let config = config_manager.load_prediction_config().unwrap();
    assert_eq!(config.utc_offset_minutes, 480);

    insert_config(&conn, config_keys::UTC_OFFSET_MINUTES, "2000").unwrap();
    let err = config_manager.load_prediction_config().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidUtcOffset(2000)));
}
