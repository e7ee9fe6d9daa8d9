// Config loading and validation tests

use sensor_averages::averages::MalformedPolicy;
use sensor_averages::config::AppConfig;
use std::time::Duration;

const VALID_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[database]
path = "data/readings.db"
max_pool_size = 4

[averages]
refresh_threshold_secs = 3600
poll_interval_secs = 60
on_malformed = "skip"

[time]
zone = "Africa/Tunis"
"#;

const MINIMAL_CONFIG: &str = r#"
[server]
port = 8081
host = "127.0.0.1"

[database]
path = "data/readings.db"
max_pool_size = 4
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.database.path, "data/readings.db");
    assert_eq!(config.database.max_pool_size, 4);
    assert_eq!(config.averages.refresh_threshold(), Duration::from_secs(3600));
    assert_eq!(config.averages.poll_interval(), Duration::from_secs(60));
    assert_eq!(config.averages.on_malformed, MalformedPolicy::Skip);
    assert_eq!(config.time.tz().unwrap(), chrono_tz::Africa::Tunis);
}

#[test]
fn test_config_defaults() {
    let config = AppConfig::load_from_str(MINIMAL_CONFIG).expect("load_from_str");
    assert_eq!(config.averages.refresh_threshold_secs, 3600);
    assert_eq!(config.averages.poll_interval_secs, 60);
    assert_eq!(config.averages.on_malformed, MalformedPolicy::Abort);
    assert_eq!(config.time.tz().unwrap(), chrono_tz::Europe::Paris);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8081", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_db_path() {
    let bad = VALID_CONFIG.replace("path = \"data/readings.db\"", "path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("database.path"));
}

#[test]
fn test_config_validation_rejects_max_pool_size_zero() {
    let bad = VALID_CONFIG.replace("max_pool_size = 4", "max_pool_size = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("max_pool_size"));
}

#[test]
fn test_config_validation_rejects_refresh_threshold_zero() {
    let bad = VALID_CONFIG.replace("refresh_threshold_secs = 3600", "refresh_threshold_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("refresh_threshold_secs"));
}

#[test]
fn test_config_validation_rejects_poll_interval_zero() {
    let bad = VALID_CONFIG.replace("poll_interval_secs = 60", "poll_interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("poll_interval_secs"));
}

#[test]
fn test_config_validation_rejects_unknown_zone() {
    let bad = VALID_CONFIG.replace("Africa/Tunis", "Mars/Olympus_Mons");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("time.zone"));
}

#[test]
fn test_config_rejects_unknown_malformed_policy() {
    let bad = VALID_CONFIG.replace("on_malformed = \"skip\"", "on_malformed = \"retry\"");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn test_config_rejects_missing_server_section() {
    let bad = MINIMAL_CONFIG.replace("[server]\nport = 8081\nhost = \"127.0.0.1\"\n", "");
    assert!(AppConfig::load_from_str(&bad).is_err());
}
