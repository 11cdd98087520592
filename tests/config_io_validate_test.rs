use porssi::config::Config;
use std::fs;

#[test]
fn save_and_load_yaml_roundtrip() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("config.yaml");

    let mut cfg = Config::default();
    cfg.api.base_url = "http://127.0.0.1:8080".to_string();
    cfg.display.cheap_threshold = 3.0;
    cfg.logging.file = path.with_extension("log").to_string_lossy().to_string();

    cfg.save_to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();

    assert_eq!(loaded.api.base_url, "http://127.0.0.1:8080");
    assert_eq!(loaded.display.cheap_threshold, 3.0);
    assert_eq!(loaded.logging.file, cfg.logging.file);
    assert!(loaded.validate().is_ok());
}

#[test]
fn config_validation_errors() {
    let mut cfg = Config::default();

    // Empty base URL
    cfg.api.base_url.clear();
    assert!(cfg.validate().is_err());

    // Non-http scheme
    cfg = Config::default();
    cfg.api.base_url = "ftp://api.porssisahko.net".to_string();
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.api.request_timeout_seconds = 0;
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.display.timezone = "Not/AZone".to_string();
    assert!(cfg.validate().is_err());

    // Thresholds inverted
    cfg = Config::default();
    cfg.display.cheap_threshold = 20.0;
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.refresh_interval_minutes = 0;
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.web.port = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn partial_yaml_keeps_defaults() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), b"display:\n  timezone: UTC\nrefresh_interval_minutes: 15\n").unwrap();
    let cfg = Config::from_file(tmp.path()).unwrap();
    assert_eq!(cfg.display.timezone, "UTC");
    assert_eq!(cfg.display.expensive_threshold, 15.0);
    assert_eq!(cfg.refresh_interval_minutes, 15);
    assert_eq!(cfg.api.base_url, "https://api.porssisahko.net");
    assert!(cfg.validate().is_ok());
}

#[test]
fn from_file_with_invalid_yaml_fails() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), b"bad: [unclosed").unwrap();
    let err = Config::from_file(tmp.path()).unwrap_err();
    let msg = format!("{}", err);
    assert!(msg.contains("Serialization error"));
}

#[test]
fn from_missing_file_is_io_error() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(tmp_dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, porssi::PorssiError::Io { .. }));
}
