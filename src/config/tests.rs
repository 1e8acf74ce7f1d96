use super::settings::Settings;
use super::{load_config, load_config_from};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.relay.send_timeout_ms, 5000);
    assert_eq!(settings.relay.outbound_buffer, 64);
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn load_config_without_sources_uses_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let missing = tmp.path().join("absent");

    let cfg = load_config_from(missing.to_str().unwrap()).expect("load_config failed");
    assert_eq!(cfg, Settings::default());
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = tmp.path().join("relay.toml");
    let toml = r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [relay]
        send_timeout_ms = 250
    "#;
    fs::write(&path, toml).expect("write config file");

    let cfg = load_config_from(path.to_str().unwrap()).expect("load_config failed");
    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.relay.send_timeout_ms, 250);
    // untouched keys keep their defaults
    assert_eq!(cfg.relay.outbound_buffer, 64);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = tmp.path().join("relay.toml");
    fs::write(&path, "[server]\nport = 9000\n").expect("write config file");

    temp_env::with_vars(
        [
            ("WSRELAY__SERVER__PORT", Some("9100")),
            ("WSRELAY__RELAY__OUTBOUND_BUFFER", Some("8")),
            ("WSRELAY__LOGGING__LEVEL", Some("debug")),
        ],
        || {
            let cfg = load_config_from(path.to_str().unwrap()).expect("load_config failed");
            assert_eq!(cfg.server.port, 9100);
            assert_eq!(cfg.relay.outbound_buffer, 8);
            assert_eq!(cfg.logging.level, "debug");
        },
    );
}

#[test]
#[serial]
fn invalid_value_is_an_error() {
    temp_env::with_var("WSRELAY__SERVER__PORT", Some("not-a-port"), || {
        assert!(load_config().is_err());
    });
}
