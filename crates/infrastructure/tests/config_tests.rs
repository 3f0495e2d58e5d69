use infrastructure::ServerConfig;

fn fixture_dir() -> String {
    format!("{}/tests/fixtures/config", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn test_defaults_without_config_files() {
    let config = ServerConfig::load("/nonexistent/attendance-config").unwrap();

    assert_eq!(config.http.port, 8080);
    assert_eq!(config.database.max_connections, 5);
    assert!(config.mqtt.is_none());
}

#[test]
fn test_load_from_file() {
    let config = ServerConfig::load(&fixture_dir()).unwrap();

    assert_eq!(config.http.host, "127.0.0.1");
    assert_eq!(config.http.port, 9090);
    assert_eq!(config.database.max_connections, 3);

    let mqtt = config.mqtt.expect("mqtt section");
    assert_eq!(mqtt.host, "broker.local");
    assert_eq!(mqtt.port, 1883);
    // Unset keys fall back to their serde defaults
    assert_eq!(mqtt.client_id, "attendance-server");
    assert_eq!(mqtt.topic, "attendance/#");
}
