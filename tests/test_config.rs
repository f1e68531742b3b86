use gatehouse::config::{ConfigError, ServerConfig};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_config_minimal_uses_defaults() {
    let cfg = ServerConfig::from_yaml("port: 9090\n").unwrap();

    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.root, PathBuf::from("./www"));
    assert!(cfg.accept.is_empty());
    assert!(cfg.reject.is_empty());
    assert_eq!(cfg.access_log, PathBuf::from("logs/access.log"));
    assert_eq!(cfg.error_log, PathBuf::from("logs/error.log"));
    assert_eq!(cfg.max_connections, 64);
    assert_eq!(cfg.io_timeout(), Duration::from_secs(30));
    assert_eq!(cfg.default_document, "index.html");
}

#[test]
fn test_config_full_file() {
    let yaml = r#"
port: 8081
host: 127.0.0.1
root: /srv/site
accept:
  - "192.168.*"
  - "  10.0.0.1  "
  - ""
reject: ["203.0.113.1"]
access_log: /var/log/gh/access.log
error_log: /var/log/gh/error.log
max_connections: 8
io_timeout_secs: 5
default_document: home.html
"#;
    let cfg = ServerConfig::from_yaml(yaml).unwrap();

    assert_eq!(cfg.port, 8081);
    assert_eq!(cfg.root, PathBuf::from("/srv/site"));
    // Patterns are trimmed and blanks dropped.
    assert_eq!(cfg.accept, vec!["192.168.*", "10.0.0.1"]);
    assert_eq!(cfg.reject, vec!["203.0.113.1"]);
    assert_eq!(cfg.max_connections, 8);
    assert_eq!(cfg.io_timeout_secs, 5);
    assert_eq!(cfg.default_document, "home.html");
    assert_eq!(cfg.listen_addr().unwrap().to_string(), "127.0.0.1:8081");
}

#[test]
fn test_config_missing_port_is_rejected() {
    let result = ServerConfig::from_yaml("root: ./www\n");
    assert!(matches!(result, Err(ConfigError::MissingPort)));
}

#[test]
fn test_config_out_of_range_ports_are_rejected() {
    for port in [0i64, 65536, -1] {
        let result = ServerConfig::from_yaml(&format!("port: {}\n", port));
        assert!(
            matches!(result, Err(ConfigError::InvalidPort(p)) if p == port),
            "port {} should be invalid",
            port
        );
    }
}

#[test]
fn test_config_non_numeric_port_is_parse_error() {
    let result = ServerConfig::from_yaml("port: eighty\n");
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn test_config_unknown_field_is_parse_error() {
    let result = ServerConfig::from_yaml("port: 80\nacceslog: x.log\n");
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn test_config_zero_limits_are_invalid() {
    let result = ServerConfig::from_yaml("port: 80\nmax_connections: 0\n");
    assert!(matches!(
        result,
        Err(ConfigError::Invalid { field: "max_connections", .. })
    ));

    let result = ServerConfig::from_yaml("port: 80\nmax_connections: 18446744073709551615\n");
    assert!(matches!(
        result,
        Err(ConfigError::Invalid { field: "max_connections", .. })
    ));

    let result = ServerConfig::from_yaml("port: 80\nio_timeout_secs: 0\n");
    assert!(matches!(
        result,
        Err(ConfigError::Invalid { field: "io_timeout_secs", .. })
    ));
}

#[test]
fn test_config_default_document_must_be_a_file_name() {
    let result = ServerConfig::from_yaml("port: 80\ndefault_document: a/b.html\n");
    assert!(matches!(
        result,
        Err(ConfigError::Invalid { field: "default_document", .. })
    ));
}

#[test]
fn test_config_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gatehouse.yaml");
    std::fs::write(&path, "port: 7000\nreject: [\"10.*\"]\n").unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 7000);
    assert_eq!(cfg.reject, vec!["10.*"]);
}

#[test]
fn test_config_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.yaml");

    match ServerConfig::load(&path) {
        Err(ConfigError::Read { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected read error, got {:?}", other),
    }
}

#[test]
fn test_config_load_malformed_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "port: [unclosed\n").unwrap();

    match ServerConfig::load(&path) {
        Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_config_clone() {
    let cfg1 = ServerConfig::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1, cfg2);
    assert_eq!(cfg1.listen_addr().unwrap().port(), 8080);
}

#[test]
fn test_shipped_config_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/gatehouse.yaml");
    let cfg = ServerConfig::load(&path).unwrap();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.reject, vec!["203.0.113.*".to_string()]);
    assert!(cfg.listen_addr().is_ok());
}

#[test]
fn test_listen_addr_accepts_ipv6_hosts() {
    let cfg = ServerConfig::from_yaml("port: 8080\nhost: \"::\"\n").unwrap();
    assert_eq!(cfg.listen_addr().unwrap().to_string(), "[::]:8080");

    let cfg = ServerConfig::from_yaml("port: 8080\nhost: 127.0.0.1\n").unwrap();
    assert_eq!(cfg.listen_addr().unwrap().to_string(), "127.0.0.1:8080");

    let cfg = ServerConfig::from_yaml("port: 8080\nhost: not-an-ip\n").unwrap();
    assert!(cfg.listen_addr().is_err());
}
