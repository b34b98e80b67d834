//! Configuration loading from disk

use secrecy::ExposeSecret;
use sentinel_core::config::ConfigManager;
use sentinel_core::{ConfigError, PublicHost, SelectionRequest};

const CONFIG: &str = r#"
servers:
  - name: web1
    host: 10.0.0.1
    user: root
    password: "hunter2"
  - name: web2
    host: 10.0.0.2
    user: root
    key_path: "~/.ssh/id_rsa"
  - name: db1
    host: 10.0.0.3
    port: 2200
    user: postgres
    password: "pw"
    key_path: "~/.ssh/id_rsa"
probe:
  max_concurrency: 2
  verify_host_key: true
schedule:
  enabled: false
  daily_at: "05:15"
logging:
  level: debug
smtp:
  host: smtp.example.com
  port: 587
"#;

#[test]
fn loads_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, CONFIG).unwrap();

    let manager = ConfigManager::load(&path).unwrap();
    assert_eq!(manager.path(), Some(path.as_path()));

    let registry = manager.registry();
    let names: Vec<&str> = registry.hosts().iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, ["web1", "web2", "db1"]);
    assert_eq!(registry.get("db1").unwrap().port, 2200);
    assert_eq!(
        registry.get("web1").unwrap().password.as_ref().unwrap().expose_secret(),
        "hunter2"
    );

    let config = manager.config();
    assert_eq!(config.probe.max_concurrency, 2);
    assert!(config.probe.verify_host_key);
    assert!(!config.schedule.enabled);
    assert_eq!(config.schedule.daily_schedule().unwrap().to_string(), "05:15");
}

#[test]
fn loads_toml_file_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sentinel.toml");
    std::fs::write(
        &path,
        r#"
[[servers]]
name = "web1"
host = "10.0.0.1"
user = "root"
key_path = "/etc/sentinel/id_ed25519"

[probe]
connect_timeout_secs = 5
"#,
    )
    .unwrap();

    let manager = ConfigManager::load(&path).unwrap();
    assert_eq!(manager.registry().len(), 1);
    assert_eq!(manager.config().probe.connect_timeout_secs, 5);
    assert_eq!(manager.config().probe.reachability_timeout_secs, 2);
}

#[test]
fn public_view_excludes_credentials() {
    let manager = ConfigManager::from_yaml_str(CONFIG).unwrap();
    let json = manager.registry().public_hosts_json().unwrap();

    assert!(!json.contains("hunter2"));
    assert!(!json.contains("id_rsa"));
    assert!(!json.contains("password"));

    let hosts: Vec<PublicHost> = serde_json::from_str(&json).unwrap();
    assert_eq!(hosts.len(), 3);
    assert_eq!(hosts[2].user, "postgres");
}

#[test]
fn host_without_credential_is_accepted() {
    let manager =
        ConfigManager::from_yaml_str("servers:\n  - {name: bare, host: 10.0.0.9}\n").unwrap();
    let host = manager.registry().get("bare").unwrap();
    assert!(!host.has_credential());
    assert_eq!(host.port, 22);
}

#[test]
fn selection_resolves_against_loaded_registry() {
    let manager = ConfigManager::from_yaml_str(CONFIG).unwrap();
    let resolved = manager
        .registry()
        .resolve(&SelectionRequest::from_names(["db1", "web1", "db1", "ghost"]));
    let names: Vec<&str> = resolved.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, ["web1", "db1"]);
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        "servers:\n  - {name: '', host: h}\n",
        "servers:\n  - {name: a, host: ''}\n",
        "servers:\n  - {name: a, host: h, port: 0}\n",
        "schedule:\n  daily_at: '7am'\n",
        "probe:\n  max_concurrency: 0\n",
    ];
    for yaml in cases {
        assert!(
            matches!(ConfigManager::from_yaml_str(yaml), Err(ConfigError::Validation(_))),
            "expected validation error for {yaml:?}"
        );
    }
}

#[test]
fn unreadable_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigManager::load(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}
