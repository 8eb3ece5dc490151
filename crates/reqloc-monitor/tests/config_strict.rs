#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use reqloc_monitor::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
monitor:
  listen: "0.0.0.0:1919"
  default_windw_secs: 30 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.monitor.listen, "0.0.0.0:1919");
    assert_eq!(cfg.monitor.default_window_secs, 60);
    assert_eq!(cfg.monitor.retention_secs, 3600);
}

#[test]
fn retention_shorter_than_window_is_rejected() {
    let bad = r#"
version: 1
monitor:
  default_window_secs: 600
  retention_secs: 60
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn retention_zero_disables_sweep() {
    let ok = r#"
version: 1
monitor:
  retention_secs: 0
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.monitor.retention_secs, 0);
}

#[test]
fn wrong_version_is_rejected() {
    assert!(config::load_from_str("version: 2\n").is_err());
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let cfg = config::load_or_default("/nonexistent/reqloc-monitor.yaml").expect("defaults");
    assert_eq!(cfg.monitor.default_window_secs, 60);
}

#[test]
fn load_from_file_reads_yaml() {
    let path = std::env::temp_dir().join(format!("reqloc-monitor-{}.yaml", std::process::id()));
    std::fs::write(&path, "version: 1\nmonitor:\n  default_window_secs: 120\n").unwrap();
    let cfg = config::load_from_file(path.to_str().unwrap()).expect("must load");
    assert_eq!(cfg.monitor.default_window_secs, 120);
    let _ = std::fs::remove_file(&path);
}
