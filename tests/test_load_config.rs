use gemgrind::load_config::{load_config, LOGIN_SECURE_ENV, SESSION_ID_ENV};
use gemgrind_core::acceptance::{AcceptRule, AcceptancePolicy, ResponsePolicy};
use gemgrind_core::classify::{Filter, ITEM_CLASS_CARD};
use gemgrind_core::config::ValueSource;
use serial_test::serial;
use std::env;
use std::fs::write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), contents).expect("write temp config");
    file
}

fn set_secrets() {
    env::set_var(LOGIN_SECURE_ENV, "76561198000000000||token");
    env::remove_var(SESSION_ID_ENV);
}

/// Every section is optional; the defaults reproduce the classic run.
#[test]
#[serial]
fn test_load_config_defaults() {
    set_secrets();
    let file = config_file("steam:\n  profile: idieddude\n");

    let config = load_config(file.path()).expect("Config should load");

    assert_eq!(config.steam.base_url, "https://steamcommunity.com");
    assert_eq!(config.steam.profile.as_deref(), Some("idieddude"));
    assert_eq!(config.grind.app_id, 753);
    assert_eq!(config.grind.context_id, 6);
    assert_eq!(config.grind.inventory_count, 5000);
    assert_eq!(config.grind.filters, Filter::defaults());
    assert!(config.grind.protected.contains(ITEM_CLASS_CARD));
    assert_eq!(config.grind.value_source, ValueSource::Lookup);
    assert_eq!(config.grind.delay, Duration::ZERO);
    assert!(!config.grind.dry_run);
    assert_eq!(config.accept, AcceptancePolicy::ok_or_expired());
    assert_eq!(config.credentials.login_secure, "76561198000000000||token");
    assert!(config.credentials.session_id.is_none());
}

#[test]
#[serial]
fn test_load_config_full_file() {
    set_secrets();
    env::set_var(SESSION_ID_ENV, "abcdefabcdefabcdefabcdef");
    let file = config_file(
        r#"
steam:
  base_url: http://localhost:8080
  timeout_secs: 5
inventory:
  app_id: 753
  context_id: 6
  count: 2000
classify:
  filters: [duplicates]
  protected_classes: [item_class_3]
convert:
  value_source: link
  delay_ms: 1000
  accept:
    - status: 200
    - status: 500
"#,
    );

    let config = load_config(file.path()).expect("Config should load");
    env::remove_var(SESSION_ID_ENV);

    assert_eq!(config.steam.base_url, "http://localhost:8080");
    assert_eq!(config.steam.profile, None);
    assert_eq!(config.steam.timeout_secs, 5);
    assert_eq!(config.grind.inventory_count, 2000);
    assert_eq!(config.grind.filters, vec![Filter::Duplicates]);
    assert!(config.grind.protected.contains("item_class_3"));
    assert!(!config.grind.protected.contains(ITEM_CLASS_CARD));
    assert_eq!(config.grind.value_source, ValueSource::Link);
    assert_eq!(config.grind.delay, Duration::from_secs(1));
    assert_eq!(
        config.accept.rules,
        vec![AcceptRule::status(200), AcceptRule::status(500)]
    );
    assert!(config.accept.is_acceptable(500, ""));
    assert_eq!(
        config.credentials.session_id.as_deref(),
        Some("abcdefabcdefabcdefabcdef")
    );
}

#[test]
#[serial]
fn test_load_config_errors_for_invalid_file() {
    set_secrets();
    let file = config_file("not-yaml: [:::");

    let err = load_config(file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
#[serial]
fn test_load_config_rejects_unknown_filter() {
    set_secrets();
    let file = config_file("classify:\n  filters: [everything]\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("YAML"), "got: {err}");
}

#[test]
#[serial]
fn test_load_config_rejects_empty_accept_list() {
    set_secrets();
    let file = config_file("convert:\n  accept: []\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("accept"), "got: {err}");
}

#[test]
#[serial]
fn test_load_config_requires_login_secure() {
    env::remove_var(LOGIN_SECURE_ENV);
    let file = config_file("steam:\n  profile: idieddude\n");

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains(LOGIN_SECURE_ENV), "got: {err}");
}

#[test]
#[serial]
fn test_load_config_missing_file() {
    set_secrets();
    let err = load_config("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
