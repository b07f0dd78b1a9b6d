//! Configuration tests
//!
//! The round-trip tests guard the template: when a field is added to
//! `Config` it must also appear in `to_toml` and parse back to the same value.

use super::*;
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let toml_str = Config::default().to_toml();

    let parsed = Config::parse_file_config(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
}

#[test]
fn test_config_roundtrip_preserves_values() {
    let mut config = Config::default();
    config.api_url = "https://encrypt.example.com".to_string();
    config.request_timeout_secs = 30;
    config.probe_timeout_secs = 2;
    config.link_check_interval_secs = 0;
    config.clipboard.feedback_ms = 500;
    config.clipboard.osc52_fallback = false;
    config.logging.level = "debug".to_string();
    config.logging.file_enabled = true;
    config.logging.file_dir = PathBuf::from("/tmp/encryptor logs");
    config.logging.file_rotation = LogRotation::Hourly;
    config.logging.file_prefix = "enc".to_string();

    let file = Config::parse_file_config(&config.to_toml()).unwrap();
    let loaded = Config::from_sources(file, no_env);

    assert_eq!(loaded.api_url, "https://encrypt.example.com");
    assert_eq!(loaded.request_timeout_secs, 30);
    assert_eq!(loaded.probe_timeout_secs, 2);
    assert_eq!(loaded.link_check_interval_secs, 0);
    assert_eq!(loaded.clipboard.feedback_ms, 500);
    assert!(!loaded.clipboard.osc52_fallback);
    assert_eq!(loaded.logging.level, "debug");
    assert!(loaded.logging.file_enabled);
    assert_eq!(loaded.logging.file_dir, PathBuf::from("/tmp/encryptor logs"));
    assert_eq!(loaded.logging.file_rotation, LogRotation::Hourly);
    assert_eq!(loaded.logging.file_prefix, "enc");
}

#[test]
fn test_template_escapes_quotes() {
    let mut config = Config::default();
    config.logging.file_dir = PathBuf::from(r#"C:\logs\"quoted""#);

    let file = Config::parse_file_config(&config.to_toml()).unwrap();
    let loaded = Config::from_sources(file, no_env);

    assert_eq!(loaded.logging.file_dir, config.logging.file_dir);
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_file_uses_defaults() {
    let file = Config::parse_file_config("").unwrap();
    let config = Config::from_sources(file, no_env);

    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.request_timeout(), None);
    assert_eq!(config.clipboard.feedback(), Duration::from_secs(2));
    assert!(config.clipboard.osc52_fallback);
    assert_eq!(config.logging.file_rotation, LogRotation::Daily);
    assert_eq!(config.link_check_interval(), Some(Duration::from_secs(3)));
}

#[test]
fn test_env_overrides_file() {
    let file = Config::parse_file_config(
        r#"
api_url = "http://from-file:8000"
request_timeout_secs = 10
"#,
    )
    .unwrap();
    let env = env_from(&[
        ("ENCRYPTOR_API_URL", "http://from-env:9000"),
        ("ENCRYPTOR_REQUEST_TIMEOUT_SECS", "45"),
    ]);

    let config = Config::from_sources(file, env);

    assert_eq!(config.api_url, "http://from-env:9000");
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(45)));
}

#[test]
fn test_blank_or_invalid_env_is_ignored() {
    let file = Config::parse_file_config(
        r#"
api_url = "http://from-file:8000"
request_timeout_secs = 10
"#,
    )
    .unwrap();
    let env = env_from(&[
        ("ENCRYPTOR_API_URL", "  "),
        ("ENCRYPTOR_REQUEST_TIMEOUT_SECS", "soon"),
    ]);

    let config = Config::from_sources(file, env);

    assert_eq!(config.api_url, "http://from-file:8000");
    assert_eq!(config.request_timeout_secs, 10);
}

#[test]
fn test_partial_sections_fill_defaults() {
    let file = Config::parse_file_config(
        r#"
[clipboard]
feedback_ms = 750

[logging]
file_rotation = "NEVER"
"#,
    )
    .unwrap();

    let config = Config::from_sources(file, no_env);

    assert_eq!(config.clipboard.feedback_ms, 750);
    assert!(config.clipboard.osc52_fallback);
    assert_eq!(config.logging.file_rotation, LogRotation::Never);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_broken_file_is_an_error() {
    assert!(Config::parse_file_config("api_url = ").is_err());
    assert!(Config::parse_file_config("request_timeout_secs = \"ten\"").is_err());
}

#[test]
fn test_zero_timeouts() {
    let mut config = Config::default();
    config.request_timeout_secs = 0;
    config.probe_timeout_secs = 0;
    config.link_check_interval_secs = 0;

    assert_eq!(config.request_timeout(), None);
    // Probes always need a bound
    assert_eq!(config.probe_timeout(), Duration::from_secs(1));
    assert_eq!(config.link_check_interval(), None);
}

#[test]
fn test_log_rotation_parse() {
    assert_eq!(LogRotation::parse("hourly"), LogRotation::Hourly);
    assert_eq!(LogRotation::parse(" Daily "), LogRotation::Daily);
    assert_eq!(LogRotation::parse("never"), LogRotation::Never);
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
}
