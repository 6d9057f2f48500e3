//! Unit tests for the config module
//!
//! Tests cover:
//! - Loading from an explicit file
//! - Section defaults for partial files
//! - Validation failures and their exit codes

use politicos::config::Config;
use politicos::errors::{get_exit_code, EXIT_CONFIG_ERROR};
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_explicit_file() {
    let file = write_config(
        r#"
endpoint = "https://politicos.example.org"

[search]
debounce_ms = 150
default_per_page = 20
"#,
    );
    let config = Config::load(file.path().to_str()).unwrap();
    assert_eq!(config.endpoint, "https://politicos.example.org");
    assert_eq!(config.search.debounce_ms, 150);
    assert_eq!(config.search.default_per_page, 20);
    assert_eq!(config.cache.ttl_secs, 300);
    assert_eq!(config.http.timeout_secs, 30);
}

#[test]
fn test_invalid_toml_maps_to_config_exit_code() {
    let file = write_config("endpoint = [unclosed");
    let err = Config::load(file.path().to_str()).unwrap_err();
    assert_eq!(get_exit_code(&err), EXIT_CONFIG_ERROR);
}

#[test]
fn test_non_http_endpoint_is_rejected() {
    let file = write_config(r#"endpoint = "ftp://example.org""#);
    let err = Config::load(file.path().to_str()).unwrap_err();
    assert_eq!(get_exit_code(&err), EXIT_CONFIG_ERROR);
}

#[test]
fn test_zero_page_size_is_rejected() {
    let file = write_config(
        r#"
[search]
default_per_page = 0
"#,
    );
    assert!(Config::load(file.path().to_str()).is_err());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    assert!(Config::load(Some("/definitely/not/here/politicos.toml")).is_err());
}
