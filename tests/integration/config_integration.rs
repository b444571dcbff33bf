//! Integration tests for the configuration system

use glkit::api::{ApiVersion, GitLabApi, TokenType};
use glkit::config::{ConfigLoader, ToolkitConfig};
use std::fs;
use tempfile::TempDir;

fn write_workspace_config(dir: &TempDir, contents: &str) {
    let config_dir = dir.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), contents).unwrap();
}

#[test]
fn test_workspace_config_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    write_workspace_config(
        &dir,
        r#"
[gitlab]
host_url = "https://gitlab.internal.example"
api_version = "v3"
token_type = "access"
token = "oauth-token"
per_page = 50

[logging]
level = "debug"
format = "json"

[runtime]
worker_threads = 2
thread_name_prefix = "glkit-test"
"#,
    );

    let config = ConfigLoader::load(dir.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.gitlab.host_url, "https://gitlab.internal.example");
    assert_eq!(config.gitlab.api_version, ApiVersion::V3);
    assert_eq!(config.gitlab.token_type, TokenType::Access);
    assert_eq!(config.gitlab.per_page, 50);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.runtime.worker_threads, Some(2));

    let api = GitLabApi::from_config(&config.gitlab).unwrap();
    assert_eq!(api.api_version(), ApiVersion::V3);
    assert_eq!(api.default_per_page(), 50);
    assert_eq!(api.token_type(), Some(TokenType::Access));
}

#[test]
fn test_missing_workspace_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = ConfigLoader::load(dir.path()).unwrap();
    assert_eq!(config.gitlab.api_version, ApiVersion::V4);
    assert_eq!(config.gitlab.per_page, glkit::api::DEFAULT_PER_PAGE);
    assert_eq!(config.logging.output, "stderr");
}

#[test]
fn test_invalid_values_are_reported_per_section() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("glkit.toml");
    fs::write(
        &file,
        r#"
[gitlab]
host_url = "not a url"
per_page = 500

[logging]
level = "loud"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&file).unwrap();
    let errors = config.validate().unwrap_err();
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert!(rendered.iter().any(|e| e.starts_with("gitlab:")));
    assert!(rendered.iter().any(|e| e.starts_with("logging:")));
}

#[test]
fn test_load_from_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    assert!(ConfigLoader::load_from_file(&dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_from_config_without_token_fails() {
    let config = ToolkitConfig::default();
    let err = GitLabApi::from_config(&config.gitlab).err().unwrap();
    assert!(matches!(err, glkit::ApiError::ConfigError(_)));
}

#[test]
fn test_display_toml_redacts_secrets() {
    let mut config = ToolkitConfig::default();
    config.gitlab.token = Some("glpat-very-secret".to_string());
    config.gitlab.secret_token = Some("hook-secret".to_string());
    let shown = config.to_display_toml().unwrap();
    assert!(!shown.contains("glpat-very-secret"));
    assert!(!shown.contains("hook-secret"));
    assert!(shown.contains("<redacted>"));
}
