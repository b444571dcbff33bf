//! Configuration System
//!
//! Layered configuration for the GitLab client, logging and the worker runtime.
//! Sources are merged by [`ConfigLoader`]; the result is validated before use.

use crate::api::auth::{ApiVersion, TokenType};
use crate::api::transport::{parse_host_url, MAX_PER_PAGE};
use crate::api::DEFAULT_PER_PAGE;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::runtime::RuntimeConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

mod loader;
mod merge_policy;
mod sources;

pub use loader::ConfigLoader;
pub use sources::environment::ENV_PREFIX;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolkitConfig {
    /// GitLab connection settings
    #[serde(default)]
    pub gitlab: GitLabConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Worker runtime settings
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// GitLab connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct GitLabConfig {
    #[serde(default = "default_host_url")]
    pub host_url: String,

    #[serde(default)]
    pub api_version: ApiVersion,

    #[serde(default)]
    pub token_type: TokenType,

    /// Access token; usually provided through `GLKIT_GITLAB__TOKEN`
    #[serde(default)]
    pub token: Option<String>,

    /// Expected `X-Gitlab-Token` of webhook deliveries
    #[serde(default)]
    pub secret_token: Option<String>,

    /// Act as this user id on every request
    #[serde(default)]
    pub sudo_as_id: Option<u64>,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default)]
    pub ignore_certificate_errors: bool,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host_url() -> String {
    "https://gitlab.com".to_string()
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            host_url: default_host_url(),
            api_version: ApiVersion::default(),
            token_type: TokenType::default(),
            token: None,
            secret_token: None,
            sudo_as_id: None,
            per_page: default_per_page(),
            ignore_certificate_errors: false,
            proxy: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// Secrets stay out of debug output and logs.
impl fmt::Debug for GitLabConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitLabConfig")
            .field("host_url", &self.host_url)
            .field("api_version", &self.api_version)
            .field("token_type", &self.token_type)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("secret_token", &self.secret_token.as_ref().map(|_| "<redacted>"))
            .field("sudo_as_id", &self.sudo_as_id)
            .field("per_page", &self.per_page)
            .field("ignore_certificate_errors", &self.ignore_certificate_errors)
            .field("proxy", &self.proxy)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl GitLabConfig {
    pub fn validate(&self) -> Result<(), String> {
        parse_host_url(&self.host_url).map_err(|e| e.to_string())?;
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(format!(
                "per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.per_page
            ));
        }
        if let Some(token) = &self.token {
            if token.trim().is_empty() {
                return Err("token cannot be empty when set".to_string());
            }
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err("timeouts must be greater than zero".to_string());
        }
        if let Some(proxy) = &self.proxy {
            if reqwest::Url::parse(proxy).is_err() {
                return Err(format!("proxy is not a valid URL: {}", proxy));
            }
        }
        Ok(())
    }

    /// Copy with secrets replaced, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.token.is_some() {
            copy.token = Some("<redacted>".to_string());
        }
        if copy.secret_token.is_some() {
            copy.secret_token = Some("<redacted>".to_string());
        }
        copy
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    GitLab(String),
    Logging(String),
    Runtime(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::GitLab(msg) => write!(f, "gitlab: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
            ValidationError::Runtime(msg) => write!(f, "runtime: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ToolkitConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.gitlab.validate() {
            errors.push(ValidationError::GitLab(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }
        if let Err(e) = self.runtime.validate() {
            errors.push(ValidationError::Runtime(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all problems into one error.
    pub fn validated(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }

    /// TOML rendering with secrets redacted.
    pub fn to_display_toml(&self) -> Result<String, ApiError> {
        let mut shown = self.clone();
        shown.gitlab = self.gitlab.redacted();
        toml::to_string_pretty(&shown)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}
