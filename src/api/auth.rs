//! API versions and credential kinds.

use crate::error::ApiError;
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Header used for private and session tokens.
pub const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Header GitLab sends with webhook deliveries when a secret token is configured.
pub const SECRET_TOKEN_HEADER: &str = "X-Gitlab-Token";

/// REST API namespace version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V3,
    #[default]
    V4,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V3 => "v3",
            ApiVersion::V4 => "v4",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v3" | "3" => Ok(ApiVersion::V3),
            "v4" | "4" => Ok(ApiVersion::V4),
            other => Err(ApiError::InvalidArgument(format!(
                "Unknown API version '{}' (expected v3 or v4)",
                other
            ))),
        }
    }
}

/// How a token is presented to GitLab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Personal, project or group access token
    #[default]
    Private,
    /// OAuth2 access token
    Access,
    /// Token obtained from the session login endpoint
    Session,
}

/// A token together with its kind
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token_type: TokenType,
    token: String,
}

impl Credentials {
    pub fn new(token_type: TokenType, token: impl Into<String>) -> Result<Self, ApiError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "Authentication token cannot be empty".to_string(),
            ));
        }
        Ok(Self { token_type, token })
    }

    pub fn private(token: impl Into<String>) -> Result<Self, ApiError> {
        Self::new(TokenType::Private, token)
    }

    pub fn oauth2(token: impl Into<String>) -> Result<Self, ApiError> {
        Self::new(TokenType::Access, token)
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// The single header that carries this credential.
    pub fn header(&self) -> Result<(HeaderName, HeaderValue), ApiError> {
        let invalid =
            |_| ApiError::InvalidArgument("Token contains invalid header characters".to_string());
        match self.token_type {
            TokenType::Access => {
                let mut value =
                    HeaderValue::from_str(&format!("Bearer {}", self.token)).map_err(invalid)?;
                value.set_sensitive(true);
                Ok((AUTHORIZATION, value))
            }
            TokenType::Private | TokenType::Session => {
                let mut value = HeaderValue::from_str(&self.token).map_err(invalid)?;
                value.set_sensitive(true);
                Ok((HeaderName::from_static("private-token"), value))
            }
        }
    }
}

// Tokens never show up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token_type", &self.token_type)
            .field("token", &"<redacted>")
            .finish()
    }
}
