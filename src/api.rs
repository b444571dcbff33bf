//! GitLab API client
//!
//! [`GitLabApi`] owns the per-client context (host, API version, credential, sudo
//! id, page size) and hands out resource façades. Façades are created on first use
//! and share the client's transport, so a sudo change applies to all of them.
//!
//! ```no_run
//! use glkit::api::{GitLabApi, ApiVersion, TokenType};
//! use glkit::api::projects::ProjectFilter;
//!
//! # async fn run() -> Result<(), glkit::error::ApiError> {
//! let api = GitLabApi::new(ApiVersion::V4, "https://gitlab.example.com", TokenType::Private, "glpat-token")?;
//! let owned = api.projects().list_projects(&ProjectFilter::owned()).await?;
//! println!("{} owned projects", owned.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod lookup;
pub mod pager;
pub mod projects;
pub mod session;
pub mod transport;
pub mod users;

pub use auth::{ApiVersion, Credentials, TokenType, SECRET_TOKEN_HEADER};
pub use lookup::Lookup;
pub use pager::{Pager, PagerStream};
pub use projects::{ProjectApi, ProjectFilter, ProjectParams, ProjectRef};
pub use transport::{ClientContext, Transport, TransportOptions, DEFAULT_PER_PAGE};
pub use users::{UserApi, UserRef};

use crate::config::GitLabConfig;
use crate::error::ApiError;
use session::LoginToken;
use std::sync::OnceLock;
use std::time::Duration;
use subtle::ConstantTimeEq;
use tracing::info;

/// Builder for [`GitLabApi`]
#[derive(Debug, Clone)]
pub struct GitLabApiBuilder {
    host_url: String,
    api_version: ApiVersion,
    credentials: Option<(TokenType, String)>,
    secret_token: Option<String>,
    sudo_as_id: Option<u64>,
    default_per_page: u32,
    options: TransportOptions,
}

impl GitLabApiBuilder {
    fn new(host_url: impl Into<String>) -> Self {
        Self {
            host_url: host_url.into(),
            api_version: ApiVersion::default(),
            credentials: None,
            secret_token: None,
            sudo_as_id: None,
            default_per_page: DEFAULT_PER_PAGE,
            options: TransportOptions::default(),
        }
    }

    pub fn api_version(mut self, api_version: ApiVersion) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn token(mut self, token_type: TokenType, token: impl Into<String>) -> Self {
        self.credentials = Some((token_type, token.into()));
        self
    }

    pub fn private_token(self, token: impl Into<String>) -> Self {
        self.token(TokenType::Private, token)
    }

    pub fn oauth2_token(self, token: impl Into<String>) -> Self {
        self.token(TokenType::Access, token)
    }

    /// Secret expected in the `X-Gitlab-Token` header of webhook deliveries.
    pub fn secret_token(mut self, secret_token: impl Into<String>) -> Self {
        self.secret_token = Some(secret_token.into());
        self
    }

    pub fn sudo_as_id(mut self, sudo_as_id: Option<u64>) -> Self {
        self.sudo_as_id = sudo_as_id;
        self
    }

    pub fn default_per_page(mut self, per_page: u32) -> Self {
        self.default_per_page = per_page;
        self
    }

    pub fn ignore_certificate_errors(mut self, ignore: bool) -> Self {
        self.options.ignore_certificate_errors = ignore;
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.options.proxy = Some(proxy.into());
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.options.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<GitLabApi, ApiError> {
        let (token_type, token) = self.credentials.clone().ok_or_else(|| {
            ApiError::InvalidArgument("An authentication token is required".to_string())
        })?;
        let credentials = Credentials::new(token_type, token)?;
        self.build_with(Some(credentials))
    }

    fn build_with(self, credentials: Option<Credentials>) -> Result<GitLabApi, ApiError> {
        let context = ClientContext::new(&self.host_url, self.api_version, credentials)?
            .with_secret_token(self.secret_token)
            .with_default_per_page(self.default_per_page)?
            .with_sudo_as_id(self.sudo_as_id);
        let transport = Transport::new(context, &self.options)?;
        Ok(GitLabApi::from_transport(transport))
    }

    /// Log in with username and password, then build a client using the obtained
    /// token. Tries the session endpoint first and falls back to OAuth2 on 404.
    pub async fn login(self, username: &str, password: &str) -> Result<GitLabApi, ApiError> {
        let bootstrap = self.clone().build_with(None)?;
        let token = session::login(&bootstrap.transport, username, password).await?;
        let (token_type, token) = match token {
            LoginToken::Session(token) => (TokenType::Session, token),
            LoginToken::OAuth2(token) => (TokenType::Access, token),
        };
        self.token(token_type, token).build()
    }

    /// Log in with the OAuth2 password grant only.
    pub async fn oauth2_login(self, username: &str, password: &str) -> Result<GitLabApi, ApiError> {
        let bootstrap = self.clone().build_with(None)?;
        let token = session::oauth2_login(&bootstrap.transport, username, password).await?;
        self.oauth2_token(token).build()
    }
}

/// Client for one GitLab instance
pub struct GitLabApi {
    transport: Transport,
    projects: OnceLock<ProjectApi>,
    users: OnceLock<UserApi>,
}

impl GitLabApi {
    pub fn builder(host_url: impl Into<String>) -> GitLabApiBuilder {
        GitLabApiBuilder::new(host_url)
    }

    pub fn new(
        api_version: ApiVersion,
        host_url: &str,
        token_type: TokenType,
        token: &str,
    ) -> Result<Self, ApiError> {
        Self::builder(host_url)
            .api_version(api_version)
            .token(token_type, token)
            .build()
    }

    /// Build a client from the `[gitlab]` configuration section.
    pub fn from_config(config: &GitLabConfig) -> Result<Self, ApiError> {
        let token = config.token.clone().ok_or_else(|| {
            ApiError::ConfigError("gitlab.token is not configured".to_string())
        })?;
        let mut builder = Self::builder(config.host_url.clone())
            .api_version(config.api_version)
            .token(config.token_type, token)
            .sudo_as_id(config.sudo_as_id)
            .default_per_page(config.per_page)
            .ignore_certificate_errors(config.ignore_certificate_errors)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .request_timeout(Duration::from_secs(config.request_timeout_secs));
        if let Some(secret) = &config.secret_token {
            builder = builder.secret_token(secret.clone());
        }
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(proxy.clone());
        }
        builder.build()
    }

    pub async fn login(
        api_version: ApiVersion,
        host_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, ApiError> {
        Self::builder(host_url)
            .api_version(api_version)
            .login(username, password)
            .await
    }

    pub async fn oauth2_login(
        api_version: ApiVersion,
        host_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, ApiError> {
        Self::builder(host_url)
            .api_version(api_version)
            .oauth2_login(username, password)
            .await
    }

    fn from_transport(transport: Transport) -> Self {
        Self {
            transport,
            projects: OnceLock::new(),
            users: OnceLock::new(),
        }
    }

    pub fn projects(&self) -> &ProjectApi {
        self.projects
            .get_or_init(|| ProjectApi::new(self.transport.clone()))
    }

    pub fn users(&self) -> &UserApi {
        self.users.get_or_init(|| UserApi::new(self.transport.clone()))
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn host_url(&self) -> &str {
        self.transport.context().host_url().as_str()
    }

    pub fn api_version(&self) -> ApiVersion {
        self.transport.context().api_version()
    }

    pub fn token_type(&self) -> Option<TokenType> {
        self.transport
            .context()
            .credentials()
            .map(Credentials::token_type)
    }

    pub fn default_per_page(&self) -> u32 {
        self.transport.context().default_per_page()
    }

    pub fn secret_token(&self) -> Option<&str> {
        self.transport.context().secret_token()
    }

    /// Check the `X-Gitlab-Token` value of an inbound webhook delivery. Any value is
    /// accepted when no secret token is configured.
    pub fn verify_secret_token(&self, header_value: Option<&str>) -> bool {
        match (self.secret_token(), header_value) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(expected), Some(actual)) => expected.as_bytes().ct_eq(actual.as_bytes()).into(),
        }
    }

    /// Act as `username` for every following request. Requires an administrator
    /// token.
    pub async fn sudo(&self, username: &str) -> Result<u64, ApiError> {
        let user = self
            .users()
            .find_user(username)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("User '{}' not found", username)))?;
        self.set_sudo_as_id(Some(user.id));
        info!(username, user_id = user.id, "sudo enabled");
        Ok(user.id)
    }

    pub fn set_sudo_as_id(&self, sudo_as_id: Option<u64>) {
        self.transport.context().set_sudo_as_id(sudo_as_id);
    }

    pub fn sudo_as_id(&self) -> Option<u64> {
        self.transport.context().sudo_as_id()
    }

    pub fn unsudo(&self) {
        if self.sudo_as_id().is_some() {
            info!("sudo disabled");
        }
        self.set_sudo_as_id(None);
    }
}
