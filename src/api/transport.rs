//! HTTP transport for the GitLab REST API.
//!
//! Builds versioned URLs (`{host}/api/{version}/...`), attaches the configured
//! credential header and sudo parameter to every request, and maps non-success
//! responses to [`ApiError`]. There is no retry policy: every request is a single
//! attempt.

use crate::api::auth::{ApiVersion, Credentials};
use crate::error::ApiError;
use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Query parameter used for sudo impersonation.
pub const SUDO_PARAM: &str = "sudo";

/// Page size used when none is configured.
pub const DEFAULT_PER_PAGE: u32 = 96;

/// Largest page size GitLab honours.
pub const MAX_PER_PAGE: u32 = 100;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-client state shared by every façade of a [`crate::api::GitLabApi`].
///
/// Only the sudo id can change after construction.
#[derive(Debug)]
pub struct ClientContext {
    host_url: Url,
    api_version: ApiVersion,
    credentials: Option<Credentials>,
    secret_token: Option<String>,
    sudo_as_id: RwLock<Option<u64>>,
    default_per_page: u32,
}

impl ClientContext {
    pub fn new(
        host_url: &str,
        api_version: ApiVersion,
        credentials: Option<Credentials>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            host_url: parse_host_url(host_url)?,
            api_version,
            credentials,
            secret_token: None,
            sudo_as_id: RwLock::new(None),
            default_per_page: DEFAULT_PER_PAGE,
        })
    }

    pub fn with_secret_token(mut self, secret_token: Option<String>) -> Self {
        self.secret_token = secret_token.filter(|s| !s.is_empty());
        self
    }

    pub fn with_default_per_page(mut self, per_page: u32) -> Result<Self, ApiError> {
        self.default_per_page = validate_per_page(per_page)?;
        Ok(self)
    }

    pub fn with_sudo_as_id(self, sudo_as_id: Option<u64>) -> Self {
        *self.sudo_as_id.write() = sudo_as_id;
        self
    }

    pub fn host_url(&self) -> &Url {
        &self.host_url
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn secret_token(&self) -> Option<&str> {
        self.secret_token.as_deref()
    }

    pub fn default_per_page(&self) -> u32 {
        self.default_per_page
    }

    pub fn sudo_as_id(&self) -> Option<u64> {
        *self.sudo_as_id.read()
    }

    pub fn set_sudo_as_id(&self, sudo_as_id: Option<u64>) {
        *self.sudo_as_id.write() = sudo_as_id;
    }
}

/// Settings of the underlying HTTP client
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub ignore_certificate_errors: bool,
    pub proxy: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            ignore_certificate_errors: false,
            proxy: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

fn build_http_client(options: &TransportOptions) -> Result<Client, ApiError> {
    let mut builder = Client::builder()
        .connect_timeout(options.connect_timeout)
        .timeout(options.request_timeout);

    if options.ignore_certificate_errors {
        builder = builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    match options.proxy.as_deref() {
        Some(proxy) if !proxy.is_empty() => {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| ApiError::ConfigError(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
        }
        _ => {
            builder = builder.no_proxy();
        }
    }

    builder
        .build()
        .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))
}

pub(crate) fn parse_host_url(host_url: &str) -> Result<Url, ApiError> {
    let trimmed = host_url.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidArgument(
            "GitLab host URL cannot be empty".to_string(),
        ));
    }
    let url = Url::parse(trimmed)
        .map_err(|e| ApiError::InvalidArgument(format!("Invalid host URL '{}': {}", trimmed, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ApiError::InvalidArgument(format!(
            "Host URL must use http or https: {}",
            trimmed
        )));
    }
    Ok(url)
}

pub(crate) fn validate_per_page(per_page: u32) -> Result<u32, ApiError> {
    if per_page == 0 || per_page > MAX_PER_PAGE {
        return Err(ApiError::InvalidArgument(format!(
            "Items per page must be between 1 and {}, got {}",
            MAX_PER_PAGE, per_page
        )));
    }
    Ok(per_page)
}

/// Map a reqwest failure to an [`ApiError`].
fn map_http_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ApiError::Transport(format!("Connection error: {}", error))
    } else if error.is_decode() {
        ApiError::Parse(error.to_string())
    } else {
        ApiError::Transport(format!("HTTP error: {}", error))
    }
}

/// Extract the human-readable message from a GitLab error body.
///
/// GitLab answers with `{"message": ...}` for API errors and
/// `{"error": ..., "error_description": ...}` for OAuth errors. `message` may be an
/// object of per-field validation errors.
pub(crate) fn error_message(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["message", "error_description", "error"] {
            match map.get(key) {
                Some(serde_json::Value::String(s)) => return s.clone(),
                Some(serde_json::Value::Null) | None => continue,
                Some(other) => return other.to_string(),
            }
        }
    }
    if trimmed.is_empty() {
        "(empty response body)".to_string()
    } else {
        trimmed.to_string()
    }
}

fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = error_message(body);
    match status.as_u16() {
        401 | 403 => ApiError::Authentication {
            status: status.as_u16(),
            message,
        },
        code => ApiError::Http {
            status: code,
            message,
        },
    }
}

/// Authenticated HTTP access to one GitLab instance.
///
/// Cloning is cheap; clones share the [`ClientContext`] (and therefore the sudo id).
#[derive(Clone)]
pub struct Transport {
    http: Client,
    context: Arc<ClientContext>,
}

impl Transport {
    pub fn new(context: ClientContext, options: &TransportOptions) -> Result<Self, ApiError> {
        let http = build_http_client(options)?;
        Ok(Self {
            http,
            context: Arc::new(context),
        })
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    /// `{host}/api/{version}/{segments...}` with every segment percent-encoded.
    pub fn api_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let version = self.context.api_version.as_str();
        let mut all = Vec::with_capacity(segments.len() + 2);
        all.push("api");
        all.push(version);
        all.extend_from_slice(segments);
        self.host_url_with(&all)
    }

    /// `{host}/{segments...}`, for endpoints outside the versioned namespace.
    pub fn host_url_with(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.context.host_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ApiError::InvalidArgument(format!(
                    "Host URL cannot be used as a base: {}",
                    self.context.host_url
                ))
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    /// Start a request with the credential header and sudo parameter attached.
    pub fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, ApiError> {
        let mut builder = self.http.request(method, url);
        if let Some(credentials) = self.context.credentials() {
            let (name, value) = credentials.header()?;
            builder = builder.header(name, value);
        }
        if let Some(sudo_as_id) = self.context.sudo_as_id() {
            builder = builder.query(&[(SUDO_PARAM, sudo_as_id)]);
        }
        Ok(builder)
    }

    /// Start a request without credentials or sudo, for login endpoints.
    pub fn anonymous_request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Send a request and return the response whatever its status.
    pub async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder.build().map_err(map_http_error)?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, url = %redact_url(&url), "sending GitLab request");

        let response = self.http.execute(request).await.map_err(map_http_error)?;
        let status = response.status();
        debug!(%method, url = %redact_url(&url), %status, "received GitLab response");
        Ok(response)
    }

    /// Send a request and fail on any non-2xx status.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.execute(builder).await?;
        ensure_success(response).await
    }

    pub async fn get(
        &self,
        segments: &[&str],
        query: &[(String, String)],
    ) -> Result<Response, ApiError> {
        let url = self.api_url(segments)?;
        let builder = self.request(Method::GET, url)?.query(query);
        self.send(builder).await
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let response = self.get(segments, query).await?;
        decode_json(response).await
    }

    pub async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.api_url(segments)?;
        let builder = self.request(Method::POST, url)?.json(body);
        let response = self.send(builder).await?;
        decode_json(response).await
    }

    pub async fn put_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.api_url(segments)?;
        let builder = self.request(Method::PUT, url)?.json(body);
        let response = self.send(builder).await?;
        decode_json(response).await
    }

    pub async fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        let url = self.api_url(segments)?;
        let builder = self.request(Method::DELETE, url)?;
        self.send(builder).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into an error, consuming its body for the message.
pub async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(status_error(status, &body))
}

pub async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(map_http_error)?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
}

// The sudo id is fine to log; query values such as `private_token` are not.
fn redact_url(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k.contains("token") || k == "password" {
                (k.into_owned(), "<redacted>".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();
    if pairs.is_empty() {
        redacted.set_query(None);
    } else {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted.to_string()
}
