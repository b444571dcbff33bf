//! Username/password login bootstrap.
//!
//! The session endpoint only exists on old GitLab versions; newer servers answer
//! 404 there, in which case the OAuth2 password grant is used instead.

use crate::api::transport::{decode_json, ensure_success, Transport};
use crate::error::ApiError;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Serialize)]
struct SessionRequest<'a> {
    login: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    private_token: String,
}

#[derive(Serialize)]
struct OAuth2PasswordGrant<'a> {
    grant_type: &'static str,
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct OAuth2TokenResponse {
    access_token: String,
}

/// Token obtained by a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginToken {
    Session(String),
    OAuth2(String),
}

pub(crate) fn check_login_args(username: &str, password: &str) -> Result<(), ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::InvalidArgument(
            "Username cannot be empty".to_string(),
        ));
    }
    if password.is_empty() {
        return Err(ApiError::InvalidArgument(
            "Password cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn as_authentication_error(err: ApiError) -> ApiError {
    match err {
        ApiError::Http { status, message } if status == 400 || status == 401 => {
            ApiError::Authentication { status, message }
        }
        other => other,
    }
}

/// Session login, falling back to OAuth2 when the session endpoint does not exist.
pub(crate) async fn login(
    transport: &Transport,
    username: &str,
    password: &str,
) -> Result<LoginToken, ApiError> {
    check_login_args(username, password)?;
    match session_login(transport, username, password).await {
        Ok(token) => {
            info!(username, "logged in via session endpoint");
            Ok(LoginToken::Session(token))
        }
        Err(err) if err.is_not_found() => {
            warn!(username, "session login unavailable, retrying with OAuth2");
            oauth2_login(transport, username, password)
                .await
                .map(LoginToken::OAuth2)
        }
        Err(err) => Err(as_authentication_error(err)),
    }
}

async fn session_login(
    transport: &Transport,
    username: &str,
    password: &str,
) -> Result<String, ApiError> {
    let url = transport.api_url(&["session"])?;
    let builder = transport
        .anonymous_request(Method::POST, url)
        .json(&SessionRequest {
            login: username,
            password,
        });
    let response = ensure_success(transport.execute(builder).await?).await?;
    let session: SessionResponse = decode_json(response).await?;
    Ok(session.private_token)
}

/// OAuth2 resource owner password grant against `{host}/oauth/token`.
pub(crate) async fn oauth2_login(
    transport: &Transport,
    username: &str,
    password: &str,
) -> Result<String, ApiError> {
    check_login_args(username, password)?;
    let url = transport.host_url_with(&["oauth", "token"])?;
    let builder = transport
        .anonymous_request(Method::POST, url)
        .form(&OAuth2PasswordGrant {
            grant_type: "password",
            username,
            password,
        });
    let response = ensure_success(transport.execute(builder).await?)
        .await
        .map_err(as_authentication_error)?;
    let token: OAuth2TokenResponse = decode_json(response).await?;
    info!(username, "obtained OAuth2 access token");
    Ok(token.access_token)
}
