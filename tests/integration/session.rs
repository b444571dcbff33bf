//! Username/password login with OAuth2 fallback.

use glkit::api::{ApiVersion, GitLabApi, TokenType};
use glkit::ApiError;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::test_utils::user_json;

#[tokio::test]
async fn test_session_login_uses_private_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/session"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1,
            "username": "root",
            "private_token": "session-token"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .and(header("PRIVATE-TOKEN", "session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "root")))
        .expect(1)
        .mount(&server)
        .await;

    let api = GitLabApi::login(ApiVersion::V4, &server.uri(), "root", "password")
        .await
        .unwrap();
    assert_eq!(api.token_type(), Some(TokenType::Session));
    assert_eq!(api.users().current_user().await.unwrap().username, "root");
}

#[tokio::test]
async fn test_missing_session_endpoint_falls_back_to_oauth2() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/session"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "404 Not Found"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "oauth-token",
            "token_type": "bearer",
            "created_at": 1_700_000_000
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .and(header("Authorization", "Bearer oauth-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "root")))
        .expect(1)
        .mount(&server)
        .await;

    let api = GitLabApi::login(ApiVersion::V4, &server.uri(), "root", "password")
        .await
        .unwrap();
    assert_eq!(api.token_type(), Some(TokenType::Access));
    assert_eq!(api.users().current_user().await.unwrap().id, 1);
}

#[tokio::test]
async fn test_rejected_credentials_are_authentication_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/session"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "401 Unauthorized"})),
        )
        .mount(&server)
        .await;

    let err = GitLabApi::login(ApiVersion::V4, &server.uri(), "root", "wrong")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ApiError::Authentication { status: 401, .. }));
}

#[tokio::test]
async fn test_oauth2_invalid_grant_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "The provided authorization grant is invalid"
        })))
        .mount(&server)
        .await;

    let err = GitLabApi::oauth2_login(ApiVersion::V4, &server.uri(), "root", "wrong")
        .await
        .err()
        .unwrap();
    match err {
        ApiError::Authentication { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("authorization grant is invalid"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_blank_credentials_fail_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let err = GitLabApi::login(ApiVersion::V4, &server.uri(), "", "password")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}
