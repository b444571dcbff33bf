//! Credential headers and sudo context.

use glkit::api::{ApiVersion, GitLabApi, TokenType};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::test_utils::{client, user_json, TOKEN};

#[tokio::test]
async fn test_private_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .and(header("PRIVATE-TOKEN", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "root")))
        .expect(1)
        .mount(&server)
        .await;

    let user = client(&server).users().current_user().await.unwrap();
    assert_eq!(user.username, "root");
}

#[tokio::test]
async fn test_oauth2_token_uses_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .and(header("Authorization", "Bearer oauth-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(2, "jdoe")))
        .expect(1)
        .mount(&server)
        .await;

    let api = GitLabApi::new(ApiVersion::V4, &server.uri(), TokenType::Access, "oauth-token")
        .unwrap();
    assert_eq!(api.token_type(), Some(TokenType::Access));
    assert_eq!(api.users().current_user().await.unwrap().id, 2);
}

#[tokio::test]
async fn test_v3_client_uses_v3_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(3, "legacy")))
        .expect(1)
        .mount(&server)
        .await;

    let api = GitLabApi::new(ApiVersion::V3, &server.uri(), TokenType::Private, TOKEN).unwrap();
    assert_eq!(api.users().current_user().await.unwrap().username, "legacy");
}

#[tokio::test]
async fn test_unauthorized_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({"message": "401 Unauthorized"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).users().current_user().await.unwrap_err();
    assert!(matches!(err, glkit::ApiError::Authentication { status: 401, .. }));
}

#[tokio::test]
async fn test_sudo_resolves_username_and_applies_to_later_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/users"))
        .and(query_param("username", "jdoe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![user_json(42, "jdoe")]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .and(query_param("sudo", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(42, "jdoe")))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    assert_eq!(api.sudo("jdoe").await.unwrap(), 42);
    assert_eq!(api.sudo_as_id(), Some(42));

    // Façades created before or after the switch share the same context.
    let user = api.users().current_user().await.unwrap();
    assert_eq!(user.username, "jdoe");

    api.unsudo();
    assert_eq!(api.sudo_as_id(), None);
}

#[tokio::test]
async fn test_sudo_unknown_user_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&server)
        .await;

    let api = client(&server);
    let err = api.sudo("ghost").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(api.sudo_as_id(), None);
}
