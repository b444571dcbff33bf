//! Project façade against a mock GitLab.

use glkit::api::{ProjectParams, ProjectRef};
use glkit::ApiError;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::test_utils::{client, project_json};

#[tokio::test]
async fn test_get_project_by_path_encodes_slashes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/group%2Fsub%2Fproject-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(9)))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let project = api
        .projects()
        .get_project("group/sub/project-9", false)
        .await
        .unwrap();
    assert_eq!(project.id, 9);
}

#[tokio::test]
async fn test_get_project_with_statistics() {
    let server = MockServer::start().await;
    let mut body = project_json(4);
    body["statistics"] = json!({"commit_count": 12, "repository_size": 2048});
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/4"))
        .and(query_param("statistics", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let api = client(&server);
    let project = api.projects().get_project(4u64, true).await.unwrap();
    let stats = project.statistics.unwrap();
    assert_eq!(stats.commit_count, 12);
    assert_eq!(stats.repository_size, 2048);
}

#[tokio::test]
async fn test_optional_project_keeps_not_found_cause() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "404 Project Not Found"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(1)))
        .mount(&server)
        .await;

    let api = client(&server);
    let missing = api.projects().optional_project(404u64).await;
    let found = api.projects().optional_project(1u64).await;

    assert!(!missing.is_found());
    let err = missing.error().unwrap();
    assert_eq!(err.status_code(), Some(404));
    assert!(err.to_string().contains("404 Project Not Found"));

    assert!(found.is_found());
    assert!(found.error().is_none());
    assert_eq!(found.into_option().unwrap().id, 1);
    assert_eq!(missing.found_or_not_found().unwrap(), None);
}

#[tokio::test]
async fn test_create_project_requires_name_or_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let api = client(&server);
    let err = api
        .projects()
        .create_project(&ProjectParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_create_project_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/projects"))
        .and(body_json(json!({"name": "project-3", "visibility": "private"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(project_json(3)))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let mut params = ProjectParams::named("project-3");
    params.visibility = Some(glkit::models::Visibility::Private);
    let project = api.projects().create_project(&params).await.unwrap();
    assert_eq!(project.id, 3);
}

#[tokio::test]
async fn test_star_not_modified_returns_current_project() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/projects/5/star"))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(5)))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let project = api.projects().star_project(5u64).await.unwrap();
    assert_eq!(project.id, 5);
}

#[tokio::test]
async fn test_delete_project_propagates_forbidden() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v4/projects/group%2Fproject-1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "403 Forbidden"})))
        .mount(&server)
        .await;

    let api = client(&server);
    let err = api
        .projects()
        .delete_project(ProjectRef::Path("group/project-1".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(403));
}

#[tokio::test]
async fn test_search_projects_rejects_blank_text() {
    let server = MockServer::start().await;
    let api = client(&server);
    assert!(api.projects().search_projects("  ").is_err());
}
