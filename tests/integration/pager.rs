//! Lazy pagination against a mock GitLab.

use futures::{StreamExt, TryStreamExt};
use glkit::api::ProjectFilter;
use glkit::ApiError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::test_utils::{client, page_response, project_json};

async fn mount_pages(server: &MockServer, total: u64, per_page: u32) {
    let ids: Vec<u64> = (1..=total).collect();
    let chunks: Vec<&[u64]> = if ids.is_empty() {
        vec![&ids[..]]
    } else {
        ids.chunks(per_page as usize).collect()
    };
    for (index, chunk) in chunks.iter().enumerate() {
        let page = index as u32 + 1;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects"))
            .and(query_param("page", page.to_string().as_str()))
            .and(query_param("per_page", per_page.to_string().as_str()))
            .respond_with(page_response(chunk, page, per_page, total))
            .expect(1)
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_all_requests_each_page_once() {
    let server = MockServer::start().await;
    mount_pages(&server, 5, 2).await;

    let api = client(&server);
    let pager = api
        .projects()
        .projects_with_page_size(&ProjectFilter::default(), 2)
        .unwrap();
    let projects = pager.all().await.unwrap();

    let ids: Vec<u64> = projects.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    server.verify().await;
}

#[tokio::test]
async fn test_empty_collection_costs_one_request() {
    let server = MockServer::start().await;
    mount_pages(&server, 0, 10).await;

    let api = client(&server);
    let pager = api
        .projects()
        .projects_with_page_size(&ProjectFilter::default(), 10)
        .unwrap();
    assert!(pager.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pager_does_no_io_until_asked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let api = client(&server);
    let pager = api.projects().owned_projects().unwrap();
    assert_eq!(pager.current_page(), 0);
    assert!(pager.has_next());
    assert_eq!(pager.total_items(), None);
}

#[tokio::test]
async fn test_stream_yields_same_items_as_all() {
    let server = MockServer::start().await;
    let ids: Vec<u64> = (1..=7).collect();
    for (index, chunk) in ids.chunks(3).enumerate() {
        let page = index as u32 + 1;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects"))
            .and(query_param("page", page.to_string().as_str()))
            .respond_with(page_response(chunk, page, 3, 7))
            .expect(2)
            .mount(&server)
            .await;
    }

    let api = client(&server);
    let filter = ProjectFilter::default();
    let from_all = api
        .projects()
        .projects_with_page_size(&filter, 3)
        .unwrap()
        .all()
        .await
        .unwrap();
    let from_stream: Vec<_> = api
        .projects()
        .projects_with_page_size(&filter, 3)
        .unwrap()
        .stream()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(from_all, from_stream);
    assert_eq!(from_stream.len(), 7);
}

/// Three pages of two projects; `expected[i]` is how often page `i + 1` may be hit.
async fn mount_three_pages(server: &MockServer, expected: [u64; 3]) {
    let ids: Vec<u64> = (1..=6).collect();
    for (index, chunk) in ids.chunks(2).enumerate() {
        let page = index as u32 + 1;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects"))
            .and(query_param("page", page.to_string().as_str()))
            .and(query_param("per_page", "2"))
            .respond_with(page_response(chunk, page, 2, 6))
            .expect(expected[index])
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_stream_stops_within_first_page() {
    let server = MockServer::start().await;
    mount_three_pages(&server, [1, 0, 0]).await;

    let api = client(&server);
    let taken: Vec<_> = api
        .projects()
        .projects_with_page_size(&ProjectFilter::default(), 2)
        .unwrap()
        .stream()
        .take(2)
        .try_collect()
        .await
        .unwrap();

    let ids: Vec<u64> = taken.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2]);
    server.verify().await;
}

#[tokio::test]
async fn test_stream_fetches_only_pages_it_reaches() {
    let server = MockServer::start().await;
    mount_three_pages(&server, [1, 1, 0]).await;

    let api = client(&server);
    let taken: Vec<_> = api
        .projects()
        .projects_with_page_size(&ProjectFilter::default(), 2)
        .unwrap()
        .stream()
        .take(3)
        .try_collect()
        .await
        .unwrap();

    let ids: Vec<u64> = taken.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    server.verify().await;
}

#[tokio::test]
async fn test_next_page_header_drives_iteration_without_totals() {
    let server = MockServer::start().await;
    for (page, next) in [(1u32, "2"), (2, "")] {
        let ids = [u64::from(page) * 10];
        Mock::given(method("GET"))
            .and(path("/api/v4/projects"))
            .and(query_param("page", page.to_string().as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(vec![project_json(ids[0])])
                    .insert_header("X-Page", page.to_string().as_str())
                    .insert_header("X-Next-Page", next),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let api = client(&server);
    let mut pager = api
        .projects()
        .projects_with_page_size(&ProjectFilter::default(), 1)
        .unwrap();

    let first = pager.next().await.unwrap().unwrap();
    assert_eq!(first[0].id, 10);
    assert!(pager.has_next());
    assert_eq!(pager.total_pages(), None);

    let second = pager.next().await.unwrap().unwrap();
    assert_eq!(second[0].id, 20);
    assert!(!pager.has_next());
    assert!(pager.next().await.unwrap().is_none());
}

#[tokio::test]
async fn test_unpaginated_response_is_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1/forks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![project_json(2), project_json(3)]))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let forks = api.projects().forks(1u64).unwrap().all().await.unwrap();
    assert_eq!(forks.len(), 2);
}

#[tokio::test]
async fn test_stream_reports_error_once_and_stops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(query_param("page", "1"))
        .respond_with(page_response(&[1, 2], 1, 2, 6))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "message": "500 Internal Server Error"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let stream = api
        .projects()
        .projects_with_page_size(&ProjectFilter::default(), 2)
        .unwrap()
        .stream();
    let results: Vec<Result<_, ApiError>> = stream.collect().await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    match &results[2] {
        Err(err) => assert_eq!(err.status_code(), Some(500)),
        Ok(_) => panic!("expected the page 2 failure"),
    }
}

#[tokio::test]
async fn test_page_zero_is_rejected() {
    let server = MockServer::start().await;
    let api = client(&server);
    let mut pager = api.projects().owned_projects().unwrap();
    let err = pager.page(0).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_page_size_out_of_range_is_rejected() {
    let server = MockServer::start().await;
    let api = client(&server);
    let filter = ProjectFilter::default();
    assert!(api.projects().projects_with_page_size(&filter, 0).is_err());
    assert!(api.projects().projects_with_page_size(&filter, 101).is_err());
}
