//! Shared helpers for mock-server backed tests.

use glkit::api::GitLabApi;
use serde_json::{json, Value};
use wiremock::{MockServer, ResponseTemplate};

pub const TOKEN: &str = "glpat-test-token";

/// Client with a private token pointed at the mock server.
pub fn client(server: &MockServer) -> GitLabApi {
    GitLabApi::builder(server.uri())
        .private_token(TOKEN)
        .build()
        .unwrap()
}

pub fn project_json(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("project-{}", id),
        "path": format!("project-{}", id),
        "path_with_namespace": format!("group/project-{}", id),
        "visibility": "private",
        "star_count": 0
    })
}

pub fn user_json(id: u64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "name": username.to_uppercase(),
        "state": "active"
    })
}

/// One page of `ids` with GitLab's pagination headers.
pub fn page_response(ids: &[u64], page: u32, per_page: u32, total: u64) -> ResponseTemplate {
    let total_pages = total.div_ceil(u64::from(per_page)).max(1);
    let next = if u64::from(page) < total_pages {
        (page + 1).to_string()
    } else {
        String::new()
    };
    let body: Vec<Value> = ids.iter().map(|id| project_json(*id)).collect();
    ResponseTemplate::new(200)
        .set_body_json(body)
        .insert_header("X-Page", page.to_string().as_str())
        .insert_header("X-Per-Page", per_page.to_string().as_str())
        .insert_header("X-Total", total.to_string().as_str())
        .insert_header("X-Total-Pages", total_pages.to_string().as_str())
        .insert_header("X-Next-Page", next.as_str())
}
