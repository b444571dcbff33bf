//! Project operations.

use crate::api::lookup::Lookup;
use crate::api::pager::{Pager, PagerStream};
use crate::api::transport::{decode_json, ensure_success, Transport};
use crate::api::users::UserRef;
use crate::error::ApiError;
use crate::models::{Project, Visibility};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// A project addressed by numeric id or by its full namespace path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectRef {
    Id(u64),
    Path(String),
}

impl ProjectRef {
    /// Single URL path segment for this project. Paths are encoded by the transport,
    /// so `group/name` ends up as `group%2Fname`.
    pub fn segment(&self) -> String {
        match self {
            ProjectRef::Id(id) => id.to_string(),
            ProjectRef::Path(path) => path.trim_matches('/').to_string(),
        }
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectRef::Id(id) => write!(f, "{}", id),
            ProjectRef::Path(path) => f.write_str(path),
        }
    }
}

impl From<u64> for ProjectRef {
    fn from(id: u64) -> Self {
        ProjectRef::Id(id)
    }
}

impl From<&str> for ProjectRef {
    fn from(s: &str) -> Self {
        match s.trim().parse::<u64>() {
            Ok(id) => ProjectRef::Id(id),
            Err(_) => ProjectRef::Path(s.trim().to_string()),
        }
    }
}

impl From<String> for ProjectRef {
    fn from(s: String) -> Self {
        ProjectRef::from(s.as_str())
    }
}

impl From<&Project> for ProjectRef {
    fn from(project: &Project) -> Self {
        ProjectRef::Id(project.id)
    }
}

impl FromStr for ProjectRef {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().trim_matches('/').is_empty() {
            return Err(ApiError::InvalidArgument(
                "Project reference cannot be empty".to_string(),
            ));
        }
        Ok(ProjectRef::from(s))
    }
}

/// Ordering field for project listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectOrderBy {
    Id,
    Name,
    Path,
    CreatedAt,
    UpdatedAt,
    LastActivityAt,
}

impl ProjectOrderBy {
    fn as_str(&self) -> &'static str {
        match self {
            ProjectOrderBy::Id => "id",
            ProjectOrderBy::Name => "name",
            ProjectOrderBy::Path => "path",
            ProjectOrderBy::CreatedAt => "created_at",
            ProjectOrderBy::UpdatedAt => "updated_at",
            ProjectOrderBy::LastActivityAt => "last_activity_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Filters for project listings. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub archived: Option<bool>,
    pub visibility: Option<Visibility>,
    pub order_by: Option<ProjectOrderBy>,
    pub sort: Option<SortOrder>,
    pub search: Option<String>,
    pub search_namespaces: Option<bool>,
    pub simple: Option<bool>,
    pub owned: Option<bool>,
    pub membership: Option<bool>,
    pub starred: Option<bool>,
    pub statistics: Option<bool>,
    pub with_issues_enabled: Option<bool>,
    pub with_merge_requests_enabled: Option<bool>,
    pub min_access_level: Option<u32>,
    pub id_after: Option<u64>,
    pub id_before: Option<u64>,
    pub last_activity_after: Option<DateTime<Utc>>,
    pub last_activity_before: Option<DateTime<Utc>>,
}

impl ProjectFilter {
    pub fn owned() -> Self {
        Self {
            owned: Some(true),
            ..Self::default()
        }
    }

    pub fn membership() -> Self {
        Self {
            membership: Some(true),
            ..Self::default()
        }
    }

    pub fn starred() -> Self {
        Self {
            starred: Some(true),
            ..Self::default()
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        let mut push = |key: &str, value: String| query.push((key.to_string(), value));

        if let Some(v) = self.archived {
            push("archived", v.to_string());
        }
        if let Some(v) = self.visibility {
            push("visibility", v.as_str().to_string());
        }
        if let Some(v) = self.order_by {
            push("order_by", v.as_str().to_string());
        }
        if let Some(v) = self.sort {
            push("sort", v.as_str().to_string());
        }
        if let Some(v) = &self.search {
            push("search", v.clone());
        }
        if let Some(v) = self.search_namespaces {
            push("search_namespaces", v.to_string());
        }
        if let Some(v) = self.simple {
            push("simple", v.to_string());
        }
        if let Some(v) = self.owned {
            push("owned", v.to_string());
        }
        if let Some(v) = self.membership {
            push("membership", v.to_string());
        }
        if let Some(v) = self.starred {
            push("starred", v.to_string());
        }
        if let Some(v) = self.statistics {
            push("statistics", v.to_string());
        }
        if let Some(v) = self.with_issues_enabled {
            push("with_issues_enabled", v.to_string());
        }
        if let Some(v) = self.with_merge_requests_enabled {
            push("with_merge_requests_enabled", v.to_string());
        }
        if let Some(v) = self.min_access_level {
            push("min_access_level", v.to_string());
        }
        if let Some(v) = self.id_after {
            push("id_after", v.to_string());
        }
        if let Some(v) = self.id_before {
            push("id_before", v.to_string());
        }
        if let Some(v) = self.last_activity_after {
            push(
                "last_activity_after",
                v.to_rfc3339_opts(SecondsFormat::Secs, true),
            );
        }
        if let Some(v) = self.last_activity_before {
            push(
                "last_activity_before",
                v.to_rfc3339_opts(SecondsFormat::Secs, true),
            );
        }
        query
    }
}

/// Body of create and update requests
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_requests_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiki_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippets_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_registry_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfs_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_access_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_jobs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialize_with_readme: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
}

impl ProjectParams {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
struct ForkRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace_path: Option<&'a str>,
}

/// Project façade of a [`crate::api::GitLabApi`]
#[derive(Clone)]
pub struct ProjectApi {
    transport: Transport,
}

impl ProjectApi {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn pager(&self, path: Vec<String>, query: Vec<(String, String)>) -> Result<Pager<Project>, ApiError> {
        let per_page = self.transport.context().default_per_page();
        Pager::new(self.transport.clone(), path, query, per_page)
    }

    /// Pager over all projects visible to the caller.
    pub fn projects(&self, filter: &ProjectFilter) -> Result<Pager<Project>, ApiError> {
        self.pager(vec!["projects".to_string()], filter.to_query())
    }

    pub fn projects_with_page_size(
        &self,
        filter: &ProjectFilter,
        items_per_page: u32,
    ) -> Result<Pager<Project>, ApiError> {
        Pager::new(
            self.transport.clone(),
            vec!["projects".to_string()],
            filter.to_query(),
            items_per_page,
        )
    }

    pub async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, ApiError> {
        self.projects(filter)?.all().await
    }

    pub fn stream_projects(&self, filter: &ProjectFilter) -> Result<PagerStream<Project>, ApiError> {
        Ok(self.projects(filter)?.stream())
    }

    pub fn owned_projects(&self) -> Result<Pager<Project>, ApiError> {
        self.projects(&ProjectFilter::owned())
    }

    pub fn member_projects(&self) -> Result<Pager<Project>, ApiError> {
        self.projects(&ProjectFilter::membership())
    }

    pub fn starred_projects(&self) -> Result<Pager<Project>, ApiError> {
        self.projects(&ProjectFilter::starred())
    }

    pub fn search_projects(&self, text: &str) -> Result<Pager<Project>, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "Search text cannot be empty".to_string(),
            ));
        }
        self.projects(&ProjectFilter::search(text))
    }

    /// Projects owned by a given user.
    pub fn user_projects(
        &self,
        user: impl Into<UserRef>,
        filter: &ProjectFilter,
    ) -> Result<Pager<Project>, ApiError> {
        let user = user.into();
        self.pager(
            vec!["users".to_string(), user.segment(), "projects".to_string()],
            filter.to_query(),
        )
    }

    pub fn forks(&self, project: impl Into<ProjectRef>) -> Result<Pager<Project>, ApiError> {
        let project = project.into();
        self.pager(
            vec!["projects".to_string(), project.segment(), "forks".to_string()],
            Vec::new(),
        )
    }

    pub async fn get_project(
        &self,
        project: impl Into<ProjectRef>,
        with_statistics: bool,
    ) -> Result<Project, ApiError> {
        let segment = project.into().segment();
        let query = if with_statistics {
            vec![("statistics".to_string(), "true".to_string())]
        } else {
            Vec::new()
        };
        self.transport
            .get_json(&["projects", &segment], &query)
            .await
    }

    /// Like [`ProjectApi::get_project`], keeping the failure cause instead of
    /// returning it.
    pub async fn optional_project(&self, project: impl Into<ProjectRef>) -> Lookup<Project> {
        Lookup::from_result(self.get_project(project, false).await)
    }

    pub async fn create_project(&self, params: &ProjectParams) -> Result<Project, ApiError> {
        let has_name = params.name.as_deref().is_some_and(|s| !s.trim().is_empty());
        let has_path = params.path.as_deref().is_some_and(|s| !s.trim().is_empty());
        if !has_name && !has_path {
            return Err(ApiError::InvalidArgument(
                "A project needs a name or a path".to_string(),
            ));
        }
        let project: Project = self.transport.post_json(&["projects"], params).await?;
        info!(project_id = project.id, path = %project.path, "project created");
        Ok(project)
    }

    pub async fn update_project(
        &self,
        project: impl Into<ProjectRef>,
        params: &ProjectParams,
    ) -> Result<Project, ApiError> {
        let segment = project.into().segment();
        self.transport.put_json(&["projects", &segment], params).await
    }

    pub async fn delete_project(&self, project: impl Into<ProjectRef>) -> Result<(), ApiError> {
        let project = project.into();
        let segment = project.segment();
        self.transport.delete(&["projects", &segment]).await?;
        info!(project = %project, "project deleted");
        Ok(())
    }

    /// Fork into the caller's namespace, or into `namespace_path` when given.
    pub async fn fork_project(
        &self,
        project: impl Into<ProjectRef>,
        namespace_path: Option<&str>,
    ) -> Result<Project, ApiError> {
        let segment = project.into().segment();
        let body = ForkRequest { namespace_path };
        self.transport
            .post_json(&["projects", &segment, "fork"], &body)
            .await
    }

    pub async fn star_project(&self, project: impl Into<ProjectRef>) -> Result<Project, ApiError> {
        self.project_action(project.into(), "star").await
    }

    pub async fn unstar_project(&self, project: impl Into<ProjectRef>) -> Result<Project, ApiError> {
        self.project_action(project.into(), "unstar").await
    }

    pub async fn archive_project(&self, project: impl Into<ProjectRef>) -> Result<Project, ApiError> {
        self.project_action(project.into(), "archive").await
    }

    pub async fn unarchive_project(
        &self,
        project: impl Into<ProjectRef>,
    ) -> Result<Project, ApiError> {
        self.project_action(project.into(), "unarchive").await
    }

    // 304 means the project was already in the requested state and comes back
    // without a body.
    async fn project_action(&self, project: ProjectRef, action: &str) -> Result<Project, ApiError> {
        let segment = project.segment();
        let url = self.transport.api_url(&["projects", &segment, action])?;
        let builder = self.transport.request(Method::POST, url)?;
        let response = self.transport.execute(builder).await?;
        if response.status() == StatusCode::NOT_MODIFIED {
            return self.get_project(project, false).await;
        }
        let response = ensure_success(response).await?;
        decode_json(response).await
    }
}
