//! User operations needed by the client: identity, lookup and sudo resolution.

use crate::api::lookup::Lookup;
use crate::api::pager::Pager;
use crate::api::transport::Transport;
use crate::error::ApiError;
use crate::models::User;
use std::fmt;

/// A user addressed by numeric id or username
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserRef {
    Id(u64),
    Username(String),
}

impl UserRef {
    pub fn segment(&self) -> String {
        match self {
            UserRef::Id(id) => id.to_string(),
            UserRef::Username(name) => name.clone(),
        }
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segment())
    }
}

impl From<u64> for UserRef {
    fn from(id: u64) -> Self {
        UserRef::Id(id)
    }
}

impl From<&str> for UserRef {
    fn from(name: &str) -> Self {
        UserRef::Username(name.to_string())
    }
}

impl From<String> for UserRef {
    fn from(name: String) -> Self {
        UserRef::Username(name)
    }
}

/// User façade of a [`crate::api::GitLabApi`]
#[derive(Clone)]
pub struct UserApi {
    transport: Transport,
}

impl UserApi {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// The user the configured token belongs to (or the sudo target).
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.transport.get_json(&["user"], &[]).await
    }

    pub async fn get_user(&self, id: u64) -> Result<User, ApiError> {
        let segment = id.to_string();
        self.transport.get_json(&["users", &segment], &[]).await
    }

    pub async fn optional_user(&self, id: u64) -> Lookup<User> {
        Lookup::from_result(self.get_user(id).await)
    }

    /// Exact username match; `None` when no such user exists.
    pub async fn find_user(&self, username: &str) -> Result<Option<User>, ApiError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::InvalidArgument(
                "Username cannot be empty".to_string(),
            ));
        }
        let query = vec![("username".to_string(), username.to_string())];
        let users: Vec<User> = self.transport.get_json(&["users"], &query).await?;
        Ok(users.into_iter().next())
    }

    pub fn users(&self) -> Result<Pager<User>, ApiError> {
        let per_page = self.transport.context().default_per_page();
        Pager::new(
            self.transport.clone(),
            vec!["users".to_string()],
            Vec::new(),
            per_page,
        )
    }
}
