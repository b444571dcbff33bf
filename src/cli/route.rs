//! CLI route: single route table and run context. Dispatches to the GitLab client,
//! codecs and presentation.

use crate::api::{GitLabApi, ProjectFilter, ProjectRef};
use crate::codec::Base32;
use crate::config::{ConfigLoader, ToolkitConfig};
use crate::error::ApiError;
use crate::runtime::RuntimeBuilder;
use futures::{StreamExt, TryStreamExt};
use std::future::Future;
use std::path::PathBuf;
use std::sync::OnceLock;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::cli::parse::{
    Base32Commands, Commands, ConfigCommands, ProjectCommands, UserCommands,
};
use crate::cli::presentation::{format_project, format_projects, format_user};

/// Connection settings given on the command line; each one wins over config.
#[derive(Debug, Clone, Default)]
pub struct GitLabOverrides {
    pub host: Option<String>,
    pub token: Option<String>,
    pub sudo: Option<u64>,
}

/// Runtime context for CLI execution: effective config, worker runtime and the
/// lazily built GitLab client.
pub struct RunContext {
    config: ToolkitConfig,
    runtime: OnceLock<Runtime>,
    client: OnceLock<GitLabApi>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        overrides: GitLabOverrides,
    ) -> Result<Self, ApiError> {
        let mut config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };

        if let Some(host) = overrides.host {
            config.gitlab.host_url = host;
        }
        if let Some(token) = overrides.token {
            config.gitlab.token = Some(token);
        }
        if overrides.sudo.is_some() {
            config.gitlab.sudo_as_id = overrides.sudo;
        }

        Ok(Self {
            config: config.validated()?,
            runtime: OnceLock::new(),
            client: OnceLock::new(),
        })
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    fn client(&self) -> Result<&GitLabApi, ApiError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = GitLabApi::from_config(&self.config.gitlab)?;
        debug!(host = client.host_url(), "GitLab client initialized");
        Ok(self.client.get_or_init(|| client))
    }

    fn block_on<F: Future>(&self, future: F) -> Result<F::Output, ApiError> {
        if self.runtime.get().is_none() {
            let runtime = RuntimeBuilder::from_config(&self.config.runtime)
                .build()
                .map_err(|e| ApiError::ConfigError(format!("Failed to start runtime: {}", e)))?;
            let _ = self.runtime.set(runtime);
        }
        match self.runtime.get() {
            Some(runtime) => Ok(runtime.block_on(future)),
            None => Err(ApiError::ConfigError("Runtime unavailable".to_string())),
        }
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Projects { command } => self.handle_projects(command),
            Commands::Users { command } => self.handle_users(command),
            Commands::Base32 { command } => handle_base32(command),
            Commands::Config { command } => match command {
                ConfigCommands::Show => self.config.to_display_toml(),
            },
        }
    }

    fn handle_projects(&self, command: &ProjectCommands) -> Result<String, ApiError> {
        match command {
            ProjectCommands::List {
                owned,
                membership,
                starred,
                archived,
                search,
                per_page,
                limit,
                format,
            } => {
                let filter = ProjectFilter {
                    owned: owned.then_some(true),
                    membership: membership.then_some(true),
                    starred: starred.then_some(true),
                    archived: archived.then_some(true),
                    search: search.clone(),
                    ..Default::default()
                };
                let projects = self.client()?.projects();
                let pager = match per_page {
                    Some(n) => projects.projects_with_page_size(&filter, *n)?,
                    None => projects.projects(&filter)?,
                };
                let list = self.block_on(async move {
                    match limit {
                        Some(n) => pager.stream().take(*n).try_collect::<Vec<_>>().await,
                        None => pager.all().await,
                    }
                })??;
                info!(count = list.len(), "Listed projects");
                format_projects(&list, *format)
            }
            ProjectCommands::Show {
                project,
                statistics,
                format,
            } => {
                let project: ProjectRef = project.parse()?;
                let projects = self.client()?.projects();
                let found = self.block_on(projects.get_project(project, *statistics))??;
                format_project(&found, *format)
            }
        }
    }

    fn handle_users(&self, command: &UserCommands) -> Result<String, ApiError> {
        let users = self.client()?.users();
        match command {
            UserCommands::Whoami { format } => {
                let user = self.block_on(users.current_user())??;
                format_user(&user, *format)
            }
            UserCommands::Find { username, format } => {
                match self.block_on(users.find_user(username))?? {
                    Some(user) => format_user(&user, *format),
                    None => Err(ApiError::not_found(format!("User '{}' not found", username))),
                }
            }
        }
    }
}

fn handle_base32(command: &Base32Commands) -> Result<String, ApiError> {
    match command {
        Base32Commands::Encode { text, hex, no_pad } => {
            let engine = match (hex, no_pad) {
                (false, false) => Base32::STANDARD,
                (false, true) => Base32::STANDARD_NO_PAD,
                (true, false) => Base32::HEX,
                (true, true) => Base32::HEX_NO_PAD,
            };
            Ok(engine.encode_str(text))
        }
        Base32Commands::Decode { text, hex } => {
            let engine = if *hex { Base32::HEX } else { Base32::STANDARD };
            Ok(engine.decode_str(text.trim())?)
        }
    }
}
