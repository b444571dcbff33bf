//! Layered configuration loading.

use super::{merge_policy, sources, ToolkitConfig};
use config::{ConfigError, File};
use std::path::Path;

/// Loads [`ToolkitConfig`] from defaults, files and environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Order (later wins): defaults, global file, `config/config.toml`,
    /// `config/{GLKIT_ENV}.toml`, `GLKIT_*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<ToolkitConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = sources::environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load configuration from one explicit file, ignoring other sources.
    pub fn load_from_file(path: &Path) -> Result<ToolkitConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }
}
