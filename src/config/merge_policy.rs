//! Merge rules: defaults first, then every source overrides the previous one.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

use crate::api::DEFAULT_PER_PAGE;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("gitlab.host_url", "https://gitlab.com")?
        .set_default("gitlab.api_version", "v4")?
        .set_default("gitlab.token_type", "private")?
        .set_default("gitlab.per_page", DEFAULT_PER_PAGE as i64)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
