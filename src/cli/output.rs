//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map client errors to a single line for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Authentication { .. } => {
            format!("{} (check gitlab.token or --token)", e)
        }
        ApiError::ConfigError(_) => format!("{} (see `glkit config show`)", e),
        _ => e.to_string(),
    }
}
