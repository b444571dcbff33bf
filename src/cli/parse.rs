//! CLI parse: clap types for glkit. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// glkit CLI - GitLab REST client and text utilities
#[derive(Parser)]
#[command(name = "glkit")]
#[command(about = "GitLab REST client with Base32 and configuration tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (config/config.toml is read from here)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// GitLab host URL (overrides gitlab.host_url)
    #[arg(long)]
    pub host: Option<String>,

    /// Private token (overrides gitlab.token)
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Issue API calls as this user id (admin only)
    #[arg(long)]
    pub sudo: Option<u64>,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Rendering for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Project operations
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// User operations
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Base32 encode or decode text
    Base32 {
        #[command(subcommand)]
        command: Base32Commands,
    },
    /// Configuration inspection
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects visible to the current user
    List {
        /// Only projects owned by the current user
        #[arg(long)]
        owned: bool,
        /// Only projects the current user is a member of
        #[arg(long)]
        membership: bool,
        /// Only projects starred by the current user
        #[arg(long)]
        starred: bool,
        /// Include archived projects
        #[arg(long)]
        archived: bool,
        /// Search text
        #[arg(long)]
        search: Option<String>,
        /// Page size (1-100)
        #[arg(long)]
        per_page: Option<u32>,
        /// Stop after this many projects
        #[arg(long)]
        limit: Option<usize>,
        /// Output format (text or json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show one project by id or namespace/path
    Show {
        /// Numeric id or "group/project"
        project: String,
        /// Include repository statistics
        #[arg(long)]
        statistics: bool,
        /// Output format (text or json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Show the authenticated user
    Whoami {
        /// Output format (text or json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Look up a user by username
    Find {
        username: String,
        /// Output format (text or json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum Base32Commands {
    /// Encode UTF-8 text
    Encode {
        text: String,
        /// Use the extended-hex alphabet
        #[arg(long)]
        hex: bool,
        /// Omit trailing padding
        #[arg(long)]
        no_pad: bool,
    },
    /// Decode to UTF-8 text
    Decode {
        text: String,
        /// Use the extended-hex alphabet
        #[arg(long)]
        hex: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration with secrets redacted
    Show,
}
