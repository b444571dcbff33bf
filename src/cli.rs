//! CLI domain: parse, route, output, and presentation only.
//! No client logic; single route table dispatches to the library.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{
    Base32Commands, Cli, Commands, ConfigCommands, OutputFormat, ProjectCommands, UserCommands,
};
pub use presentation::{format_project, format_projects, format_user};
pub use route::{GitLabOverrides, RunContext};
