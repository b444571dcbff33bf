//! CLI presentation: text tables and JSON for command results.

use crate::cli::parse::OutputFormat;
use crate::error::ApiError;
use crate::models::{Project, User};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::Parse(e.to_string()))
}

pub fn format_projects(projects: &[Project], format: OutputFormat) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return to_json(projects);
    }
    if projects.is_empty() {
        return Ok("No projects found.".to_string());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["ID", "Path", "Visibility", "Stars", "Last activity"]);
    for project in projects {
        table.add_row(vec![
            project.id.to_string(),
            project
                .path_with_namespace
                .clone()
                .unwrap_or_else(|| project.path.clone()),
            project
                .visibility
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            project.star_count.to_string(),
            project
                .last_activity_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    Ok(format!(
        "{}\n{}\n\nTotal: {} project(s)",
        format_section_heading("Projects"),
        table,
        projects.len()
    ))
}

pub fn format_project(project: &Project, format: OutputFormat) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return to_json(project);
    }
    let title = project
        .name_with_namespace
        .clone()
        .unwrap_or_else(|| project.name.clone());
    let mut output = format!("{}\n", format_section_heading(&title));
    output.push_str(&format!("ID: {}\n", project.id));
    if let Some(path) = &project.path_with_namespace {
        output.push_str(&format!("Path: {}\n", path));
    }
    if let Some(visibility) = project.visibility {
        output.push_str(&format!("Visibility: {}\n", visibility));
    }
    if let Some(branch) = &project.default_branch {
        output.push_str(&format!("Default branch: {}\n", branch));
    }
    if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
        output.push_str(&format!("Description: {}\n", description));
    }
    if let Some(url) = &project.web_url {
        output.push_str(&format!("URL: {}\n", url));
    }
    output.push_str(&format!(
        "Stars: {}  Forks: {}\n",
        project.star_count, project.forks_count
    ));
    if project.archived {
        output.push_str(&format!("{}\n", "Archived".yellow()));
    }
    if let Some(stats) = &project.statistics {
        output.push_str(&format!(
            "Commits: {}  Repository size: {} bytes\n",
            stats.commit_count, stats.repository_size
        ));
    }
    Ok(output.trim_end().to_string())
}

pub fn format_user(user: &User, format: OutputFormat) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return to_json(user);
    }
    let mut output = format!("{} (@{})\n", user.name.bold(), user.username);
    output.push_str(&format!("ID: {}\n", user.id));
    if let Some(state) = &user.state {
        let state = if state == "active" {
            state.green().to_string()
        } else {
            state.red().to_string()
        };
        output.push_str(&format!("State: {}\n", state));
    }
    if let Some(email) = &user.email {
        output.push_str(&format!("Email: {}\n", email));
    }
    if user.is_admin == Some(true) {
        output.push_str("Administrator\n");
    }
    if let Some(url) = &user.web_url {
        output.push_str(&format!("URL: {}\n", url));
    }
    Ok(output.trim_end().to_string())
}
