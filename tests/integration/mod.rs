//! Integration tests for the glkit GitLab client

mod auth;
mod config_integration;
mod pager;
mod projects;
mod session;
mod test_utils;
