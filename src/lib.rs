//! glkit: GitLab REST client and small utilities
//!
//! An async GitLab v3/v4 REST client with lazy pagination and explicit lookup
//! results, together with a Base32 codec, multiset collection helpers, a
//! dynamically typed map, field masking and a configurable worker runtime.

pub mod api;
pub mod cli;
pub mod codec;
pub mod collections;
pub mod config;
pub mod dict;
pub mod error;
pub mod logging;
pub mod masking;
pub mod models;
pub mod runtime;

pub use api::{GitLabApi, Lookup, Pager};
pub use error::{ApiError, CodecError};
