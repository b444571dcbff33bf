//! Non-throwing access to single resources.
//!
//! A [`Lookup`] is either the resource or the error that prevented fetching it. The
//! error travels inside the value, so callers that only care about presence can
//! ignore it and callers that need the cause can still inspect it.

use crate::error::ApiError;

#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    Missing(ApiError),
}

impl<T> Lookup<T> {
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Lookup::Found(value),
            Err(err) => Lookup::Missing(err),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing(_) => None,
        }
    }

    /// The error of a failed lookup; `None` when the resource was found.
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Lookup::Found(_) => None,
            Lookup::Missing(err) => Some(err),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            Lookup::Found(value) => Ok(value),
            Lookup::Missing(err) => Err(err),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Missing(err) => Lookup::Missing(err),
        }
    }

    /// Treat a 404 as absence and anything else as a hard failure.
    pub fn found_or_not_found(self) -> Result<Option<T>, ApiError> {
        match self {
            Lookup::Found(value) => Ok(Some(value)),
            Lookup::Missing(err) if err.is_not_found() => Ok(None),
            Lookup::Missing(err) => Err(err),
        }
    }
}

impl<T> From<Result<T, ApiError>> for Lookup<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        Lookup::from_result(result)
    }
}
