//! The result envelope used by the repository and the query pipelines.

use crate::error::TippleError;

/// Outcome of a repository call or pipeline fetch.
///
/// Equality is structural: two `Success` values are equal when their
/// payloads are, two `Error` values when their causes are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T> {
    Loading,
    Success(T),
    Error(TippleError),
}

impl<T> Resource<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Resource::Error(_))
    }

    /// Borrow the payload of a `Success`.
    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Loading => Resource::Loading,
            Resource::Success(data) => Resource::Success(f(data)),
            Resource::Error(err) => Resource::Error(err),
        }
    }
}

impl<T> From<Result<T, TippleError>> for Resource<T> {
    fn from(result: Result<T, TippleError>) -> Self {
        match result {
            Ok(data) => Resource::Success(data),
            Err(err) => Resource::Error(err),
        }
    }
}
