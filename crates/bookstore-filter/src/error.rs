//! Error types for the filter crate.

use thiserror::Error;

/// A query parameter could not be turned into a filter or page request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The value does not parse as the field's kind.
    #[error("invalid value '{value}' for parameter {parameter}: expected {expected}")]
    InvalidValue {
        parameter: String,
        value: String,
        expected: &'static str,
    },
}

impl FilterError {
    pub(crate) fn invalid(parameter: &str, value: &str, expected: &'static str) -> Self {
        FilterError::InvalidValue {
            parameter: parameter.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

/// Errors reported by a paged repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing store cannot be read.
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
