//! Error types for access decisions.

use bookstore_token::AuthError;
use thiserror::Error;

use crate::gate::RoleRequirement;

/// The subject's roles do not satisfy a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("subject '{subject}' does not satisfy requirement {requirement}")]
pub struct AuthorizationDenied {
    pub subject: String,
    pub requirement: RoleRequirement,
}

/// Why a request was not admitted.
///
/// The first two variants mean "authenticate again" (401); the others mean
/// "authenticated, but not allowed" (403).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Protected route and no bearer token was presented.
    #[error("missing bearer token")]
    MissingToken,

    /// The presented token failed validation.
    #[error(transparent)]
    InvalidToken(#[from] AuthError),

    /// Valid token, insufficient role.
    #[error(transparent)]
    Denied(#[from] AuthorizationDenied),

    /// No access rule covers the route.
    #[error("no access rule matches {method} {path}")]
    NoMatchingRule { method: String, path: String },
}

impl AccessError {
    /// HTTP status the boundary should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::MissingToken | AccessError::InvalidToken(_) => 401,
            AccessError::Denied(_) | AccessError::NoMatchingRule { .. } => 403,
        }
    }

    /// Stable machine-readable code for error responses.
    pub fn code(&self) -> &'static str {
        match self {
            AccessError::MissingToken => "token_missing",
            AccessError::InvalidToken(e) => e.code(),
            AccessError::Denied(_) | AccessError::NoMatchingRule { .. } => "forbidden",
        }
    }
}

/// Invalid access rule configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyConfigError {
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid requirement '{requirement}': {reason}")]
    InvalidRequirement { requirement: String, reason: String },
}
