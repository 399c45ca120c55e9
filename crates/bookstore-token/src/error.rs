//! Error types for token issuance and validation.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while loading keys or issuing tokens.
///
/// Key errors are configuration defects: a process that cannot sign cannot
/// serve authenticated requests and should stop at startup.
#[derive(Debug, Error)]
pub enum SigningError {
    /// No private key was configured.
    #[error("signing key unavailable: {0}")]
    KeyUnavailable(String),

    /// Failed to parse private key.
    #[error("failed to parse private key: {0}")]
    InvalidPrivateKey(String),

    /// Failed to parse public key.
    #[error("failed to parse public key: {0}")]
    InvalidPublicKey(String),

    /// The configured public key is not the one derived from the private key.
    #[error("public key does not match private key")]
    KeyMismatch,

    /// Configured lifetime is zero or too large.
    #[error("invalid token lifetime: {0}")]
    InvalidLifetime(String),

    /// The identity cannot be turned into a valid claim set.
    #[error(transparent)]
    InvalidClaims(#[from] ClaimsError),

    /// Failed to serialize the token.
    #[error("token serialization error: {0}")]
    SerializationError(String),

    /// IO error (reading/writing keys).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Claim set invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    #[error("claim set must carry at least one role")]
    EmptyRoles,

    #[error("role names must not be blank")]
    BlankRole,

    #[error("subject must not be blank")]
    BlankSubject,

    #[error("custom claim name '{name}' is reserved")]
    ReservedClaim { name: String },

    #[error("expiry must be after issue time")]
    ExpiryNotAfterIssue,

    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(i64),
}

/// Reasons a presented token is rejected.
///
/// Each reason stays distinct so the request boundary can report it without
/// re-deriving the cause. All of them are fixed by authenticating again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is not a well-formed `header.payload.signature` string.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The signature does not verify against the public key.
    #[error("token signature is invalid")]
    InvalidSignature,

    /// The token verified but its expiry has passed.
    #[error("token expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },
}

impl AuthError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }

    /// Stable machine-readable code for error responses.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Malformed(_) => "token_malformed",
            AuthError::InvalidSignature => "token_invalid_signature",
            AuthError::Expired { .. } => "token_expired",
        }
    }
}
