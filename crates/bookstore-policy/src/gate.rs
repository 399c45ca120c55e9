//! Role-based authorization.
//!
//! Roles are flat string tags (`App/Admin`, `App/Customer`); there is no
//! hierarchy, so every decision is a set-membership test.

use bookstore_token::ClaimSet;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::AuthorizationDenied;

/// What a route asks of the caller's roles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleRequirement {
    /// Any authenticated subject (non-empty roles).
    Authenticated,
    /// The subject must hold this role.
    Role(String),
    /// The subject must hold at least one of these roles.
    AnyOf(BTreeSet<String>),
}

impl RoleRequirement {
    pub fn role(role: impl Into<String>) -> Self {
        Self::Role(role.into())
    }

    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(roles.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleRequirement::Authenticated => write!(f, "authenticated"),
            RoleRequirement::Role(role) => write!(f, "role:{}", role),
            RoleRequirement::AnyOf(roles) => {
                let roles: Vec<&str> = roles.iter().map(String::as_str).collect();
                write!(f, "any:{}", roles.join(","))
            }
        }
    }
}

/// Decides whether verified claims satisfy a requirement.
///
/// Stateless; one instance can serve any number of concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationGate;

impl AuthorizationGate {
    pub fn new() -> Self {
        Self
    }

    /// Allow iff the requirement is met by membership in `claims.roles`.
    pub fn authorize(&self, claims: &ClaimSet, required: &RoleRequirement) -> bool {
        let roles = claims.roles();
        if roles.is_empty() {
            return false;
        }

        match required {
            RoleRequirement::Authenticated => true,
            RoleRequirement::Role(role) => roles.contains(role),
            RoleRequirement::AnyOf(any) => any.iter().any(|role| roles.contains(role)),
        }
    }

    /// Like [`authorize`](Self::authorize), but explains a denial.
    pub fn check(
        &self,
        claims: &ClaimSet,
        required: &RoleRequirement,
    ) -> Result<(), AuthorizationDenied> {
        if self.authorize(claims, required) {
            Ok(())
        } else {
            Err(AuthorizationDenied {
                subject: claims.subject().to_string(),
                requirement: required.clone(),
            })
        }
    }
}
