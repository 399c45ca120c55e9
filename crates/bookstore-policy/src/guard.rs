//! Request admission.

use bookstore_core::AccessRuleConfig;
use bookstore_token::{ClaimSet, TokenValidator};
use chrono::{DateTime, Utc};

use crate::access::{Access, AccessTable};
use crate::error::{AccessError, PolicyConfigError};
use crate::gate::AuthorizationGate;

/// Outcome of a successful admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Public route. Carries the caller's claims when a valid token was
    /// presented anyway.
    Public(Option<ClaimSet>),
    /// Protected route, token valid and requirement met.
    Authenticated(ClaimSet),
}

impl Admission {
    pub fn claims(&self) -> Option<&ClaimSet> {
        match self {
            Admission::Public(claims) => claims.as_ref(),
            Admission::Authenticated(claims) => Some(claims),
        }
    }

    pub fn into_claims(self) -> Option<ClaimSet> {
        match self {
            Admission::Public(claims) => claims,
            Admission::Authenticated(claims) => Some(claims),
        }
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; an empty token is treated as
/// absent.
pub fn bearer_token(header: &str) -> Option<&str> {
    let header = header.trim();
    let (scheme, token) = header.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Validates and authorizes each incoming request against the access table.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    validator: TokenValidator,
    gate: AuthorizationGate,
    table: AccessTable,
}

impl AccessGuard {
    pub fn new(validator: TokenValidator, table: AccessTable) -> Self {
        Self {
            validator,
            gate: AuthorizationGate::new(),
            table,
        }
    }

    pub fn from_config(
        validator: TokenValidator,
        rules: &[AccessRuleConfig],
    ) -> Result<Self, PolicyConfigError> {
        Ok(Self::new(validator, AccessTable::from_config(rules)?))
    }

    pub fn table(&self) -> &AccessTable {
        &self.table
    }

    /// Decide whether a request may proceed.
    ///
    /// `authorization` is the raw `Authorization` header value, if any.
    pub fn admit(
        &self,
        method: &str,
        path: &str,
        authorization: Option<&str>,
    ) -> Result<Admission, AccessError> {
        self.admit_at(method, path, authorization, Utc::now())
    }

    /// Like [`admit`](Self::admit), against a fixed clock reading.
    pub fn admit_at(
        &self,
        method: &str,
        path: &str,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Admission, AccessError> {
        let Some(rule) = self.table.lookup(method, path) else {
            tracing::warn!(method, path, "no access rule matches request");
            return Err(AccessError::NoMatchingRule {
                method: method.to_string(),
                path: path.to_string(),
            });
        };

        let token = authorization.and_then(bearer_token);

        let requirement = match &rule.access {
            Access::Public => {
                // A bad token on a public route is ignored, not rejected.
                let claims = token.and_then(|t| self.validator.validate_at(t, now).ok());
                return Ok(Admission::Public(claims));
            }
            Access::Protected(requirement) => requirement,
        };

        let Some(token) = token else {
            tracing::debug!(method, path, "protected route requested without token");
            return Err(AccessError::MissingToken);
        };

        let claims = self.validator.validate_at(token, now).map_err(|e| {
            tracing::warn!(method, path, code = e.code(), "rejected token");
            AccessError::from(e)
        })?;

        self.gate.check(&claims, requirement).map_err(|denied| {
            tracing::warn!(
                method,
                path,
                subject = %denied.subject,
                requirement = %denied.requirement,
                "authorization denied"
            );
            AccessError::from(denied)
        })?;

        Ok(Admission::Authenticated(claims))
    }
}
