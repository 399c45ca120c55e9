//! Token claims.
//!
//! [`ClaimSet`] is the flat, verified view every consumer works with. The
//! nested wire payload (`realm_access.roles`, top-level custom members) is
//! private to this crate and is flattened exactly once, right after the
//! signature has been checked.

use crate::error::ClaimsError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Payload member names that custom claims may not use.
pub const RESERVED_CLAIMS: &[&str] = &[
    "sub",
    "iat",
    "exp",
    "nbf",
    "iss",
    "aud",
    "jti",
    "realm_access",
];

/// Who a token is being issued for, as reported by the credential verifier.
///
/// The issuer adds the issue and expiry times.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
    pub subject: String,
    pub roles: BTreeSet<String>,
    pub custom_claims: BTreeMap<String, String>,
}

impl Identity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_claims.insert(name.into(), value.into());
        self
    }

    pub fn with_claims<I, K, V>(mut self, claims: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.custom_claims
            .extend(claims.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

/// The verified contents of a token.
///
/// Built by the issuer at mint time and rebuilt by the validator; never
/// mutated afterwards. `expires_at > issued_at` and `roles` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSet {
    subject: String,
    roles: BTreeSet<String>,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    custom_claims: BTreeMap<String, String>,
}

impl ClaimSet {
    /// Build a claim set, checking its invariants.
    ///
    /// Times are truncated to whole seconds, the precision of the wire form.
    pub fn new(
        identity: Identity,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, ClaimsError> {
        let Identity {
            subject,
            roles,
            custom_claims,
        } = identity;

        if subject.trim().is_empty() {
            return Err(ClaimsError::BlankSubject);
        }
        if roles.is_empty() {
            return Err(ClaimsError::EmptyRoles);
        }
        if roles.iter().any(|r| r.trim().is_empty()) {
            return Err(ClaimsError::BlankRole);
        }
        if let Some(name) = custom_claims
            .keys()
            .find(|name| RESERVED_CLAIMS.contains(&name.as_str()))
        {
            return Err(ClaimsError::ReservedClaim { name: name.clone() });
        }

        let issued_at = whole_seconds(issued_at.timestamp())?;
        let expires_at = whole_seconds(expires_at.timestamp())?;
        if expires_at <= issued_at {
            return Err(ClaimsError::ExpiryNotAfterIssue);
        }

        Ok(Self {
            subject,
            roles,
            issued_at,
            expires_at,
            custom_claims,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn custom_claims(&self) -> &BTreeMap<String, String> {
        &self.custom_claims
    }

    /// Look up a custom claim (e.g. `customer_id`).
    pub fn custom_claim(&self, name: &str) -> Option<&str> {
        self.custom_claims.get(name).map(String::as_str)
    }

    /// Check if the subject holds a role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Time between issue and expiry.
    pub fn lifetime(&self) -> Duration {
        self.expires_at - self.issued_at
    }

    /// Check expiry against a clock reading. The expiry instant itself is
    /// still valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

fn whole_seconds(timestamp: i64) -> Result<DateTime<Utc>, ClaimsError> {
    DateTime::from_timestamp(timestamp, 0).ok_or(ClaimsError::TimestampOutOfRange(timestamp))
}

#[derive(Debug, Serialize, Deserialize)]
struct RealmAccess {
    roles: Vec<String>,
}

/// JSON payload as it travels inside the token.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireClaims {
    sub: String,
    iat: i64,
    exp: i64,
    realm_access: RealmAccess,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl From<&ClaimSet> for WireClaims {
    fn from(claims: &ClaimSet) -> Self {
        Self {
            sub: claims.subject.clone(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
            realm_access: RealmAccess {
                roles: claims.roles.iter().cloned().collect(),
            },
            extra: claims
                .custom_claims
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        }
    }
}

impl TryFrom<WireClaims> for ClaimSet {
    type Error = ClaimsError;

    fn try_from(wire: WireClaims) -> Result<Self, Self::Error> {
        // Only string members become custom claims; registered claims we do
        // not interpret (iss, jti, ...) and structured members are dropped.
        let custom_claims = wire
            .extra
            .into_iter()
            .filter(|(name, _)| !RESERVED_CLAIMS.contains(&name.as_str()))
            .filter_map(|(name, value)| match value {
                Value::String(s) => Some((name, s)),
                _ => None,
            })
            .collect();

        let identity = Identity {
            subject: wire.sub,
            roles: wire.realm_access.roles.into_iter().collect(),
            custom_claims,
        };

        ClaimSet::new(
            identity,
            whole_seconds(wire.iat)?,
            whole_seconds(wire.exp)?,
        )
    }
}
