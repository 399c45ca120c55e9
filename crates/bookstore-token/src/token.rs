//! Token issuance and validation.

use crate::claims::{ClaimSet, Identity, WireClaims};
use crate::error::{AuthError, SigningError};
use crate::keys::KeyMaterial;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use ed25519_dalek::{Signature, Signer, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

const ALGORITHM: &str = "EdDSA";
const TOKEN_TYPE: &str = "JWT";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// An issued access token in its wire form.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Bearer tokens are credentials; keep them out of debug output and logs.
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(<{} bytes>)", self.0.len())
    }
}

/// A token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: Token,
    pub claims: ClaimSet,
}

/// Signs claim sets into tokens.
///
/// The issuer, not the caller, decides `issued_at` and `expires_at`, so a
/// caller cannot ask for a longer-lived token than configured.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Arc<KeyMaterial>,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Create an issuer with the given key material and token lifetime.
    pub fn new(keys: Arc<KeyMaterial>, lifetime: std::time::Duration) -> Result<Self, SigningError> {
        let lifetime = Duration::from_std(lifetime)
            .map_err(|e| SigningError::InvalidLifetime(e.to_string()))?;
        if lifetime <= Duration::zero() {
            return Err(SigningError::InvalidLifetime(
                "lifetime must be greater than zero".to_string(),
            ));
        }
        Ok(Self { keys, lifetime })
    }

    /// Lifetime of issued tokens.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// A validator for the tokens this issuer produces.
    pub fn validator(&self) -> TokenValidator {
        TokenValidator::new(self.keys.public_key())
    }

    /// Issue a token for an identity, starting now.
    pub fn issue(&self, identity: Identity) -> Result<IssuedToken, SigningError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token for an identity with an explicit clock reading.
    pub fn issue_at(
        &self,
        identity: Identity,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, SigningError> {
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| SigningError::InvalidLifetime("expiry out of range".to_string()))?;
        let claims = ClaimSet::new(identity, now, expires_at)?;
        let token = self.sign(&claims)?;

        tracing::debug!(
            subject = claims.subject(),
            roles = claims.roles().len(),
            expires_at = %claims.expires_at(),
            "issued access token"
        );

        Ok(IssuedToken { token, claims })
    }

    fn sign(&self, claims: &ClaimSet) -> Result<Token, SigningError> {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
        };
        let header_json = serde_json::to_vec(&header)
            .map_err(|e| SigningError::SerializationError(e.to_string()))?;
        let payload_json = serde_json::to_vec(&WireClaims::from(claims))
            .map_err(|e| SigningError::SerializationError(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header_json),
            URL_SAFE_NO_PAD.encode(payload_json)
        );
        let signature = self.keys.signing_key().sign(signing_input.as_bytes());

        Ok(Token(format!(
            "{}.{}",
            signing_input,
            URL_SAFE_NO_PAD.encode(signature.to_bytes())
        )))
    }
}

/// Verifies tokens and reconstructs their claims.
///
/// Validation depends only on the token, the public key and the clock, so a
/// single validator can be shared by every request.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    public_key: VerifyingKey,
}

/// The three segments of a compact token, still encoded.
struct Segments<'a> {
    signing_input: &'a str,
    header: &'a str,
    payload: &'a str,
    signature: &'a str,
}

impl TokenValidator {
    /// Create a new token validator with the given public key.
    pub fn new(public_key: VerifyingKey) -> Self {
        Self { public_key }
    }

    /// Create a validator for tokens signed with this key material.
    pub fn from_keys(keys: &KeyMaterial) -> Self {
        Self::new(keys.public_key())
    }

    /// Validate a token against the current time.
    pub fn validate(&self, token: &str) -> Result<ClaimSet, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token against an explicit clock reading.
    ///
    /// Checks run in a fixed order (structure, signature, claims, expiry) and
    /// the first failure is returned.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<ClaimSet, AuthError> {
        let segments = split(token)?;

        // 1. Structure: header and payload must decode
        let header = decode_header(segments.header)?;
        if header.alg != ALGORITHM {
            return Err(AuthError::malformed(format!(
                "unsupported algorithm '{}'",
                header.alg
            )));
        }
        if let Some(typ) = &header.typ
            && !typ.eq_ignore_ascii_case(TOKEN_TYPE)
        {
            return Err(AuthError::malformed(format!("unsupported token type '{}'", typ)));
        }
        let payload = URL_SAFE_NO_PAD
            .decode(segments.payload)
            .map_err(|e| AuthError::malformed(format!("payload is not base64url: {}", e)))?;

        // 2. Signature over the exact encoded header and payload
        let signature_bytes = URL_SAFE_NO_PAD
            .decode(segments.signature)
            .map_err(|_| AuthError::InvalidSignature)?;
        let signature =
            Signature::from_slice(&signature_bytes).map_err(|_| AuthError::InvalidSignature)?;
        self.public_key
            .verify_strict(segments.signing_input.as_bytes(), &signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        // 3. Claims, flattened once
        let wire: WireClaims = serde_json::from_slice(&payload)
            .map_err(|e| AuthError::malformed(format!("invalid payload: {}", e)))?;
        let claims = ClaimSet::try_from(wire)
            .map_err(|e| AuthError::malformed(format!("invalid claims: {}", e)))?;

        // 4. Expiry
        if claims.is_expired_at(now) {
            return Err(AuthError::Expired {
                expired_at: claims.expires_at(),
            });
        }

        Ok(claims)
    }
}

/// Split at the first two dots. Everything after the second dot is the
/// signature segment, so stray dots there fail signature decoding instead of
/// changing the token's shape.
fn split(token: &str) -> Result<Segments<'_>, AuthError> {
    let (header, rest) = token
        .split_once('.')
        .ok_or_else(|| AuthError::malformed("expected header.payload.signature"))?;
    let (payload, signature) = rest
        .split_once('.')
        .ok_or_else(|| AuthError::malformed("missing signature segment"))?;

    if header.is_empty() || payload.is_empty() {
        return Err(AuthError::malformed("empty header or payload segment"));
    }
    if signature.is_empty() {
        return Err(AuthError::malformed("unsigned token"));
    }

    Ok(Segments {
        signing_input: &token[..header.len() + 1 + payload.len()],
        header,
        payload,
        signature,
    })
}

fn decode_header(header: &str) -> Result<Header, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| AuthError::malformed(format!("header is not base64url: {}", e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::malformed(format!("invalid header: {}", e)))
}

/// Decode a token without verifying it (for debugging).
pub fn inspect_unverified(token: &str) -> Result<TokenInfo, AuthError> {
    let segments = split(token)?;
    let header = decode_header(segments.header)?;
    let payload = URL_SAFE_NO_PAD
        .decode(segments.payload)
        .map_err(|e| AuthError::malformed(format!("payload is not base64url: {}", e)))?;
    let payload: serde_json::Value = serde_json::from_slice(&payload)
        .map_err(|e| AuthError::malformed(format!("invalid payload: {}", e)))?;

    Ok(TokenInfo {
        algorithm: header.alg,
        payload,
    })
}

/// Information about a token (for inspection).
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// The `alg` header value.
    pub algorithm: String,
    /// The decoded, unverified payload.
    pub payload: serde_json::Value,
}
