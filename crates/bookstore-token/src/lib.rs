//! # bookstore-token
//!
//! Signed, self-verifying access tokens for the bookstore API.
//!
//! This crate provides functionality for:
//! - Generating and loading Ed25519 key pairs
//! - Issuing tokens for an authenticated identity with a fixed lifetime
//! - Validating tokens and reconstructing their claims
//!
//! ## Wire Form
//!
//! Tokens are compact JWS strings, `header.payload.signature`, each segment
//! base64url-encoded without padding:
//!
//! | Segment | Contents |
//! |---------|----------|
//! | header | `{"alg":"EdDSA","typ":"JWT"}` |
//! | payload | `sub`, `iat`, `exp`, `realm_access.roles`, custom string claims |
//! | signature | Ed25519 over the ASCII bytes `header.payload` |
//!
//! Tokens are stateless: nothing is stored on issue, and validation depends
//! only on the token, the public key and the clock.

pub mod claims;
pub mod error;
pub mod keys;
pub mod token;

pub use claims::{ClaimSet, Identity, RESERVED_CLAIMS};
pub use ed25519_dalek::VerifyingKey as PublicKey;
pub use error::{AuthError, ClaimsError, SigningError};
pub use keys::KeyMaterial;
pub use token::{IssuedToken, Token, TokenInfo, TokenIssuer, TokenValidator, inspect_unverified};
