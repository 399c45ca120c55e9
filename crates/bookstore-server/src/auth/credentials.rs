//! Username/password verification for the login endpoint.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use bookstore_token::Identity;
use std::collections::HashMap;

/// Checks a username and password and reports who the caller is.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// `None` when the username is unknown or the password does not match.
    async fn verify(&self, username: &str, password: &str) -> Option<Identity>;
}

#[derive(Debug)]
struct StoredUser {
    /// Argon2 PHC string.
    password_hash: String,
    identity: Identity,
}

/// Verifier over a fixed set of users held in memory.
///
/// Unknown usernames are checked against a throwaway hash so that both
/// rejection paths cost one argon2 verification.
#[derive(Debug)]
pub struct InMemoryCredentials {
    users: HashMap<String, StoredUser>,
    dummy_hash: Option<String>,
}

impl Default for InMemoryCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        let dummy_hash = hash_password("bookstore-unknown-user")
            .inspect_err(|e| tracing::warn!(error = %e, "failed to prepare dummy password hash"))
            .ok();
        Self {
            users: HashMap::new(),
            dummy_hash,
        }
    }

    /// Register a user with an argon2 PHC hash.
    pub fn insert(&mut self, identity: Identity, password_hash: String) -> anyhow::Result<()> {
        PasswordHash::new(&password_hash).map_err(|e| {
            anyhow::anyhow!("invalid password hash for '{}': {}", identity.subject, e)
        })?;
        self.users.insert(
            identity.subject.clone(),
            StoredUser {
                password_hash,
                identity,
            },
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialVerifier for InMemoryCredentials {
    async fn verify(&self, username: &str, password: &str) -> Option<Identity> {
        let Some(user) = self.users.get(username) else {
            if let Some(dummy) = &self.dummy_hash {
                let _ = check_password(dummy, password);
            }
            return None;
        };
        check_password(&user.password_hash, password).then(|| user.identity.clone())
    }
}

fn check_password(password_hash: &str, password: &str) -> bool {
    PasswordHash::new(password_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Hash a clear-text password into an argon2 PHC string.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify() {
        let mut creds = InMemoryCredentials::new();
        creds
            .insert(
                Identity::new("carroyom").with_role("App/Admin"),
                hash_password("s3cret").unwrap(),
            )
            .unwrap();

        let identity = creds.verify("carroyom", "s3cret").await.unwrap();
        assert!(identity.roles.contains("App/Admin"));

        assert!(creds.verify("carroyom", "wrong").await.is_none());
        assert!(creds.verify("nobody", "s3cret").await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_still_runs_a_verification() {
        let creds = InMemoryCredentials::new();
        let dummy = creds.dummy_hash.as_deref().unwrap();

        assert!(PasswordHash::new(dummy).is_ok());
        assert!(!check_password(dummy, "s3cret"));
        assert!(creds.verify("nobody", "bookstore-unknown-user").await.is_none());
    }

    #[test]
    fn test_rejects_malformed_hash() {
        let mut creds = InMemoryCredentials::new();
        let result = creds.insert(Identity::new("u").with_role("r"), "plain".to_string());
        assert!(result.is_err());
        assert!(creds.is_empty());
    }
}
