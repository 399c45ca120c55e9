use anyhow::Context;
use bookstore_core::UserConfig;
use bookstore_token::{ClaimSet, Identity};
use chrono::{Duration, Utc};

use super::credentials::{InMemoryCredentials, hash_password};

/// Build the embedded verifier from the configured users.
///
/// Password source per user (highest precedence first):
/// - `password_env`: clear-text password read from the environment and
///   hashed here
/// - `password_hash`: argon2 PHC string from the config file
pub fn load_users(users: &[UserConfig]) -> anyhow::Result<InMemoryCredentials> {
    let mut creds = InMemoryCredentials::new();

    for user in users {
        let env_password = user
            .password_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|p| !p.is_empty());

        let hash = match (env_password, &user.password_hash) {
            (Some(password), _) => hash_password(&password)
                .with_context(|| format!("hashing password for user '{}'", user.username))?,
            (None, Some(hash)) => hash.clone(),
            (None, None) => anyhow::bail!(
                "password for user '{}' is not set (set {})",
                user.username,
                user.password_env.as_deref().unwrap_or("password_hash")
            ),
        };

        let identity = Identity::new(user.username.trim())
            .with_roles(user.roles.iter().map(|r| r.trim()).filter(|r| !r.is_empty()))
            .with_claims(user.claims.clone());

        // Anything that would stop a token from being issued for this user
        // (reserved claim names, blank roles) is a startup error.
        let now = Utc::now();
        ClaimSet::new(identity.clone(), now, now + Duration::seconds(1))
            .with_context(|| format!("user '{}' cannot be issued tokens", user.username))?;

        creds.insert(identity, hash)?;
    }

    if creds.is_empty() {
        tracing::warn!("no users configured; every login will be rejected");
    } else {
        tracing::info!(users = creds.len(), "loaded embedded users");
    }
    Ok(creds)
}
