//! Signing key configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where to find the Ed25519 key pair used for access tokens.
///
/// Keys are hex-encoded. Environment variables take precedence over files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Environment variable containing the public key (hex-encoded).
    #[serde(default = "default_public_key_env")]
    pub public_key_env: Option<String>,

    /// Path to the public key file.
    #[serde(default)]
    pub public_key_file: Option<PathBuf>,

    /// Environment variable containing the private key (hex-encoded).
    #[serde(default = "default_private_key_env")]
    pub private_key_env: Option<String>,

    /// Path to the private key file.
    #[serde(default)]
    pub private_key_file: Option<PathBuf>,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            public_key_env: default_public_key_env(),
            public_key_file: None,
            private_key_env: default_private_key_env(),
            private_key_file: None,
        }
    }
}

impl KeyConfig {
    /// Resolve the public key from environment or file.
    pub fn resolve_public_key(&self) -> Result<Option<String>, std::io::Error> {
        resolve(self.public_key_env.as_deref(), self.public_key_file.as_ref())
    }

    /// Resolve the private key from environment or file.
    pub fn resolve_private_key(&self) -> Result<Option<String>, std::io::Error> {
        resolve(
            self.private_key_env.as_deref(),
            self.private_key_file.as_ref(),
        )
    }
}

fn resolve(env_var: Option<&str>, path: Option<&PathBuf>) -> Result<Option<String>, std::io::Error> {
    // Try environment variable first
    if let Some(env_var) = env_var
        && let Ok(key) = std::env::var(env_var)
        && !key.trim().is_empty()
    {
        return Ok(Some(key.trim().to_string()));
    }

    // Try file path
    if let Some(path) = path {
        let key = std::fs::read_to_string(path)?;
        return Ok(Some(key.trim().to_string()));
    }

    Ok(None)
}

fn default_public_key_env() -> Option<String> {
    Some("BOOKSTORE_PUBLIC_KEY".to_string())
}

fn default_private_key_env() -> Option<String> {
    Some("BOOKSTORE_PRIVATE_KEY".to_string())
}
