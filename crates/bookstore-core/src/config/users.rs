//! Users accepted by the embedded credential verifier.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ConfigError;

/// A login known to the embedded verifier.
///
/// The password is given either as an argon2 PHC string or through an
/// environment variable holding the clear-text password, which is hashed at
/// startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub username: String,

    /// Argon2 PHC string.
    #[serde(default)]
    pub password_hash: Option<String>,

    /// Environment variable holding the clear-text password.
    #[serde(default)]
    pub password_env: Option<String>,

    /// Roles put into issued tokens.
    pub roles: Vec<String>,

    /// Extra string claims put into issued tokens (e.g. `customer_id`).
    #[serde(default)]
    pub claims: BTreeMap<String, String>,
}

impl UserConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.username.trim().is_empty() {
            return Err(ConfigError::Config("user with empty username".to_string()));
        }
        if self.roles.iter().all(|r| r.trim().is_empty()) {
            return Err(ConfigError::Config(format!(
                "user '{}' has no roles",
                self.username
            )));
        }
        if self.password_hash.is_none() && self.password_env.is_none() {
            return Err(ConfigError::Config(format!(
                "user '{}' needs password_hash or password_env",
                self.username
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: Vec<&str>) -> UserConfig {
        UserConfig {
            username: "carroyom".to_string(),
            password_hash: None,
            password_env: Some("CARROYOM_PASSWORD".to_string()),
            roles: roles.into_iter().map(String::from).collect(),
            claims: BTreeMap::new(),
        }
    }

    #[test]
    fn test_user_needs_a_role() {
        assert!(user(vec![]).validate().is_err());
        assert!(user(vec![" "]).validate().is_err());
        assert!(user(vec!["App/Admin"]).validate().is_ok());
    }

    #[test]
    fn test_user_needs_a_password_source() {
        let mut u = user(vec!["App/Customer"]);
        u.password_env = None;
        assert!(u.validate().is_err());
    }
}
