//! Configuration types for the bookstore API.
//!
//! Everything is loaded from a single YAML file (`bookstore.yaml` by default):
//!
//! ```yaml
//! server:
//!   bind: 0.0.0.0:8080
//! keys:
//!   private_key_file: keys/private.key
//! token:
//!   lifetime: 1h
//! pagination:
//!   default_page_size: 25
//! access:
//!   - { method: GET, path: "/api/books/**", require: none }
//!   - { path: "/api/customers/**", require: "role:App/Admin" }
//! users:
//!   - username: carroyom
//!     password_env: CARROYOM_PASSWORD
//!     roles: ["App/Admin"]
//! ```

pub mod access;
pub mod keys;
pub mod users;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use access::{AccessRuleConfig, default_access_rules};
pub use keys::KeyConfig;
pub use users::UserConfig;

/// Complete bookstore configuration loaded from a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookstoreConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Where the signing key pair comes from.
    #[serde(default)]
    pub keys: KeyConfig,

    /// Access token settings.
    #[serde(default)]
    pub token: TokenConfig,

    /// Listing endpoint page sizes.
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Ordered route access rules; the first matching rule wins.
    #[serde(default = "default_access_rules")]
    pub access: Vec<AccessRuleConfig>,

    /// Users accepted by the embedded credential verifier.
    #[serde(default)]
    pub users: Vec<UserConfig>,

    /// Optional JSON catalog used to seed the in-memory repositories.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

impl Default for BookstoreConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            keys: KeyConfig::default(),
            token: TokenConfig::default(),
            pagination: PaginationConfig::default(),
            access: default_access_rules(),
            users: Vec::new(),
            seed_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8080"
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Access token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Lifetime of newly issued tokens (e.g., "1h", "30m").
    #[serde(default = "default_lifetime")]
    pub lifetime: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            lifetime: default_lifetime(),
        }
    }
}

impl TokenConfig {
    /// Parse the configured lifetime. Zero is rejected.
    pub fn lifetime(&self) -> Result<Duration, ConfigError> {
        let lifetime = humantime::parse_duration(self.lifetime.trim()).map_err(|e| {
            ConfigError::Config(format!("invalid token lifetime '{}': {}", self.lifetime, e))
        })?;
        if lifetime.is_zero() {
            return Err(ConfigError::Config(
                "token lifetime must be greater than zero".to_string(),
            ));
        }
        Ok(lifetime)
    }
}

/// Page size settings for the listing endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the request does not name one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound applied to requested page sizes.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

// Default value functions
fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_lifetime() -> String {
    "1h".to_string()
}

fn default_page_size() -> u32 {
    25
}

fn default_max_page_size() -> u32 {
    100
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BookstoreConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token.lifetime()?;

        let pagination = &self.pagination;
        if pagination.default_page_size == 0 || pagination.max_page_size == 0 {
            return Err(ConfigError::Config(
                "page sizes must be greater than zero".to_string(),
            ));
        }
        if pagination.default_page_size > pagination.max_page_size {
            return Err(ConfigError::Config(format!(
                "default_page_size {} exceeds max_page_size {}",
                pagination.default_page_size, pagination.max_page_size
            )));
        }

        for rule in &self.access {
            rule.validate()?;
        }
        for user in &self.users {
            user.validate()?;
        }
        Ok(())
    }

    /// Resolve the seed file relative to the directory of the config file.
    pub fn seed_path(&self, config_path: &Path) -> Option<PathBuf> {
        let seed = self.seed_file.as_ref()?;
        if seed.is_absolute() {
            return Some(seed.clone());
        }
        let base_dir = config_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Some(base_dir.join(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = BookstoreConfig::from_yaml("{}").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.token.lifetime().unwrap(), Duration::from_secs(3600));
        assert_eq!(config.pagination.default_page_size, 25);
        assert!(!config.access.is_empty());
    }

    #[test]
    fn test_lifetime_parsing() {
        let token = TokenConfig {
            lifetime: "30m".to_string(),
        };
        assert_eq!(token.lifetime().unwrap(), Duration::from_secs(1800));

        let zero = TokenConfig {
            lifetime: "0s".to_string(),
        };
        assert!(zero.lifetime().is_err());

        let garbage = TokenConfig {
            lifetime: "soon".to_string(),
        };
        assert!(garbage.lifetime().is_err());
    }

    #[test]
    fn test_default_page_size_above_max_rejected() {
        let yaml = "pagination:\n  default_page_size: 50\n  max_page_size: 10\n";
        assert!(matches!(
            BookstoreConfig::from_yaml(yaml),
            Err(ConfigError::Config(_))
        ));
    }

    #[test]
    fn test_seed_path_relative_to_config() {
        let config = BookstoreConfig::from_yaml("seed_file: data/catalog.json").unwrap();
        let resolved = config.seed_path(Path::new("/etc/bookstore/bookstore.yaml"));
        assert_eq!(
            resolved,
            Some(PathBuf::from("/etc/bookstore/data/catalog.json"))
        );
    }
}
