//! Route access rules as they appear in configuration.
//!
//! Each rule pairs a route pattern with what the route requires:
//!
//! | `require` value | Meaning |
//! |-----------------|---------|
//! | `none` | Public route, no token needed |
//! | `authenticated` | Any valid token |
//! | `role:App/Admin` or `App/Admin` | Token must carry the role |
//! | `any:App/Admin,App/Customer` | Token must carry one of the roles |
//!
//! The strings are interpreted by `bookstore-policy`; this module only checks
//! that they are present.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// A single `(method, path pattern, requirement)` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRuleConfig {
    /// HTTP method, or `None` / `"*"` for any method.
    #[serde(default)]
    pub method: Option<String>,

    /// Ant-style path pattern (`*`, `**`, `{id}`).
    pub path: String,

    /// Requirement string, see module docs.
    pub require: String,
}

impl AccessRuleConfig {
    pub fn new(method: Option<&str>, path: &str, require: &str) -> Self {
        Self {
            method: method.map(str::to_string),
            path: path.to_string(),
            require: require.to_string(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.path.starts_with('/') {
            return Err(ConfigError::Config(format!(
                "access rule path '{}' must start with '/'",
                self.path
            )));
        }
        if self.require.trim().is_empty() {
            return Err(ConfigError::Config(format!(
                "access rule for '{}' has an empty requirement",
                self.path
            )));
        }
        Ok(())
    }
}

/// Rules used when the configuration file does not define any.
pub fn default_access_rules() -> Vec<AccessRuleConfig> {
    vec![
        AccessRuleConfig::new(Some("GET"), "/healthz", "none"),
        AccessRuleConfig::new(Some("POST"), "/api/auth/login", "none"),
        AccessRuleConfig::new(Some("GET"), "/api/auth/me", "authenticated"),
        AccessRuleConfig::new(Some("GET"), "/api/books/**", "none"),
        AccessRuleConfig::new(Some("GET"), "/api/authors/**", "none"),
        AccessRuleConfig::new(None, "/api/customers/**", "role:App/Admin"),
        AccessRuleConfig::new(None, "/api/users/**", "role:App/Admin"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_from_yaml() {
        let rule: AccessRuleConfig =
            serde_yaml::from_str("{ path: /api/users/**, require: \"role:App/Admin\" }").unwrap();
        assert_eq!(rule.method, None);
        assert_eq!(rule.require, "role:App/Admin");
    }

    #[test]
    fn test_blank_requirement_rejected() {
        let rule = AccessRuleConfig::new(None, "/api/books", "  ");
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_relative_path_rejected() {
        let rule = AccessRuleConfig::new(None, "api/books", "none");
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_default_rules_are_valid() {
        for rule in default_access_rules() {
            rule.validate().unwrap();
        }
    }
}
