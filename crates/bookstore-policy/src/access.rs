//! Route access table.
//!
//! An ordered list of `(method, route pattern, access)` entries. The first
//! entry matching a request decides; a request no entry matches is denied.

use bookstore_core::AccessRuleConfig;

use crate::error::PolicyConfigError;
use crate::gate::RoleRequirement;

/// What a route requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// No token needed.
    Public,
    /// A valid token satisfying the requirement.
    Protected(RoleRequirement),
}

impl Access {
    /// Parse a requirement string (`none`, `authenticated`, `role:R`, `any:R1,R2`, `R`).
    pub fn parse(requirement: &str) -> Result<Self, PolicyConfigError> {
        let invalid = |reason: &str| PolicyConfigError::InvalidRequirement {
            requirement: requirement.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = requirement.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty requirement"));
        }

        match trimmed {
            "none" => return Ok(Access::Public),
            "authenticated" => return Ok(Access::Protected(RoleRequirement::Authenticated)),
            _ => {}
        }

        if let Some(role) = trimmed.strip_prefix("role:") {
            let role = role.trim();
            if role.is_empty() {
                return Err(invalid("missing role name"));
            }
            return Ok(Access::Protected(RoleRequirement::role(role)));
        }

        if let Some(roles) = trimmed.strip_prefix("any:") {
            let roles: Vec<&str> = roles
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .collect();
            if roles.is_empty() {
                return Err(invalid("no roles listed"));
            }
            return Ok(Access::Protected(RoleRequirement::any_of(roles)));
        }

        Ok(Access::Protected(RoleRequirement::role(trimmed)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*` or `{name}`: exactly one segment.
    Single,
    /// `**`: zero or more trailing segments.
    Rest,
}

/// Ant-style route pattern, e.g. `/api/books/**` or `/api/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Result<Self, PolicyConfigError> {
        let invalid = |reason: &str| PolicyConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if !pattern.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let parts: Vec<&str> = path_segments(pattern).collect();
        let mut segments = Vec::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            let segment = match *part {
                "**" if i + 1 == parts.len() => Segment::Rest,
                "**" => return Err(invalid("'**' is only allowed as the last segment")),
                "*" => Segment::Single,
                p if p.starts_with('{') && p.ends_with('}') => Segment::Single,
                p if p.contains('*') => return Err(invalid("partial wildcards are not supported")),
                p => Segment::Literal(p.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path (without query string).
    pub fn matches(&self, path: &str) -> bool {
        let mut parts = path_segments(path);
        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                Segment::Single => {
                    if parts.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(literal) => {
                    if parts.next() != Some(literal.as_str()) {
                        return false;
                    }
                }
            }
        }
        parts.next().is_none()
    }
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A single entry of the access table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    /// Upper-case method, `None` for any.
    pub method: Option<String>,
    pub pattern: RoutePattern,
    pub access: Access,
}

impl AccessRule {
    pub fn new(method: Option<&str>, pattern: &str, access: Access) -> Result<Self, PolicyConfigError> {
        Ok(Self {
            method: normalize_method(method),
            pattern: RoutePattern::parse(pattern)?,
            access,
        })
    }

    pub fn matches(&self, method: &str, path: &str) -> bool {
        let method_matches = self
            .method
            .as_deref()
            .is_none_or(|m| m.eq_ignore_ascii_case(method));
        method_matches && self.pattern.matches(path)
    }
}

fn normalize_method(method: Option<&str>) -> Option<String> {
    method
        .map(str::trim)
        .filter(|m| !m.is_empty() && *m != "*")
        .map(str::to_ascii_uppercase)
}

/// Ordered route rules; first match wins.
#[derive(Debug, Clone, Default)]
pub struct AccessTable {
    rules: Vec<AccessRule>,
}

impl AccessTable {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// Build the table from configuration entries, keeping their order.
    pub fn from_config(entries: &[AccessRuleConfig]) -> Result<Self, PolicyConfigError> {
        let rules = entries
            .iter()
            .map(|entry| {
                AccessRule::new(
                    entry.method.as_deref(),
                    &entry.path,
                    Access::parse(&entry.require)?,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// First rule matching the request, if any.
    pub fn lookup(&self, method: &str, path: &str) -> Option<&AccessRule> {
        self.rules.iter().find(|rule| rule.matches(method, path))
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }
}
