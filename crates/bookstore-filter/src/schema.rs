//! Per-resource filter schemas.
//!
//! A schema is a declarative table of the fields a listing endpoint can be
//! filtered by. Declaration order is the order predicates are compiled in.

use std::collections::BTreeSet;

use crate::error::FilterError;
use crate::spec::{FilterSpec, FilterValue};

/// How a supplied value constrains a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Case-insensitive substring match.
    Contains,
    /// Exact equality.
    Equals,
    /// Membership in a set of values.
    OneOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    Int,
}

impl FieldKind {
    fn expected(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Bool => "true or false",
            FieldKind::Int => "an integer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Name used in filter specs and query parameters.
    pub name: &'static str,
    /// Storage column.
    pub column: &'static str,
    pub kind: FieldKind,
    pub policy: FieldPolicy,
}

impl FieldDef {
    pub const fn new(
        name: &'static str,
        column: &'static str,
        kind: FieldKind,
        policy: FieldPolicy,
    ) -> Self {
        Self {
            name,
            column,
            kind,
            policy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSchema {
    pub resource: &'static str,
    pub fields: &'static [FieldDef],
}

pub static BOOKS: FilterSchema = FilterSchema {
    resource: "books",
    fields: &[
        FieldDef::new("title", "title", FieldKind::Text, FieldPolicy::Contains),
        FieldDef::new("isbn", "isbn", FieldKind::Text, FieldPolicy::Equals),
        FieldDef::new(
            "isAvailableOnline",
            "is_available_online",
            FieldKind::Bool,
            FieldPolicy::Equals,
        ),
        FieldDef::new("authorIds", "author_id", FieldKind::Int, FieldPolicy::OneOf),
    ],
};

pub static AUTHORS: FilterSchema = FilterSchema {
    resource: "authors",
    fields: &[
        FieldDef::new("name", "name", FieldKind::Text, FieldPolicy::Contains),
        FieldDef::new("ids", "id", FieldKind::Int, FieldPolicy::OneOf),
    ],
};

pub static CUSTOMERS: FilterSchema = FilterSchema {
    resource: "customers",
    fields: &[
        FieldDef::new("name", "name", FieldKind::Text, FieldPolicy::Contains),
        FieldDef::new("email", "email", FieldKind::Text, FieldPolicy::Contains),
        FieldDef::new("ids", "id", FieldKind::Int, FieldPolicy::OneOf),
    ],
};

pub static USERS: FilterSchema = FilterSchema {
    resource: "users",
    fields: &[
        FieldDef::new("username", "username", FieldKind::Text, FieldPolicy::Contains),
        FieldDef::new("email", "email", FieldKind::Text, FieldPolicy::Contains),
        FieldDef::new("roleId", "role_id", FieldKind::Int, FieldPolicy::Equals),
    ],
};

impl FilterSchema {
    /// Look up a schema by resource name.
    pub fn for_resource(resource: &str) -> Option<&'static FilterSchema> {
        [&BOOKS, &AUTHORS, &CUSTOMERS, &USERS]
            .into_iter()
            .find(|schema| schema.resource == resource)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Build a filter spec from raw query parameters.
    ///
    /// Blank parameters are treated as absent. Parameters the schema does
    /// not declare are ignored.
    pub fn spec_from_query<I, K, V>(&self, params: I) -> Result<FilterSpec, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut spec = FilterSpec::new();
        for (name, raw) in params {
            let (name, raw) = (name.as_ref(), raw.as_ref());
            let Some(field) = self.field(name) else {
                continue;
            };
            if let Some(value) = parse_value(field, raw)? {
                spec.insert(field.name, value);
            }
        }
        Ok(spec)
    }
}

fn parse_value(field: &FieldDef, raw: &str) -> Result<Option<FilterValue>, FilterError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = match (field.kind, field.policy) {
        (FieldKind::Text, _) => FilterValue::Text(trimmed.to_string()),
        (FieldKind::Bool, _) => match trimmed.to_ascii_lowercase().as_str() {
            "true" => FilterValue::Bool(true),
            "false" => FilterValue::Bool(false),
            _ => return Err(FilterError::invalid(field.name, raw, field.kind.expected())),
        },
        (FieldKind::Int, FieldPolicy::OneOf) => {
            let ids: BTreeSet<i64> = trimmed
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| {
                    id.parse::<i64>()
                        .map_err(|_| FilterError::invalid(field.name, raw, "comma-separated integers"))
                })
                .collect::<Result<_, _>>()?;
            FilterValue::IdSet(ids)
        }
        (FieldKind::Int, _) => trimmed
            .parse()
            .map(FilterValue::Int)
            .map_err(|_| FilterError::invalid(field.name, raw, field.kind.expected()))?,
    };
    Ok(Some(value))
}
