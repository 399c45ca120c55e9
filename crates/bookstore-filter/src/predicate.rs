//! Compiled listing predicates.
//!
//! A [`CompiledPredicate`] is a plain value tree: it can be evaluated
//! against in-memory records through [`Filterable`], or rendered into a
//! parameterized SQL `WHERE` fragment for a database-backed repository.

use std::fmt;

/// A single field value of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Int(i64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{:?}", s),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
        }
    }
}

/// Records a predicate can be evaluated against.
pub trait Filterable {
    /// Values of the named field. Multi-valued fields return every value;
    /// unknown fields return nothing.
    fn field_values(&self, field: &str) -> Vec<FieldValue>;
}

/// A boolean condition over one resource.
///
/// `Always` is the identity of [`and`](Self::and); `And` never nests and
/// never contains `Always`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledPredicate {
    Always,
    /// Case-insensitive substring; `needle` is stored lowercased.
    Contains {
        field: &'static str,
        column: &'static str,
        needle: String,
    },
    Equals {
        field: &'static str,
        column: &'static str,
        value: FieldValue,
    },
    OneOf {
        field: &'static str,
        column: &'static str,
        values: Vec<FieldValue>,
    },
    And(Vec<CompiledPredicate>),
}

impl CompiledPredicate {
    pub fn is_always(&self) -> bool {
        matches!(self, CompiledPredicate::Always)
    }

    /// Conjunction, keeping `And` flat.
    pub fn and(self, other: CompiledPredicate) -> CompiledPredicate {
        match (self, other) {
            (CompiledPredicate::Always, p) | (p, CompiledPredicate::Always) => p,
            (CompiledPredicate::And(mut left), CompiledPredicate::And(right)) => {
                left.extend(right);
                CompiledPredicate::And(left)
            }
            (CompiledPredicate::And(mut left), p) => {
                left.push(p);
                CompiledPredicate::And(left)
            }
            (p, CompiledPredicate::And(mut right)) => {
                right.insert(0, p);
                CompiledPredicate::And(right)
            }
            (a, b) => CompiledPredicate::And(vec![a, b]),
        }
    }

    /// The individual conditions, in compilation order. Empty for `Always`.
    pub fn conditions(&self) -> &[CompiledPredicate] {
        match self {
            CompiledPredicate::Always => &[],
            CompiledPredicate::And(conditions) => conditions,
            single => std::slice::from_ref(single),
        }
    }

    pub fn matches<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        match self {
            CompiledPredicate::Always => true,
            CompiledPredicate::Contains { field, needle, .. } => {
                record.field_values(field).iter().any(|value| match value {
                    FieldValue::Text(text) => text.to_lowercase().contains(needle.as_str()),
                    _ => false,
                })
            }
            CompiledPredicate::Equals { field, value, .. } => {
                record.field_values(field).contains(value)
            }
            CompiledPredicate::OneOf { field, values, .. } => record
                .field_values(field)
                .iter()
                .any(|value| values.contains(value)),
            CompiledPredicate::And(conditions) => conditions.iter().all(|c| c.matches(record)),
        }
    }

    /// Render as a SQL boolean expression with `$n` placeholders, numbered
    /// from `first_placeholder`.
    pub fn to_sql(&self, first_placeholder: usize) -> SqlFragment {
        let mut params = Vec::new();
        let clause = self.render_sql(first_placeholder, &mut params);
        SqlFragment { clause, params }
    }

    fn render_sql(&self, first_placeholder: usize, params: &mut Vec<SqlParam>) -> String {
        let next = first_placeholder + params.len();
        match self {
            CompiledPredicate::Always => "TRUE".to_string(),
            CompiledPredicate::Contains { column, needle, .. } => {
                params.push(SqlParam::Value(FieldValue::Text(format!(
                    "%{}%",
                    escape_like(needle)
                ))));
                format!("LOWER({}) LIKE ${} ESCAPE '\\'", column, next)
            }
            CompiledPredicate::Equals { column, value, .. } => {
                params.push(SqlParam::Value(value.clone()));
                format!("{} = ${}", column, next)
            }
            CompiledPredicate::OneOf { column, values, .. } => {
                params.push(SqlParam::Array(values.clone()));
                format!("{} = ANY(${})", column, next)
            }
            CompiledPredicate::And(conditions) => {
                let clauses: Vec<String> = conditions
                    .iter()
                    .map(|c| c.render_sql(first_placeholder, params))
                    .collect();
                format!("({})", clauses.join(" AND "))
            }
        }
    }
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl fmt::Display for CompiledPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompiledPredicate::Always => write!(f, "always"),
            CompiledPredicate::Contains { field, needle, .. } => {
                write!(f, "{} contains {:?}", field, needle)
            }
            CompiledPredicate::Equals { field, value, .. } => write!(f, "{} = {}", field, value),
            CompiledPredicate::OneOf { field, values, .. } => {
                let values: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "{} in [{}]", field, values.join(", "))
            }
            CompiledPredicate::And(conditions) => {
                let parts: Vec<String> = conditions.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(" and "))
            }
        }
    }
}

/// A bind parameter of a rendered predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Value(FieldValue),
    Array(Vec<FieldValue>),
}

/// A SQL boolean expression and its bind parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFragment {
    pub clause: String,
    pub params: Vec<SqlParam>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Record {
        title: &'static str,
        tags: Vec<i64>,
    }

    impl Filterable for Record {
        fn field_values(&self, field: &str) -> Vec<FieldValue> {
            match field {
                "title" => vec![FieldValue::Text(self.title.to_string())],
                "tags" => self.tags.iter().copied().map(FieldValue::Int).collect(),
                _ => Vec::new(),
            }
        }
    }

    fn contains(needle: &str) -> CompiledPredicate {
        CompiledPredicate::Contains {
            field: "title",
            column: "title",
            needle: needle.to_string(),
        }
    }

    fn one_of(values: &[i64]) -> CompiledPredicate {
        CompiledPredicate::OneOf {
            field: "tags",
            column: "tag_id",
            values: values.iter().copied().map(FieldValue::Int).collect(),
        }
    }

    #[test]
    fn test_always_is_identity() {
        assert_eq!(CompiledPredicate::Always.and(contains("a")), contains("a"));
        assert_eq!(contains("a").and(CompiledPredicate::Always), contains("a"));
        assert!(
            CompiledPredicate::Always
                .and(CompiledPredicate::Always)
                .is_always()
        );
    }

    #[test]
    fn test_and_stays_flat() {
        let p = contains("a").and(one_of(&[1])).and(contains("b").and(one_of(&[2])));
        assert_eq!(p.conditions().len(), 4);
        assert!(
            p.conditions()
                .iter()
                .all(|c| !matches!(c, CompiledPredicate::And(_)))
        );
    }

    #[test]
    fn test_matching() {
        let record = Record {
            title: "Sapiens: A Brief History",
            tags: vec![1, 4],
        };

        assert!(contains("sapiens").matches(&record));
        assert!(!contains("homo").matches(&record));
        assert!(one_of(&[4, 9]).matches(&record));
        assert!(!one_of(&[9]).matches(&record));
        assert!(contains("brief").and(one_of(&[1])).matches(&record));
        assert!(!contains("brief").and(one_of(&[9])).matches(&record));
        assert!(CompiledPredicate::Always.matches(&record));
    }

    #[test]
    fn test_unknown_field_never_matches() {
        let record = Record {
            title: "x",
            tags: vec![],
        };
        let p = CompiledPredicate::Equals {
            field: "missing",
            column: "missing",
            value: FieldValue::Bool(true),
        };
        assert!(!p.matches(&record));
    }

    #[test]
    fn test_sql_rendering() {
        let p = contains("50%_off").and(one_of(&[1, 2]));
        let sql = p.to_sql(3);

        assert_eq!(
            sql.clause,
            "(LOWER(title) LIKE $3 ESCAPE '\\' AND tag_id = ANY($4))"
        );
        assert_eq!(
            sql.params,
            vec![
                SqlParam::Value(FieldValue::Text("%50\\%\\_off%".to_string())),
                SqlParam::Array(vec![FieldValue::Int(1), FieldValue::Int(2)]),
            ]
        );
    }

    #[test]
    fn test_always_renders_true() {
        let sql = CompiledPredicate::Always.to_sql(1);
        assert_eq!(sql.clause, "TRUE");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn test_display() {
        let p = contains("sapiens").and(one_of(&[1, 2]));
        assert_eq!(p.to_string(), "title contains \"sapiens\" and tags in [1, 2]");
        assert_eq!(CompiledPredicate::Always.to_string(), "always");
    }
}
