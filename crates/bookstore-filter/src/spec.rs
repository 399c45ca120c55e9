//! Optional listing criteria.

use std::collections::{BTreeMap, BTreeSet};

/// A criterion value supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Bool(bool),
    Int(i64),
    IdSet(BTreeSet<i64>),
}

/// Field name to value. A field that is not present places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    fields: BTreeMap<String, FilterValue>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(field, FilterValue::Text(value.into()))
    }

    pub fn flag(self, field: impl Into<String>, value: bool) -> Self {
        self.with(field, FilterValue::Bool(value))
    }

    pub fn int(self, field: impl Into<String>, value: i64) -> Self {
        self.with(field, FilterValue::Int(value))
    }

    pub fn ids<I>(self, field: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        self.with(field, FilterValue::IdSet(ids.into_iter().collect()))
    }

    /// Set the field when a value is present, leave it absent otherwise.
    pub fn set_optional(mut self, field: impl Into<String>, value: Option<FilterValue>) -> Self {
        if let Some(value) = value {
            self.insert(field, value);
        }
        self
    }

    pub fn with(mut self, field: impl Into<String>, value: FilterValue) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FilterValue) {
        self.fields.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let spec = FilterSpec::new()
            .text("title", "Sapiens")
            .flag("isAvailableOnline", true)
            .ids("authorIds", [3, 1, 3]);

        assert_eq!(spec.len(), 3);
        assert_eq!(
            spec.get("title"),
            Some(&FilterValue::Text("Sapiens".to_string()))
        );
        assert_eq!(
            spec.get("authorIds"),
            Some(&FilterValue::IdSet(BTreeSet::from([1, 3])))
        );
        assert_eq!(spec.get("isbn"), None);
    }

    #[test]
    fn test_set_optional() {
        let spec = FilterSpec::new()
            .set_optional("roleId", Some(FilterValue::Int(2)))
            .set_optional("email", None);

        assert_eq!(spec.len(), 1);
        assert_eq!(spec.get("roleId"), Some(&FilterValue::Int(2)));
    }

    #[test]
    fn test_later_value_replaces_earlier() {
        let spec = FilterSpec::new().text("name", "a").text("name", "b");
        assert_eq!(spec.get("name"), Some(&FilterValue::Text("b".to_string())));
    }
}
