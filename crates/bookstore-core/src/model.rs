//! Bookstore resources exposed through the paginated listing endpoints.
//!
//! Field names serialize in camelCase, which is also the spelling used by the
//! listing query parameters (`isAvailableOnline`, `authorIds`, ...).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    #[serde(default)]
    pub is_available_online: bool,
    /// Authors credited on the book; a book may have several.
    #[serde(default)]
    pub author_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role_id: i64,
}

/// Seed data for the in-memory repositories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl Catalog {
    /// Load a catalog from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_uses_query_parameter_spelling() {
        let book = Book {
            id: 1,
            title: "Sapiens".into(),
            isbn: "978-0062316097".into(),
            is_available_online: true,
            author_ids: vec![7],
        };

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["isAvailableOnline"], true);
        assert_eq!(json["authorIds"][0], 7);
    }

    #[test]
    fn test_catalog_sections_are_optional() {
        let catalog: Catalog =
            serde_json::from_str(r#"{"authors":[{"id":1,"name":"Yuval Noah Harari"}]}"#).unwrap();
        assert_eq!(catalog.authors.len(), 1);
        assert!(catalog.books.is_empty());
    }
}
