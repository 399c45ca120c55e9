//! [`Filterable`] for the bookstore resources.
//!
//! Field names match the schema declarations in [`crate::schema`].

use bookstore_core::{Author, Book, Customer, User};

use crate::predicate::{FieldValue, Filterable};

fn text(value: &str) -> Vec<FieldValue> {
    vec![FieldValue::Text(value.to_string())]
}

impl Filterable for Book {
    fn field_values(&self, field: &str) -> Vec<FieldValue> {
        match field {
            "title" => text(&self.title),
            "isbn" => text(&self.isbn),
            "isAvailableOnline" => vec![FieldValue::Bool(self.is_available_online)],
            "authorIds" => self.author_ids.iter().copied().map(FieldValue::Int).collect(),
            _ => Vec::new(),
        }
    }
}

impl Filterable for Author {
    fn field_values(&self, field: &str) -> Vec<FieldValue> {
        match field {
            "name" => text(&self.name),
            "ids" => vec![FieldValue::Int(self.id)],
            _ => Vec::new(),
        }
    }
}

impl Filterable for Customer {
    fn field_values(&self, field: &str) -> Vec<FieldValue> {
        match field {
            "name" => text(&self.name),
            "email" => text(&self.email),
            "ids" => vec![FieldValue::Int(self.id)],
            _ => Vec::new(),
        }
    }
}

impl Filterable for User {
    fn field_values(&self, field: &str) -> Vec<FieldValue> {
        match field {
            "username" => text(&self.username),
            "email" => text(&self.email),
            "roleId" => vec![FieldValue::Int(self.role_id)],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::page::PageRequest;
    use crate::repository::{InMemoryRepository, PagedRepository};
    use crate::schema::{BOOKS, CUSTOMERS, FilterSchema};
    use crate::spec::FilterSpec;

    fn book(id: i64, title: &str, online: bool, authors: &[i64]) -> Book {
        Book {
            id,
            title: title.to_string(),
            isbn: format!("isbn-{}", id),
            is_available_online: online,
            author_ids: authors.to_vec(),
        }
    }

    fn books() -> Vec<Book> {
        vec![
            book(1, "Sapiens: A Brief History of Humankind", true, &[1]),
            book(2, "Homo Deus", true, &[1]),
            book(3, "SAPIENS (Graphic Edition)", false, &[1, 2]),
            book(4, "The Selfish Gene", true, &[3]),
        ]
    }

    #[tokio::test]
    async fn test_sapiens_listing() {
        let repo = InMemoryRepository::new(books());
        let predicate = compile(&BOOKS, &FilterSpec::new().text("title", "sapiens"));

        let page = repo
            .find_page(&predicate, PageRequest::default())
            .await
            .unwrap();
        let ids: Vec<i64> = page.items.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(page.total_items, 2);
    }

    #[tokio::test]
    async fn test_sapiens_available_online() {
        let repo = InMemoryRepository::new(books());
        let spec = FilterSpec::new()
            .text("title", "Sapiens")
            .flag("isAvailableOnline", true);
        let predicate = compile(&BOOKS, &spec);

        let page = repo
            .find_page(&predicate, PageRequest::default())
            .await
            .unwrap();
        let ids: Vec<i64> = page.items.iter().map(|b| b.id).collect();
        // Homo Deus is online but not titled Sapiens; book 3 is Sapiens but offline.
        assert_eq!(ids, vec![1]);
        assert!(!predicate.matches(&book(2, "Homo Deus", true, &[1])));
        assert!(!predicate.matches(&book(3, "SAPIENS (Graphic Edition)", false, &[1, 2])));
    }

    #[tokio::test]
    async fn test_empty_spec_lists_everything() {
        let repo = InMemoryRepository::new(books());
        let predicate = compile(&BOOKS, &FilterSpec::new());

        let page = repo
            .find_page(&predicate, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 4);
    }

    #[test]
    fn test_multi_author_books() {
        let spec = FilterSpec::new().ids("authorIds", [2]).flag("isAvailableOnline", false);
        let predicate = compile(&BOOKS, &spec);

        let matched: Vec<i64> = books()
            .iter()
            .filter(|b| predicate.matches(*b))
            .map(|b| b.id)
            .collect();
        assert_eq!(matched, vec![3]);
    }

    #[test]
    fn test_customer_query() {
        let customers = vec![
            Customer {
                id: 1,
                name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
            },
            Customer {
                id: 2,
                name: "Alan Turing".into(),
                email: "alan@example.org".into(),
            },
        ];

        let spec = CUSTOMERS
            .spec_from_query([("email", "EXAMPLE.ORG"), ("name", "")])
            .unwrap();
        let predicate = compile(&CUSTOMERS, &spec);
        let matched: Vec<i64> = customers
            .iter()
            .filter(|c| predicate.matches(*c))
            .map(|c| c.id)
            .collect();
        assert_eq!(matched, vec![2]);
    }

    #[test]
    fn test_schema_fields_are_exposed() {
        let user = User {
            id: 1,
            username: "carroyom".into(),
            email: "c@example.com".into(),
            role_id: 1,
        };
        let schema: &FilterSchema = FilterSchema::for_resource("users").unwrap();
        for field in schema.fields {
            assert!(!user.field_values(field.name).is_empty(), "{}", field.name);
        }
    }
}
