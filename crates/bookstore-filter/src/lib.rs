//! # bookstore-filter
//!
//! Optional listing criteria, compiled into a predicate a repository can
//! evaluate, plus pagination.
//!
//! ## How It Works
//!
//! A listing request such as
//!
//! ```text
//! GET /api/books?title=sapiens&isAvailableOnline=true&page=0&size=10
//! ```
//!
//! becomes a [`FilterSpec`] (via [`FilterSchema::spec_from_query`]) and a
//! [`PageRequest`]. [`compile`] folds the spec into a [`CompiledPredicate`]
//! following the resource's field policies:
//!
//! | Policy     | Condition                                  |
//! |------------|--------------------------------------------|
//! | `Contains` | case-insensitive substring                 |
//! | `Equals`   | exact equality                             |
//! | `OneOf`    | membership in the supplied set             |
//!
//! Absent fields and blank text add no condition, so an empty spec lists
//! everything. The predicate is then handed to a [`PagedRepository`].

pub mod compiler;
pub mod error;
pub mod models;
pub mod page;
pub mod predicate;
pub mod repository;
pub mod schema;
pub mod spec;

pub use compiler::compile;
pub use error::{FilterError, RepositoryError};
pub use page::{Page, PageRequest};
pub use predicate::{CompiledPredicate, FieldValue, Filterable, SqlFragment, SqlParam};
pub use repository::{InMemoryRepository, PagedRepository};
pub use schema::{AUTHORS, BOOKS, CUSTOMERS, FieldDef, FieldKind, FieldPolicy, FilterSchema, USERS};
pub use spec::{FilterSpec, FilterValue};
