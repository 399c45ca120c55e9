//! Configuration types and resource models shared across the bookstore crates.
//!
//! The bookstore API itself (persistence, DTO mapping, cart handling) lives
//! elsewhere; these crates cover the parts with real correctness properties:
//! signed access tokens, role checks at the request boundary and the
//! predicate compiler behind the paginated listing endpoints.

// Configuration types shared across all bookstore crates
pub mod config;

// Resource models served by the listing endpoints
pub mod model;

pub use config::{
    AccessRuleConfig, BookstoreConfig, ConfigError, KeyConfig, PaginationConfig, ServerConfig,
    TokenConfig, UserConfig,
};
pub use model::{Author, Book, Catalog, Customer, User};
