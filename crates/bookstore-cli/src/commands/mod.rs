//! CLI command implementations for the bookstore tools.

pub mod filter;
pub mod keys;
pub mod token;
