//! Embedded credential verification for the login endpoint.

pub mod bootstrap;
pub mod credentials;

pub use bootstrap::load_users;
pub use credentials::CredentialVerifier;
