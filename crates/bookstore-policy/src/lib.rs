//! Bookstore access policy.
//!
//! Access decisions are made from verified token claims and a plain list of
//! route rules; there is no framework filter chain and no external decision
//! point.
//!
//! 1. [`AccessTable`] finds the first rule matching the request route
//! 2. [`AccessGuard`] validates the bearer token for protected routes
//! 3. [`AuthorizationGate`] checks the claims against the rule's requirement
//!
//! Every step fails closed: no matching rule, no token, an invalid token or
//! a missing role all deny.

pub mod access;
pub mod error;
pub mod gate;
pub mod guard;

pub use access::{Access, AccessRule, AccessTable, RoutePattern};
pub use error::{AccessError, AuthorizationDenied, PolicyConfigError};
pub use gate::{AuthorizationGate, RoleRequirement};
pub use guard::{AccessGuard, Admission, bearer_token};
