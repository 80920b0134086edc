//! Request middleware.

pub mod identity;

pub use identity::{AdminUser, CurrentUser, Identity, identity_middleware};
