//! Request middleware.

pub mod auth;

pub use auth::{access_guard, AuthContext};
