//! memsys-core - Core library for Memory System
//!
//! This crate provides shared functionality between the memsys CLI and memsys-server:
//!
//! - **auth**: Principal, role model and password hashing
//! - **session**: Current-principal store backed by durable slots
//! - **guard**: Per-navigation allow/redirect decisions
//! - **report**: Feedback aggregation for event reports
//! - **types**: Users, locations, events and feedback records
//! - **db**: SQLite storage for those records (feature `db`)

pub mod auth;
#[cfg(feature = "db")]
pub mod db;
pub mod error;
pub mod guard;
pub mod report;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use auth::{is_in_role, Principal, Role};
#[cfg(feature = "db")]
pub use db::Database;
pub use error::{Error, Result};
pub use guard::{AccessGuard, Decision};
pub use report::{aggregate, AggregateReport, RatingSubmission};
pub use session::SessionStore;
