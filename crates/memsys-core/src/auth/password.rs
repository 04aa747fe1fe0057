//! Password hashing.
//!
//! Passwords are stored as bcrypt hashes (`$2b$<cost>$<salt+digest>`), each
//! with its own random salt.

use crate::error::{Error, Result};

/// Work factor for new hashes
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Cheapest cost bcrypt accepts; only for throwaway databases in tests
pub const MIN_COST: u32 = 4;

/// Hash a password at [`DEFAULT_COST`]
pub fn hash_password(password: &str) -> Result<String> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// Hash a password at an explicit bcrypt cost
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Verify a password against a stored hash.
///
/// Returns `Err` only when the stored value is not a bcrypt hash.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    bcrypt::verify(password, stored).map_err(|_| Error::MalformedPasswordHash)
}
