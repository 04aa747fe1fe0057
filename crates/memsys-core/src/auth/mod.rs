//! Authentication module for memsys-core.
//!
//! Provides:
//! - The [`Principal`] an authenticated session carries
//! - The role model and membership check (`role`)
//! - Password hashing and verification (`password`)

pub mod password;
pub mod role;

pub use password::{
    hash_password, hash_password_with_cost, verify_password, DEFAULT_COST, MIN_COST,
};
pub use role::{is_in_role, Role, RoleSet, SECRETARY_TIER};

use serde::{Deserialize, Serialize};

/// The authenticated identity driving access decisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl Principal {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    /// Destination a principal lands on right after login
    pub fn landing_path(&self) -> &'static str {
        match self.role {
            Role::Admin => "/admin",
            Role::Secretary => "/events",
            Role::User => "/feedback/participant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_path_by_role() {
        let mut p = Principal::new("u1", "Ana", "ana@example.org", Role::Admin);
        assert_eq!(p.landing_path(), "/admin");
        p.role = Role::Secretary;
        assert_eq!(p.landing_path(), "/events");
        p.role = Role::User;
        assert_eq!(p.landing_path(), "/feedback/participant");
    }

    #[test]
    fn test_principal_json_roundtrip_normalizes_role() {
        let p: Principal =
            serde_json::from_str(r#"{"id":"u1","name":"Ana","email":"a@x.org","role":"SECRETARY"}"#)
                .unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains(r#""role":"secretary""#));
    }
}
