//! Role model.
//!
//! The role set is closed: `admin`, `secretary` and `user`. Every place that
//! turns a loose string into a [`Role`] goes through [`Role::normalize`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::Principal;

/// Access role of a principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    Secretary,
    #[default]
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Secretary, Role::User];

    /// Normalize a role string.
    ///
    /// Matching ignores case and surrounding whitespace. Empty or unknown
    /// strings fall back to [`Role::User`], the least privileged tier.
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        match lowered.as_str() {
            "admin" => Role::Admin,
            "secretary" => Role::Secretary,
            _ => Role::User,
        }
    }

    /// Normalize an optional role string (absent → `user`)
    pub fn normalize_opt(raw: Option<&str>) -> Self {
        raw.map(Self::normalize).unwrap_or_default()
    }

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Secretary => "secretary",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Role::normalize_opt(raw.as_deref()))
    }
}

/// One role or a set of roles a destination requires.
pub trait RoleSet {
    fn contains_role(&self, role: Role) -> bool;
}

impl RoleSet for Role {
    fn contains_role(&self, role: Role) -> bool {
        *self == role
    }
}

impl RoleSet for [Role] {
    fn contains_role(&self, role: Role) -> bool {
        self.contains(&role)
    }
}

impl<const N: usize> RoleSet for [Role; N] {
    fn contains_role(&self, role: Role) -> bool {
        self.contains(&role)
    }
}

impl RoleSet for Vec<Role> {
    fn contains_role(&self, role: Role) -> bool {
        self.contains(&role)
    }
}

impl<T: RoleSet + ?Sized> RoleSet for &T {
    fn contains_role(&self, role: Role) -> bool {
        (**self).contains_role(role)
    }
}

/// Roles allowed on secretary-tier destinations
pub const SECRETARY_TIER: [Role; 2] = [Role::Admin, Role::Secretary];

/// Check whether a principal holds one of the required roles.
///
/// An absent principal never matches.
pub fn is_in_role(principal: Option<&Principal>, required: impl RoleSet) -> bool {
    match principal {
        Some(p) => required.contains_role(p.role),
        None => false,
    }
}
