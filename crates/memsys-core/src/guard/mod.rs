//! Access guard.
//!
//! Decides, for every navigation, whether the current principal may reach a
//! destination path. Disallowed navigation is never an error: it becomes a
//! redirect to the login page (no principal) or the home page (not enough
//! privilege).

use serde::Serialize;

use crate::auth::{is_in_role, Principal, Role, SECRETARY_TIER};

/// Where unauthenticated navigation is sent
pub const LOGIN_PATH: &str = "/auth/login";

/// Where under-privileged navigation is sent
pub const HOME_PATH: &str = "/";

/// Destinations reachable without a principal
pub const PUBLIC_ROUTES: &[&str] = &[
    LOGIN_PATH,
    "/feedback/participant",
    "/feedback/organizer",
    "/feedback/thankyou",
];

/// Destinations that require the admin role
pub const ADMIN_PREFIXES: &[&str] = &["/admin"];

/// Destinations that require the admin or secretary role
pub const SECRETARY_PREFIXES: &[&str] = &["/events", "/reports"];

/// Outcome of a navigation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "to", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Redirect(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Privilege tier of the navigating principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTier {
    Unauthenticated,
    AuthenticatedUnprivileged,
    AuthenticatedSecretaryTier,
    AuthenticatedAdmin,
}

impl AccessTier {
    pub fn of(principal: Option<&Principal>) -> Self {
        match principal.map(|p| p.role) {
            None => AccessTier::Unauthenticated,
            Some(Role::User) => AccessTier::AuthenticatedUnprivileged,
            Some(Role::Secretary) => AccessTier::AuthenticatedSecretaryTier,
            Some(Role::Admin) => AccessTier::AuthenticatedAdmin,
        }
    }
}

/// Route table driving navigation decisions
#[derive(Debug, Clone)]
pub struct AccessGuard {
    public_routes: Vec<&'static str>,
    admin_prefixes: Vec<&'static str>,
    secretary_prefixes: Vec<&'static str>,
}

impl Default for AccessGuard {
    fn default() -> Self {
        Self {
            public_routes: PUBLIC_ROUTES.to_vec(),
            admin_prefixes: ADMIN_PREFIXES.to_vec(),
            secretary_prefixes: SECRETARY_PREFIXES.to_vec(),
        }
    }
}

impl AccessGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `principal` may navigate to `path`.
    ///
    /// Rules, first match wins:
    /// 1. public destination → allow
    /// 2. no principal → login
    /// 3. admin destination without admin role → home
    /// 4. secretary destination without admin/secretary role → home
    /// 5. allow
    pub fn evaluate(&self, path: &str, principal: Option<&Principal>) -> Decision {
        let path = strip_query(path);

        if self.is_public(path) {
            return Decision::Allow;
        }

        if principal.is_none() {
            return Decision::Redirect(LOGIN_PATH);
        }

        if matches_any(path, &self.admin_prefixes) && !is_in_role(principal, Role::Admin) {
            return Decision::Redirect(HOME_PATH);
        }

        if matches_any(path, &self.secretary_prefixes) && !is_in_role(principal, SECRETARY_TIER) {
            return Decision::Redirect(HOME_PATH);
        }

        Decision::Allow
    }

    /// Whether `path` is reachable without a principal
    pub fn is_public(&self, path: &str) -> bool {
        matches_any(strip_query(path), &self.public_routes)
    }
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

fn matches_any(path: &str, prefixes: &[&'static str]) -> bool {
    prefixes.iter().any(|prefix| matches_prefix(path, prefix))
}

/// Segment-aware prefix match: `/events` covers `/events` and `/events/1`
/// but not `/eventsx`.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
