//! Session store.
//!
//! Holds the current [`Principal`] for the lifetime of a client session and
//! persists it in a durable slot so it survives restarts. The store is an
//! explicit object: create one at bootstrap, pass it to whatever needs the
//! current principal, and call [`SessionStore::logout`] to tear it down.

pub mod storage;

pub use storage::{FileStorage, MemoryStorage, SlotStorage};

use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::auth::Principal;
use crate::error::{Error, Result};
use crate::guard::LOGIN_PATH;

/// Fixed key of the slot holding the JSON-serialized principal
pub const SESSION_KEY: &str = "user";

#[derive(Debug)]
enum SessionState {
    /// Slot not read yet
    Unloaded,
    Loaded(Option<Principal>),
}

/// Current-principal holder backed by a durable slot
pub struct SessionStore<S: SlotStorage> {
    storage: S,
    state: Mutex<SessionState>,
}

impl<S: SlotStorage> SessionStore<S> {
    /// Create a store; the slot is read lazily on first access
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: Mutex::new(SessionState::Unloaded),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Make `principal` current and persist it.
    ///
    /// The in-memory value is replaced before the slot is written, so readers
    /// see the new principal even if persisting fails.
    pub fn login(&self, principal: Principal) -> Result<()> {
        let json = serde_json::to_string(&principal)?;
        debug!("Session login for {} ({})", principal.email, principal.role);
        self.storage.set(SESSION_KEY, &json)?;
        *self.lock()? = SessionState::Loaded(Some(principal));
        Ok(())
    }

    /// Clear the session and return the destination to navigate to.
    pub fn logout(&self) -> Result<&'static str> {
        *self.lock()? = SessionState::Loaded(None);
        self.storage.remove(SESSION_KEY)?;
        debug!("Session cleared");
        Ok(LOGIN_PATH)
    }

    /// The current principal, hydrated from the slot on first call.
    ///
    /// A missing, unreadable or malformed slot counts as "no session".
    pub fn current_principal(&self) -> Option<Principal> {
        let mut state = match self.lock() {
            Ok(state) => state,
            Err(e) => {
                warn!("Session state unavailable: {}", e);
                return None;
            }
        };

        if let SessionState::Unloaded = *state {
            *state = SessionState::Loaded(self.hydrate());
        }

        match &*state {
            SessionState::Loaded(principal) => principal.clone(),
            SessionState::Unloaded => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_principal().is_some()
    }

    fn hydrate(&self) -> Option<Principal> {
        let raw = match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read persisted session: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Principal>(&raw) {
            Ok(principal) => {
                debug!("Restored session for {}", principal.email);
                Some(principal)
            }
            Err(e) => {
                warn!("Ignoring malformed persisted session: {}", e);
                None
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionState>> {
        self.state.lock().map_err(|_| Error::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn ana() -> Principal {
        Principal::new("u-1", "Ana", "ana@example.org", Role::Secretary)
    }

    #[test]
    fn test_empty_storage_has_no_principal() {
        let store = SessionStore::new(MemoryStorage::new());
        assert!(store.current_principal().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_login_survives_reload() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        store.login(ana()).unwrap();
        assert_eq!(store.current_principal(), Some(ana()));

        // A fresh store over the same slots plays the part of a page reload
        let reloaded = SessionStore::new(storage);
        assert_eq!(reloaded.current_principal(), Some(ana()));
    }

    #[test]
    fn test_logout_clears_memory_and_slot() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        store.login(ana()).unwrap();

        let next = store.logout().unwrap();
        assert_eq!(next, "/auth/login");
        assert!(store.current_principal().is_none());
        assert!(storage.get(SESSION_KEY).unwrap().is_none());

        let reloaded = SessionStore::new(storage);
        assert!(reloaded.current_principal().is_none());
    }

    #[test]
    fn test_login_overwrites_previous_principal() {
        let store = SessionStore::new(MemoryStorage::new());
        store.login(ana()).unwrap();

        let admin = Principal::new("u-2", "Bo", "bo@example.org", Role::Admin);
        store.login(admin.clone()).unwrap();
        assert_eq!(store.current_principal(), Some(admin));
    }

    #[test]
    fn test_malformed_slot_is_treated_as_no_session() {
        let storage = MemoryStorage::new();
        storage.set(SESSION_KEY, "{not json").unwrap();

        let store = SessionStore::new(storage);
        assert!(store.current_principal().is_none());
    }

    #[test]
    fn test_persisted_role_is_normalized_on_read() {
        let storage = MemoryStorage::new();
        storage
            .set(
                SESSION_KEY,
                r#"{"id":"u-3","name":"Cy","email":"cy@example.org","role":"Admin"}"#,
            )
            .unwrap();

        let store = SessionStore::new(storage);
        assert_eq!(store.current_principal().unwrap().role, Role::Admin);
    }

    #[test]
    fn test_hydrates_only_once() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        assert!(store.current_principal().is_none());

        // Writes behind the store's back are not picked up after hydration
        storage
            .set(SESSION_KEY, &serde_json::to_string(&ana()).unwrap())
            .unwrap();
        assert!(store.current_principal().is_none());
    }

    #[test]
    fn test_file_storage_roundtrip_across_stores() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(FileStorage::new(temp_dir.path()));
        store.login(ana()).unwrap();

        let reloaded = SessionStore::new(FileStorage::new(temp_dir.path()));
        assert_eq!(reloaded.current_principal(), Some(ana()));

        reloaded.logout().unwrap();
        let again = SessionStore::new(FileStorage::new(temp_dir.path()));
        assert!(again.current_principal().is_none());
    }
}
