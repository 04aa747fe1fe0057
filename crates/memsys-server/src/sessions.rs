//! Server-side login sessions.
//!
//! A login issues a random 256-bit bearer token. Only its SHA-256 hash is
//! kept, mapped to the principal it authenticates.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use memsys_core::Principal;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Session entry for validation
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub token_hash: String,
    pub principal: Principal,
    pub created_at: Instant,
}

/// Registry of live sessions keyed by token hash
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Start a session and return the raw token handed to the client.
    ///
    /// Expired sessions are swept out while the write lock is held, so
    /// abandoned tokens do not pile up.
    pub async fn issue(&self, principal: Principal) -> String {
        let raw_token = generate_raw_token();
        let token_hash = hash_token(&raw_token);
        let entry = SessionEntry {
            token_hash: token_hash.clone(),
            principal,
            created_at: Instant::now(),
        };
        let mut sessions = self.sessions.write().await;
        let ttl = self.ttl;
        sessions.retain(|_, e| e.created_at.elapsed() < ttl);
        sessions.insert(token_hash, entry);
        raw_token
    }

    /// Look up a raw token; expired sessions are dropped and yield `None`
    pub async fn resolve(&self, raw_token: &str) -> Option<SessionEntry> {
        let token_hash = hash_token(raw_token);
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&token_hash) {
                Some(entry) if entry.created_at.elapsed() < self.ttl => {
                    return Some(entry.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        self.sessions.write().await.remove(&token_hash);
        None
    }

    /// End the session with this token hash
    pub async fn revoke(&self, token_hash: &str) -> bool {
        self.sessions.write().await.remove(token_hash).is_some()
    }

    /// End every session of a user; returns how many were removed
    pub async fn revoke_user(&self, user_id: &str) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.principal.id != user_id);
        before - sessions.len()
    }

    /// Drop every expired session; returns how many were removed
    pub async fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, e| e.created_at.elapsed() < ttl);
        before - sessions.len()
    }

    /// Number of unexpired sessions
    pub async fn active_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|entry| entry.created_at.elapsed() < self.ttl)
            .count()
    }
}

/// Generate a random 32-byte token and return it as base64
fn generate_raw_token() -> String {
    let mut key = [0u8; 32];
    for byte in &mut key {
        *byte = rand::random();
    }
    STANDARD.encode(key)
}

/// Hash a token using SHA-256 and return it as hex
pub fn hash_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use memsys_core::Role;

    fn principal(id: &str) -> Principal {
        Principal::new(id, "Test", format!("{id}@example.org"), Role::User)
    }

    #[tokio::test]
    async fn test_issue_and_resolve() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let token = registry.issue(principal("u-1")).await;

        let entry = registry.resolve(&token).await.unwrap();
        assert_eq!(entry.principal.id, "u-1");
        assert_eq!(entry.token_hash, hash_token(&token));
    }

    #[tokio::test]
    async fn test_unknown_token_is_none() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        registry.issue(principal("u-1")).await;
        assert!(registry.resolve("not-a-token").await.is_none());
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let a = registry.issue(principal("u-1")).await;
        let b = registry.issue(principal("u-1")).await;
        assert_ne!(a, b);
        assert_eq!(registry.active_count().await, 2);
    }

    #[tokio::test]
    async fn test_revoke() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let token = registry.issue(principal("u-1")).await;

        assert!(registry.revoke(&hash_token(&token)).await);
        assert!(!registry.revoke(&hash_token(&token)).await);
        assert!(registry.resolve(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_revoke_user_removes_all_their_sessions() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        registry.issue(principal("u-1")).await;
        registry.issue(principal("u-1")).await;
        let other = registry.issue(principal("u-2")).await;

        assert_eq!(registry.revoke_user("u-1").await, 2);
        assert!(registry.resolve(&other).await.is_some());
    }

    #[tokio::test]
    async fn test_expired_session_is_dropped() {
        let registry = SessionRegistry::new(Duration::ZERO);
        let token = registry.issue(principal("u-1")).await;

        assert!(registry.resolve(&token).await.is_none());
        assert_eq!(registry.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_abandoned_sessions_are_swept_on_issue() {
        let registry = SessionRegistry::new(Duration::ZERO);
        for i in 0..100 {
            registry.issue(principal(&format!("u-{i}"))).await;
        }

        // Only the newest entry can remain, and it is already expired
        assert!(registry.sessions.read().await.len() <= 1);
        assert_eq!(registry.active_count().await, 0);

        registry.sweep_expired().await;
        assert!(registry.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_keeps_live_sessions() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let first = registry.issue(principal("u-1")).await;
        registry.issue(principal("u-2")).await;

        assert_eq!(registry.sessions.read().await.len(), 2);
        assert_eq!(registry.sweep_expired().await, 0);
        assert!(registry.resolve(&first).await.is_some());
    }
}
