//! Application state.

use memsys_core::{AccessGuard, Database};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::sessions::SessionRegistry;

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Database connection
    pub db: Arc<Database>,
    /// Route table for navigation checks
    pub guard: AccessGuard,
    /// Live login sessions
    pub sessions: SessionRegistry,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, db: Database) -> Arc<Self> {
        let ttl = Duration::from_secs(config.session_ttl_secs);
        Arc::new(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            guard: AccessGuard::new(),
            sessions: SessionRegistry::new(ttl),
            start_time: Instant::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memsys_core::{Principal, Role};

    #[tokio::test]
    async fn test_state_uses_configured_session_ttl() {
        let config = Config {
            session_ttl_secs: 0,
            ..Config::default()
        };
        let state = AppState::new(config, Database::open_in_memory().unwrap());

        let token = state
            .sessions
            .issue(Principal::new("u-1", "T", "t@example.org", Role::User))
            .await;
        assert!(state.sessions.resolve(&token).await.is_none());
    }

    #[test]
    fn test_state_starts_now() {
        let state = AppState::new(Config::default(), Database::open_in_memory().unwrap());
        assert!(state.start_time.elapsed().as_secs() < 1);
    }
}
