//! Command implementations for memsys CLI.
//!
//! Every command that reaches the server first passes the access guard for
//! its destination path, using the principal from the persisted session.

pub mod auth;
pub mod events;
pub mod feedback;
pub mod report;

use anyhow::Result;
use colored::Colorize;
use memsys_core::guard::{Decision, LOGIN_PATH};
use memsys_core::session::{FileStorage, SlotStorage};
use memsys_core::{AccessGuard, Principal, SessionStore};
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::ApiError;

/// Slot holding the bearer token next to the session's `user` slot
pub const TOKEN_KEY: &str = "token";

/// Per-invocation state: configuration, persisted session and guard
pub struct Context {
    pub config: Config,
    pub session: SessionStore<FileStorage>,
    pub guard: AccessGuard,
}

impl Context {
    pub fn new(config: Config) -> Self {
        let storage = FileStorage::new(config.session_dir());
        Self {
            session: SessionStore::new(storage),
            guard: AccessGuard::new(),
            config,
        }
    }

    /// API client carrying the stored bearer token, if any
    pub fn api(&self) -> Result<ApiClient> {
        let token = self
            .session
            .storage()
            .get(TOKEN_KEY)?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        ApiClient::new(&self.config.api_url, token)
    }

    /// Run the access guard for `path`.
    ///
    /// Returns `false` (after telling the user where they were sent) when the
    /// navigation is not allowed.
    pub fn navigate(&self, path: &str) -> bool {
        let principal = self.session.current_principal();
        match self.guard.evaluate(path, principal.as_ref()) {
            Decision::Allow => true,
            Decision::Redirect(target) => {
                debug!("Guard redirected {} to {}", path, target);
                print_redirect(target);
                false
            }
        }
    }

    /// Persist a successful sign-in.
    ///
    /// The principal is stored first; if the token cannot be written the
    /// principal is removed again so no half-written session is left behind.
    pub fn store_login(&self, principal: Principal, token: &str) -> Result<()> {
        self.session.login(principal)?;
        if let Err(e) = self.session.storage().set(TOKEN_KEY, token) {
            if let Err(cleanup) = self.session.logout() {
                warn!("Failed to roll back session: {}", cleanup);
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Forget the local session (principal and token)
    pub fn clear_session(&self) -> Result<&'static str> {
        self.session.storage().remove(TOKEN_KEY)?;
        Ok(self.session.logout()?)
    }

    /// Turn a server response error into user output.
    ///
    /// A redirect to the login page means the server no longer knows our
    /// token, so the local session is dropped as well.
    pub fn handle_api_error(&self, err: ApiError) -> Result<()> {
        match err {
            ApiError::Redirect(target) => {
                if target == LOGIN_PATH {
                    self.clear_session()?;
                    println!("{} Session expired.", "✗".red());
                }
                print_redirect(&target);
                Ok(())
            }
            other => Err(other.into()),
        }
    }
}

fn print_redirect(target: &str) {
    if target == LOGIN_PATH {
        println!(
            "{} Sign in required. Run {}",
            "→".cyan(),
            "memsys login".cyan()
        );
    } else {
        println!(
            "{} Not permitted for your role; redirected to {}",
            "→".yellow(),
            target.yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memsys_core::Role;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> Context {
        let config = Config {
            api_url: "http://127.0.0.1:1".to_string(),
            data_dir: PathBuf::from(dir.path()),
        };
        Context::new(config)
    }

    #[test]
    fn test_navigation_requires_login() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        assert!(!ctx.navigate("/events"));
        assert!(ctx.navigate("/feedback/participant"));
    }

    #[test]
    fn test_navigation_uses_persisted_role() {
        let dir = TempDir::new().unwrap();
        context(&dir)
            .session
            .login(Principal::new("u-1", "Sam", "sam@example.org", Role::Secretary))
            .unwrap();

        // A fresh context reads the session back from disk
        let ctx = context(&dir);
        assert!(ctx.navigate("/events"));
        assert!(ctx.navigate("/reports"));
        assert!(!ctx.navigate("/admin/users"));
    }

    #[test]
    fn test_clear_session_removes_both_slots() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        ctx.session
            .login(Principal::new("u-1", "Uma", "uma@example.org", Role::User))
            .unwrap();
        ctx.session.storage().set(TOKEN_KEY, "abc").unwrap();

        assert_eq!(ctx.clear_session().unwrap(), LOGIN_PATH);
        assert!(!dir.path().join("session/user.json").exists());
        assert!(!dir.path().join("session/token").exists());
        assert!(ctx.session.current_principal().is_none());
    }

    #[test]
    fn test_store_login_writes_principal_and_token() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        ctx.store_login(
            Principal::new("u-1", "Uma", "uma@example.org", Role::User),
            "tok-1",
        )
        .unwrap();

        assert!(ctx.session.is_authenticated());
        assert_eq!(
            ctx.session.storage().get(TOKEN_KEY).unwrap().as_deref(),
            Some("tok-1")
        );
    }

    #[test]
    fn test_store_login_rolls_back_when_token_write_fails() {
        let dir = TempDir::new().unwrap();
        // A directory in the token slot makes the write fail
        std::fs::create_dir_all(dir.path().join("session/token")).unwrap();
        let ctx = context(&dir);

        let result = ctx.store_login(
            Principal::new("u-1", "Uma", "uma@example.org", Role::User),
            "tok-1",
        );

        assert!(result.is_err());
        assert!(!ctx.session.is_authenticated());
        assert!(!dir.path().join("session/user.json").exists());
        assert!(context(&dir).session.current_principal().is_none());
    }

    #[test]
    fn test_store_login_skips_token_when_principal_write_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("session/user.json")).unwrap();
        let ctx = context(&dir);

        let result = ctx.store_login(
            Principal::new("u-1", "Uma", "uma@example.org", Role::User),
            "tok-1",
        );

        assert!(result.is_err());
        assert!(!ctx.session.is_authenticated());
        assert!(!dir.path().join("session/token").exists());
    }

    #[test]
    fn test_login_redirect_from_server_drops_session() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        ctx.session
            .login(Principal::new("u-1", "Uma", "uma@example.org", Role::User))
            .unwrap();

        ctx.handle_api_error(ApiError::Redirect(LOGIN_PATH.to_string()))
            .unwrap();
        assert!(!ctx.session.is_authenticated());
    }

    #[test]
    fn test_status_errors_propagate() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let err = ApiError::Status {
            status: 400,
            message: "bad".into(),
        };
        assert!(ctx.handle_api_error(err).is_err());
    }
}
