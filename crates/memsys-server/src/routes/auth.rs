//! Login and logout.

use axum::{
    extract::State,
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Extension, Json, Router,
};
use memsys_core::guard::LOGIN_PATH;
use memsys_core::{Error, Principal};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::error_response;
use crate::middleware::AuthContext;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(LOGIN_PATH, get(login_hint).post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub principal: Principal,
    /// Where the client should navigate next
    pub redirect_to: String,
}

#[derive(Debug, Serialize)]
pub struct LoginHint {
    pub message: &'static str,
    pub fields: [&'static str; 2],
}

async fn login_hint() -> Json<LoginHint> {
    Json(LoginHint {
        message: "POST email and password to sign in",
        fields: ["email", "password"],
    })
}

/// Verify credentials and start a session
async fn login(
    State(state): State<Arc<AppState>>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    // bcrypt verification is CPU-bound; keep it off the async workers
    let db = state.db.clone();
    let email = input.email.clone();
    let password = input.password;
    let outcome = tokio::task::spawn_blocking(move || db.authenticate(&email, &password))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let principal = match outcome {
        Ok(principal) => principal,
        Err(Error::InvalidCredentials) => {
            warn!("Failed login for {}", input.email.trim());
            return Err((StatusCode::UNAUTHORIZED, Error::InvalidCredentials.to_string()));
        }
        Err(e) => return Err(error_response(e)),
    };

    let token = state.sessions.issue(principal.clone()).await;
    info!("User {} logged in as {}", principal.email, principal.role);

    Ok(Json(LoginResponse {
        token,
        redirect_to: principal.landing_path().to_string(),
        principal,
    }))
}

/// End the session and send the client to the login page
async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Redirect {
    state.sessions.revoke(&auth.token_hash).await;
    info!("User {} logged out", auth.principal.email);
    Redirect::to(LOGIN_PATH)
}
