//! HTTP route modules.

pub mod admin;
pub mod auth;
pub mod events;
pub mod feedback;
pub mod health;
pub mod home;
pub mod reports;

use axum::{http::StatusCode, middleware, routing::get, Router};
use memsys_core::Error;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::middleware::access_guard;
use crate::state::AppState;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    // Probes bypass the guard
    let public_routes = Router::new().route("/health", get(health::health_check));

    // Everything else is a navigation checked by the access guard
    let guarded_routes = Router::new()
        .merge(auth::router())
        .merge(home::router())
        .merge(feedback::router())
        .merge(events::router())
        .merge(reports::router())
        .merge(admin::router())
        .layer(middleware::from_fn_with_state(state.clone(), access_guard));

    Router::new()
        .merge(public_routes)
        .merge(guarded_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Map a core error onto an HTTP status and message
pub(crate) fn error_response(err: Error) -> (StatusCode, String) {
    let status = match &err {
        Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::DuplicateEmail(_) => StatusCode::CONFLICT,
        Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
        _ => {
            error!("Request failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string())
}
