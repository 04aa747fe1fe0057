//! Administration routes (admin only).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use memsys_core::db::{Location, NewLocation, NewUser, TableCounts, User};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::error_response;
use crate::middleware::AuthContext;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/{id}", delete(delete_user))
        .route("/admin/locations", get(list_locations).post(create_location))
        .route(
            "/admin/locations/{id}",
            put(update_location).delete(delete_location),
        )
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub counts: TableCounts,
    pub active_sessions: usize,
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Dashboard>, (StatusCode, String)> {
    let counts = state.db.table_counts().map_err(error_response)?;
    Ok(Json(Dashboard {
        counts,
        active_sessions: state.sessions.active_count().await,
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, (StatusCode, String)> {
    let users = state.db.list_users().map_err(error_response)?;
    Ok(Json(users))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), (StatusCode, String)> {
    let db = state.db.clone();
    let user = tokio::task::spawn_blocking(move || db.create_user(&req))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Delete a user and end their sessions
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    if auth.principal.id == id {
        return Err((
            StatusCode::BAD_REQUEST,
            "Cannot delete the signed-in account".to_string(),
        ));
    }

    if !state.db.delete_user(&id).map_err(error_response)? {
        return Err((StatusCode::NOT_FOUND, "User not found".to_string()));
    }

    let revoked = state.sessions.revoke_user(&id).await;
    info!("Deleted user {} ({} sessions ended)", id, revoked);
    Ok(StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Locations
// ─────────────────────────────────────────────────────────────────────────────

async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Location>>, (StatusCode, String)> {
    let locations = state.db.list_locations().map_err(error_response)?;
    Ok(Json(locations))
}

async fn create_location(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewLocation>,
) -> Result<(StatusCode, Json<Location>), (StatusCode, String)> {
    let location = state.db.create_location(&req).map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(location)))
}

async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<NewLocation>,
) -> Result<Json<Location>, (StatusCode, String)> {
    let location = state
        .db
        .update_location(&id, &req)
        .map_err(error_response)?;
    Ok(Json(location))
}

async fn delete_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.db.delete_location(&id).map_err(error_response)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Location not found".to_string()))
    }
}
