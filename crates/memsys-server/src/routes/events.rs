//! Event management routes (secretary tier).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use memsys_core::db::{Event, NewEvent};
use std::sync::Arc;
use tracing::info;

use super::error_response;
use crate::state::AppState;

/// Create event router
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

/// List events, most recent first
pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Event>>, (StatusCode, String)> {
    let events = state.db.list_events().map_err(error_response)?;
    Ok(Json(events))
}

/// Create a new event
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewEvent>,
) -> Result<(StatusCode, Json<Event>), (StatusCode, String)> {
    let event = state.db.create_event(&req).map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Get an event by ID
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Event>, (StatusCode, String)> {
    let event = state
        .db
        .get_event(&id)
        .map_err(error_response)?
        .ok_or((StatusCode::NOT_FOUND, "Event not found".to_string()))?;
    Ok(Json(event))
}

/// Replace an event
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<NewEvent>,
) -> Result<Json<Event>, (StatusCode, String)> {
    let event = state.db.update_event(&id, &req).map_err(error_response)?;
    Ok(Json(event))
}

/// Delete an event along with its feedback
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.db.delete_event(&id).map_err(error_response)? {
        info!("Deleted event {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Event not found".to_string()))
    }
}
