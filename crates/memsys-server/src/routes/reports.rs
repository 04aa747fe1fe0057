//! Feedback reports (secretary tier).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use memsys_core::db::{EventReport, ParticipantResponse, ReportSummary};
use memsys_core::report::{aggregate, NO_FEEDBACK_MESSAGE};
use std::sync::Arc;

use super::error_response;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports", get(list_reports))
        .route("/events/{id}/report", get(event_report))
}

/// Events with their response counts
async fn list_reports(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReportSummary>>, (StatusCode, String)> {
    let rows = state
        .db
        .list_events_with_response_counts()
        .map_err(error_response)?;
    Ok(Json(
        rows.into_iter()
            .map(|(event, response_count)| ReportSummary {
                event,
                response_count,
            })
            .collect(),
    ))
}

/// Full report for one event, recomputed from all of its feedback
async fn event_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EventReport>, (StatusCode, String)> {
    let event = state
        .db
        .get_event(&id)
        .map_err(error_response)?
        .ok_or((StatusCode::NOT_FOUND, "Event not found".to_string()))?;

    let location = match event.location_id.as_deref() {
        Some(location_id) => state.db.get_location(location_id).map_err(error_response)?,
        None => None,
    };

    let participant = state
        .db
        .list_participant_feedback(&id)
        .map_err(error_response)?;
    let organizer_feedback = state
        .db
        .list_organizer_feedback(&id)
        .map_err(error_response)?;

    let averages = aggregate(participant.iter().map(|f| &f.submission));
    let message = averages
        .is_none()
        .then(|| NO_FEEDBACK_MESSAGE.to_string());

    let participant_feedback = participant
        .into_iter()
        .map(|feedback| ParticipantResponse {
            average: feedback.submission.average(),
            feedback,
        })
        .collect();

    Ok(Json(EventReport {
        event,
        location,
        averages,
        message,
        participant_feedback,
        organizer_feedback,
    }))
}
