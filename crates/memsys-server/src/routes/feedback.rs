//! Public feedback forms.

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use memsys_core::db::{
    EventTitle, NewOrganizerFeedback, NewParticipantFeedback, OrganizerFeedback,
    ParticipantFeedback,
};
use memsys_core::report::{Category, MAX_RATING, MIN_RATING};
use serde::Serialize;
use std::sync::Arc;

use super::error_response;
use crate::state::AppState;

pub const THANK_YOU_PATH: &str = "/feedback/thankyou";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/feedback/participant",
            get(participant_form).post(submit_participant),
        )
        .route(
            "/feedback/organizer",
            get(organizer_form).post(submit_organizer),
        )
        .route(THANK_YOU_PATH, get(thank_you))
}

#[derive(Debug, Serialize)]
pub struct FeedbackForm {
    pub events: Vec<EventTitle>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_range: Option<[i32; 2]>,
}

#[derive(Debug, Serialize)]
pub struct Submitted<T> {
    #[serde(flatten)]
    pub record: T,
    pub redirect_to: &'static str,
}

async fn participant_form(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FeedbackForm>, (StatusCode, String)> {
    let events = state.db.list_event_titles().map_err(error_response)?;
    Ok(Json(FeedbackForm {
        events,
        categories: Category::ALL.to_vec(),
        rating_range: Some([MIN_RATING, MAX_RATING]),
    }))
}

async fn organizer_form(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FeedbackForm>, (StatusCode, String)> {
    let events = state.db.list_event_titles().map_err(error_response)?;
    Ok(Json(FeedbackForm {
        events,
        categories: Vec::new(),
        rating_range: None,
    }))
}

async fn submit_participant(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewParticipantFeedback>,
) -> Result<(StatusCode, Json<Submitted<ParticipantFeedback>>), (StatusCode, String)> {
    let record = state
        .db
        .create_participant_feedback(&input)
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(Submitted {
            record,
            redirect_to: THANK_YOU_PATH,
        }),
    ))
}

async fn submit_organizer(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewOrganizerFeedback>,
) -> Result<(StatusCode, Json<Submitted<OrganizerFeedback>>), (StatusCode, String)> {
    let record = state
        .db
        .create_organizer_feedback(&input)
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(Submitted {
            record,
            redirect_to: THANK_YOU_PATH,
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct ThankYou {
    pub message: &'static str,
}

async fn thank_you() -> Json<ThankYou> {
    Json(ThankYou {
        message: "Thank you for your feedback!",
    })
}
