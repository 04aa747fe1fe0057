//! Record types shared by storage, HTTP routes and the CLI.

use serde::{Deserialize, Serialize};

use crate::auth::{Principal, Role};
use crate::report::{AggregateReport, RatingSubmission};

// ─────────────────────────────────────────────────────────────────────────────
// Entity Types
// ─────────────────────────────────────────────────────────────────────────────

/// Public view of a user (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: i64,
}

impl User {
    pub fn to_principal(&self) -> Principal {
        Principal::new(&self.id, &self.name, &self.email, self.role)
    }
}

/// User row including the stored credential, used only by login
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub address: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub location_id: Option<String>,
    pub location: Option<String>,
    pub created_at: i64,
}

/// Minimal event listing for feedback forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTitle {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantFeedback {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub submission: RatingSubmission,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizerFeedback {
    pub id: String,
    pub event_id: String,
    pub organizer_name: String,
    pub total_expenses: f64,
    pub volunteers: Vec<String>,
    pub challenges: String,
    pub suggestions: String,
    pub created_at: i64,
}

/// Row counts shown on the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
    pub users: u32,
    pub locations: u32,
    pub events: u32,
    pub participant_feedback: u32,
    pub organizer_feedback: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Input Types (for creating entities)
// ─────────────────────────────────────────────────────────────────────────────

/// Input for creating a user; the password is hashed before storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLocation {
    pub name: String,
    pub address: String,
}

/// Input for creating or replacing an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub location_id: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewParticipantFeedback {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(flatten)]
    pub submission: RatingSubmission,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrganizerFeedback {
    pub event_id: String,
    pub organizer_name: String,
    #[serde(default)]
    pub total_expenses: f64,
    #[serde(default)]
    pub volunteers: Vec<String>,
    #[serde(default)]
    pub challenges: String,
    #[serde(default)]
    pub suggestions: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Report Views
// ─────────────────────────────────────────────────────────────────────────────

/// One row of the report index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(flatten)]
    pub event: Event,
    pub response_count: u32,
}

/// A participant response with its own mean rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantResponse {
    #[serde(flatten)]
    pub feedback: ParticipantFeedback,
    pub average: f64,
}

/// Everything known about one event's feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventReport {
    pub event: Event,
    pub location: Option<Location>,
    /// `None` when nobody has answered yet
    pub averages: Option<AggregateReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub participant_feedback: Vec<ParticipantResponse>,
    pub organizer_feedback: Vec<OrganizerFeedback>,
}
