//! API client for memsys-server.
//!
//! Redirects are not followed: a `303` from the server's access guard comes
//! back as [`ApiError::Redirect`] so the caller can react to it.

use anyhow::Context;
use memsys_core::types::{
    Event, EventReport, EventTitle, NewEvent, NewOrganizerFeedback, NewParticipantFeedback,
    ReportSummary,
};
use memsys_core::Principal;
use reqwest::{header, redirect, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub principal: Principal,
    pub redirect_to: String,
}

#[derive(Debug, Deserialize)]
struct FeedbackForm {
    events: Vec<EventTitle>,
}

#[derive(Debug, Deserialize)]
pub struct Submitted {
    pub id: String,
    pub redirect_to: String,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .redirect(redirect::Policy::none())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token,
        })
    }

    /// Build request with auth headers.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);

        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }

        req
    }

    async fn send(req: RequestBuilder) -> ApiResult<Response> {
        let response = req.send().await?;
        let status = response.status();

        if status.is_redirection() {
            let target = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("/")
                .to_string();
            return Err(ApiError::Redirect(target));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn json<T: DeserializeOwned>(req: RequestBuilder) -> ApiResult<T> {
        Ok(Self::send(req).await?.json().await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest { email, password };
        Self::json(self.request(Method::POST, "/auth/login").json(&body)).await
    }

    /// Revoke the server-side session; the server answers with a redirect to
    /// the login page, which counts as success.
    pub async fn logout(&self) -> ApiResult<()> {
        match Self::send(self.request(Method::POST, "/auth/logout")).await {
            Ok(_) | Err(ApiError::Redirect(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_events(&self) -> ApiResult<Vec<Event>> {
        Self::json(self.request(Method::GET, "/events")).await
    }

    pub async fn get_event(&self, id: &str) -> ApiResult<Event> {
        Self::json(self.request(Method::GET, &event_path(id))).await
    }

    pub async fn create_event(&self, input: &NewEvent) -> ApiResult<Event> {
        Self::json(self.request(Method::POST, "/events").json(input)).await
    }

    pub async fn delete_event(&self, id: &str) -> ApiResult<()> {
        Self::send(self.request(Method::DELETE, &event_path(id))).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reports
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_reports(&self) -> ApiResult<Vec<ReportSummary>> {
        Self::json(self.request(Method::GET, "/reports")).await
    }

    pub async fn event_report(&self, id: &str) -> ApiResult<EventReport> {
        Self::json(self.request(Method::GET, &report_path(id))).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Feedback
    // ─────────────────────────────────────────────────────────────────────────

    /// Events offered by the feedback forms
    pub async fn feedback_events(&self, form_path: &str) -> ApiResult<Vec<EventTitle>> {
        let form: FeedbackForm = Self::json(self.request(Method::GET, form_path)).await?;
        Ok(form.events)
    }

    pub async fn submit_participant(
        &self,
        input: &NewParticipantFeedback,
    ) -> ApiResult<Submitted> {
        Self::json(
            self.request(Method::POST, PARTICIPANT_FORM_PATH)
                .json(input),
        )
        .await
    }

    pub async fn submit_organizer(&self, input: &NewOrganizerFeedback) -> ApiResult<Submitted> {
        Self::json(self.request(Method::POST, ORGANIZER_FORM_PATH).json(input)).await
    }
}

pub const PARTICIPANT_FORM_PATH: &str = "/feedback/participant";
pub const ORGANIZER_FORM_PATH: &str = "/feedback/organizer";

pub fn event_path(id: &str) -> String {
    format!("/events/{}", id)
}

pub fn report_path(id: &str) -> String {
    format!("/events/{}/report", id)
}
