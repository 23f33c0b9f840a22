//! Fixed decoy responses.
//!
//! Every capture resolves to one of four shapes. None of them depends on
//! the classification, so a probe learns nothing about how it was labelled.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use snare_core::{HttpMethod, Outcome};

use crate::decoys::{render_page, DecoyRoute};

/// Response returned to the remote client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoyResponse {
    /// Decoy login page.
    Page { title: String },
    /// Every credential submission fails.
    InvalidCredentials,
    TooManyRequests,
    NotFound,
}

impl DecoyResponse {
    /// Pick the response for a pipeline outcome.
    pub fn for_outcome(outcome: Outcome, method: &HttpMethod, route: Option<&DecoyRoute>) -> Self {
        match (outcome, route) {
            (Outcome::Throttled, _) => Self::TooManyRequests,
            (Outcome::Served, Some(route)) if !method.is_post() => Self::Page {
                title: route.title.clone(),
            },
            (Outcome::Served, Some(_)) => Self::InvalidCredentials,
            (Outcome::Served, None) | (Outcome::NotFound, _) => Self::NotFound,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Page { .. } => StatusCode::OK,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for DecoyResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Page { title } => (status, Html(render_page(&title))).into_response(),
            Self::InvalidCredentials => (status, "Invalid username or password").into_response(),
            Self::TooManyRequests => (status, "Too Many Requests").into_response(),
            Self::NotFound => (status, "Not Found").into_response(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub event_sink_healthy: bool,
    pub rate_windows: usize,
}
