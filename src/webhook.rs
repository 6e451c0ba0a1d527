//! Messenger webhook plumbing: platform verification, event receipt and the plain-text error pages.
//! Conversations themselves are handled elsewhere; events are only acknowledged here.

use std::{fmt::Display, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

/// Query string the messaging platform sends when the webhook is registered.
#[derive(Debug, Default, Deserialize)]
pub struct Verification {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WebhookState {
    verify_token: Option<Arc<str>>,
}

/// Routes for `/`. Generic over the outer router's state so it can be merged into it.
pub fn router<S>(verify_token: Option<String>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let state = WebhookState {
        verify_token: verify_token.map(Arc::from),
    };
    Router::new()
        .route("/", get(verify).post(receive))
        .with_state(state)
}

async fn verify(
    State(state): State<WebhookState>,
    Query(verification): Query<Verification>,
) -> Response {
    if let Some(expected) = state.verify_token.as_deref() {
        if verification.verify_token.as_deref() != Some(expected) {
            log::warn!(
                "rejected webhook verification (mode {:?}) with a wrong token",
                verification.mode
            );
            return (StatusCode::FORBIDDEN, "Verification token mismatch.").into_response();
        }
    }
    verification.challenge.unwrap_or_default().into_response()
}

/// Every POST is acknowledged, whatever its content type or body.
async fn receive(body: Bytes) -> (StatusCode, &'static str) {
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(event) => log::debug!("received webhook event: {event}"),
        Err(e) => log::debug!("received webhook body that is not json ({e})"),
    }
    (StatusCode::OK, "ok")
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Sorry, Nothing at this URL.")
}

pub fn application_error(e: impl Display) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Sorry, unexpected error: {e}"),
    )
        .into_response()
}
