//! The relay endpoint.
//!
//! Validates the inbound request, forwards it to the configured vision
//! provider and normalises whatever comes back into the relay's response
//! shapes. Checks run in a fixed order: method, credential, body.

use anyhow::Context;
use axum::{body::Bytes, extract::State, http::Method, Json};
use serde::Serialize;

use crate::error::RelayError;
use crate::models::payload::FALLBACK_ANALYSIS;
use crate::models::{InboundRequest, OutboundPayload};
use crate::startup::AppState;

/// Successful relay response.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}

/// Relay one image analysis request to Gemini.
///
/// The body is read raw so that a malformed body is reported through the
/// relay's own error shape rather than an extractor rejection.
pub async fn relay(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, RelayError> {
    if method != Method::POST {
        return Err(RelayError::MethodNotAllowed);
    }

    let provider = state
        .provider
        .as_ref()
        .ok_or(RelayError::MissingCredential)?;

    let request: InboundRequest =
        serde_json::from_slice(&body).context("Failed to parse request body")?;

    let image = request.image().ok_or(RelayError::MissingImage)?;

    tracing::info!(
        image_len = image.len(),
        has_system_prompt = request.system_prompt.is_some(),
        has_user_query = request.user_query.is_some(),
        "Relaying image analysis request"
    );

    let payload = OutboundPayload::build(
        image,
        request.system_prompt.as_ref(),
        request.user_query.as_ref(),
    );

    let analysis = provider
        .analyze(&payload)
        .await?
        .unwrap_or_else(|| FALLBACK_ANALYSIS.to_string());

    Ok(Json(AnalysisResponse { analysis }))
}
