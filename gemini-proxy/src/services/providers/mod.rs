//! Outbound AI provider abstraction.
//!
//! The relay talks to its vendor through [`VisionProvider`], so the handler can
//! be driven by a stub in tests and the Gemini client stays in one place.

pub mod gemini;

use crate::models::OutboundPayload;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The vendor answered with a non-success status.
    #[error("API error {status}: {details}")]
    Api { status: u16, details: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Trait for image + prompt analysis providers (e.g., Gemini).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Send one analysis request.
    ///
    /// `Ok(None)` means the vendor succeeded but returned no usable text.
    async fn analyze(&self, payload: &OutboundPayload) -> Result<Option<String>, ProviderError>;
}
