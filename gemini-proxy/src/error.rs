//! Relay failure classes and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::ProviderError;

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed";
pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "Server Error: Gemini API Key not configured on the server.";
pub const MISSING_IMAGE_MESSAGE: &str = "Missing image data.";
pub const VENDOR_ERROR_MESSAGE: &str = "Gemini API Error";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error processing the image.";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("Gemini API key not configured")]
    MissingCredential,

    #[error("missing image data")]
    MissingImage,

    /// Gemini rejected the request; its status is relayed unchanged.
    #[error("Gemini API error {status}: {details}")]
    Vendor { status: u16, details: String },

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<ProviderError> for RelayError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Api { status, details } => RelayError::Vendor { status, details },
            other => RelayError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let (status, error, details) = match self {
            RelayError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE, None)
            }
            RelayError::MissingCredential => (
                StatusCode::INTERNAL_SERVER_ERROR,
                MISSING_CREDENTIAL_MESSAGE,
                None,
            ),
            RelayError::MissingImage => (StatusCode::BAD_REQUEST, MISSING_IMAGE_MESSAGE, None),
            RelayError::Vendor { status, details } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                VENDOR_ERROR_MESSAGE,
                Some(details),
            ),
            RelayError::Internal(err) => {
                // Operator-only; the caller gets the generic message.
                tracing::error!(error = ?err, "Proxy processing error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE, None)
            }
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn body_json(err: RelayError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_method_not_allowed_body() {
        let (status, body) = body_json(RelayError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "Method Not Allowed" }));
    }

    #[tokio::test]
    async fn test_vendor_status_is_relayed() {
        let (status, body) = body_json(RelayError::Vendor {
            status: 403,
            details: "bad key".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Gemini API Error", "details": "bad key" }));
    }

    #[tokio::test]
    async fn test_internal_error_does_not_leak() {
        let (status, body) =
            body_json(RelayError::Internal(anyhow::anyhow!("dns error: no such host"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Internal server error processing the image." })
        );
    }

    #[test]
    fn test_provider_error_mapping() {
        let api = RelayError::from(ProviderError::Api {
            status: 429,
            details: "quota".to_string(),
        });
        assert!(matches!(api, RelayError::Vendor { status: 429, .. }));

        let network = RelayError::from(ProviderError::Network("refused".to_string()));
        assert!(matches!(network, RelayError::Internal(_)));

        let malformed = RelayError::from(ProviderError::MalformedResponse("eof".to_string()));
        assert!(matches!(malformed, RelayError::Internal(_)));
    }
}
