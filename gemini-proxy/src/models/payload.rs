//! Wire shapes for the relay.
//!
//! `InboundRequest` is what browsers post to the proxy; `OutboundPayload` is the
//! `generateContent` body sent to Gemini; `GenerateContentResponse` wraps
//! Gemini's reply and reads the two fields the relay cares about.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inline data is always tagged PNG, whatever the client actually uploaded.
pub const INLINE_IMAGE_MIME_TYPE: &str = "image/png";

/// Returned as the analysis when Gemini answers without any text.
pub const FALLBACK_ANALYSIS: &str = "No se pudo obtener el análisis de la IA.";

/// Client request body.
///
/// The prompts are forwarded as whatever JSON the client sent; only the image
/// is required, and it must be a string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundRequest {
    #[serde(default)]
    pub base64_image: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<Value>,
    #[serde(default)]
    pub user_query: Option<Value>,
}

impl InboundRequest {
    /// The image payload, if present and non-empty.
    pub fn image(&self) -> Option<&str> {
        self.base64_image.as_deref().filter(|data| !data.is_empty())
    }
}

/// Body of a Gemini `generateContent` call.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutboundPayload {
    pub contents: Vec<Content>,
    pub system_instruction: SystemInstruction,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    /// A missing prompt serialises as `{}`.
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<Value>,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

impl OutboundPayload {
    /// Shape a Gemini request around the client's prompt and image.
    ///
    /// The image string is forwarded verbatim; it is not decoded or validated.
    pub fn build(image: &str, system_prompt: Option<&Value>, user_query: Option<&Value>) -> Self {
        OutboundPayload {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Text {
                        text: user_query.cloned(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: INLINE_IMAGE_MIME_TYPE.to_string(),
                            data: image.to_string(),
                        },
                    },
                ],
            }],
            system_instruction: SystemInstruction {
                parts: vec![Part::Text {
                    text: system_prompt.cloned(),
                }],
            },
        }
    }
}

/// Reply from `generateContent`.
///
/// Kept as raw JSON: Gemini and the Google front end answer in several shapes
/// (plain objects, array-wrapped errors, bare strings), and any valid JSON
/// must reach status handling instead of failing to parse.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct GenerateContentResponse(pub Value);

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, when a non-empty string.
    pub fn first_text(&self) -> Option<&str> {
        self.0
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    }

    /// Gemini's own `error.message`, if the body carried one.
    ///
    /// Google returns some errors wrapped in a one-element array; the first
    /// element is read in that case.
    pub fn error_message(&self) -> Option<&str> {
        let body = match &self.0 {
            Value::Array(items) => items.first()?,
            other => other,
        };

        body.get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
    }
}
