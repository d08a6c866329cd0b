//! Request and response models for the relay.

pub mod payload;

pub use payload::{GenerateContentResponse, InboundRequest, OutboundPayload};
