//! HTTP handlers for the Gemini proxy.

pub mod health;
pub mod relay;

pub use health::{health_check, readiness_check};
pub use relay::relay;
