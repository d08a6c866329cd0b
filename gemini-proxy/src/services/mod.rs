pub mod providers;

pub use providers::gemini::{GeminiConfig, GeminiVisionProvider};
pub use providers::{ProviderError, VisionProvider};
