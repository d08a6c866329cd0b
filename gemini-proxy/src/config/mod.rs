use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Gemini model used for every relayed request.
pub const MODEL_NAME: &str = "gemini-2.5-flash-preview-09-2025";

/// Public Gemini REST endpoint.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Vercel-compatible request ceiling; base64 screenshots routinely exceed axum's 2MB default.
const DEFAULT_MAX_BODY_BYTES: usize = 4_718_592;

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub http: HttpSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// `None` when the key is unset or blank; requests then fail with a configuration error.
    pub api_key: Option<Secret<String>>,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub max_body_bytes: usize,
    /// Empty disables the CORS layer.
    pub allowed_origins: Vec<String>,
}

impl ProxyConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Secret::new);

        let api_base = env::var("GEMINI_API_BASE")
            .ok()
            .filter(|base| !base.is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string());

        let max_body_bytes = match env::var("PROXY_MAX_BODY_BYTES") {
            Ok(raw) => raw.parse().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "PROXY_MAX_BODY_BYTES must be a byte count, got {:?}: {}",
                    raw,
                    e
                ))
            })?,
            Err(_) => DEFAULT_MAX_BODY_BYTES,
        };

        let allowed_origins = env::var("PROXY_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        Ok(ProxyConfig {
            common,
            gemini: GeminiSettings { api_key, api_base },
            http: HttpSettings {
                max_body_bytes,
                allowed_origins,
            },
        })
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            allowed_origins: Vec::new(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
