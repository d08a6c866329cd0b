//! Application startup and lifecycle management.
//!
//! Builds the HTTP router (relay endpoint plus health checks), binds the
//! listener and serves until a shutdown signal arrives.

use crate::config::{HttpSettings, ProxyConfig, MODEL_NAME};
use crate::handlers;
use crate::services::{GeminiConfig, GeminiVisionProvider, VisionProvider};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{any, get},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::security_headers::security_headers_middleware;
use service_core::middleware::tracing::{http_request_span, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Path the relay is mounted on.
pub const RELAY_PATH: &str = "/api/gemini_proxy";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Present only when the Gemini credential is configured.
    pub provider: Option<Arc<dyn VisionProvider>>,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> Self {
        let provider = config.gemini.api_key.as_ref().map(|api_key| {
            Arc::new(GeminiVisionProvider::new(GeminiConfig {
                api_key: api_key.clone(),
                model: MODEL_NAME.to_string(),
                api_base: config.gemini.api_base.clone(),
            })) as Arc<dyn VisionProvider>
        });

        Self { provider }
    }
}

/// Build the router with all middleware applied.
pub fn router(state: AppState, http: &HttpSettings) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route(RELAY_PATH, any(handlers::relay))
        .layer(DefaultBodyLimit::max(http.max_body_bytes))
        .layer(from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(http_request_span::<axum::body::Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state);

    match cors_layer(&http.allowed_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ProxyConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config);

        if state.provider.is_some() {
            tracing::info!(model = MODEL_NAME, "Initialized Gemini vision provider");
        } else {
            tracing::warn!(
                "GEMINI_API_KEY not configured - relay requests will be rejected"
            );
        }

        let router = router(state, &config.http);

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Gemini proxy: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal is received.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })?;

        tracing::info!("Service shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
