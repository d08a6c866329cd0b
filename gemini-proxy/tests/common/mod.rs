#![allow(dead_code)]

use gemini_proxy::config::{GeminiSettings, HttpSettings, ProxyConfig, MODEL_NAME};
use gemini_proxy::startup::{Application, RELAY_PATH};
use secrecy::Secret;
use service_core::config::Config as CoreConfig;

pub const TEST_API_KEY: &str = "test-api-key";

/// Path Gemini's `generateContent` is served on, relative to the API base.
pub fn generate_content_path() -> String {
    format!("/models/{}:generateContent", MODEL_NAME)
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Spawn the proxy with a credential, pointed at `api_base`.
    pub async fn spawn(api_base: &str) -> Self {
        Self::spawn_with_key(Some(TEST_API_KEY), api_base).await
    }

    /// Spawn the proxy with no credential configured.
    pub async fn spawn_without_key() -> Self {
        Self::spawn_with_key(None, "http://127.0.0.1:9").await
    }

    async fn spawn_with_key(api_key: Option<&str>, api_base: &str) -> Self {
        let config = ProxyConfig {
            common: CoreConfig { port: 0 }, // Random port
            gemini: GeminiSettings {
                api_key: api_key.map(|key| Secret::new(key.to_string())),
                api_base: api_base.to_string(),
            },
            http: HttpSettings::default(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }

    pub fn relay_url(&self) -> String {
        format!("{}{}", self.address, RELAY_PATH)
    }

    /// POST a JSON body to the relay and return status plus parsed body.
    pub async fn post_relay(&self, body: serde_json::Value) -> (u16, serde_json::Value) {
        let response = reqwest::Client::new()
            .post(self.relay_url())
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");

        let status = response.status().as_u16();
        let body = response.json().await.expect("Failed to parse JSON");
        (status, body)
    }
}
