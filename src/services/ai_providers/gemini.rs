use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::constants::{timeout_duration_secs, BACKEND_REQUEST_TIMEOUT_SECS};
use crate::enums::backend_error::BackendApiError;
use crate::services::rate_limiter::ApiRateLimiter;
use crate::structs::ai::gemini::gemini_content::GeminiContent;
use crate::structs::ai::gemini::gemini_request::GeminiRequest;
use crate::structs::config::backend_config::BackendConfig;
use crate::traits::reasoning_backend::ReasoningBackend;

#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: Client,
    model: String,
    rate_limiter: Arc<ApiRateLimiter>,
}

impl GeminiProvider {
    pub fn new(config: BackendConfig, rate_limiter: Arc<ApiRateLimiter>) -> Self {
        Self {
            // Presence of the key is checked per request before any call is
            // made; an absent key never reaches the wire.
            api_key: config.api_key.unwrap_or_default(),
            base_url: config.base_url,
            client: Client::new(),
            model: config.model,
            rate_limiter,
        }
    }
}

#[async_trait]
impl ReasoningBackend for GeminiProvider {
    async fn generate(&self, request: GeminiRequest) -> Result<GeminiContent, BackendApiError> {
        self.rate_limiter.acquire().await;

        log::debug!("📦 Request model: {}", self.model);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(timeout_duration_secs(BACKEND_REQUEST_TIMEOUT_SECS))
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(match status.as_u16() {
                401 => BackendApiError::Authentication(error_text),
                code => BackendApiError::Api {
                    status: code,
                    body: error_text,
                },
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendApiError::Serialization(e.to_string()))?;

        let content = json
            .get("candidates")
            .and_then(|candidates| candidates.as_array())
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate.get("content"))
            .cloned()
            .ok_or_else(|| {
                BackendApiError::Serialization("no candidate content in response".to_string())
            })?;

        serde_json::from_value(content).map_err(|e| BackendApiError::Serialization(e.to_string()))
    }
}
