//! Reqwest-based HTTP client for the DevPayr API.
//!
//! Thin transport layer: builds authenticated requests, bounds them with
//! the configured timeout, and maps non-success statuses to typed errors.
//! Timeouts surface as transport errors, so a hung remote check fails
//! closed rather than open.

use crate::config::Config;
use crate::DevpayrError;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::USER_AGENT;
use std::time::Duration;

/// DevPayr API client.
pub struct DevpayrClient {
    client: Client,
    base_url: String,
    user_agent: String,
    license: Option<String>,
    api_key: Option<String>,
}

impl DevpayrClient {
    /// Create a new client from config.
    ///
    /// The request timeout is taken from `config.timeout_secs`.
    pub fn new(config: &Config) -> Result<Self, DevpayrError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DevpayrError::Transport(format!("Failed to create client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            user_agent: build_user_agent(),
            license: config.license.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// GET a JSON endpoint relative to the base URL.
    pub fn get_json(&self, path: &str) -> Result<serde_json::Value, DevpayrError> {
        let request = self.client.get(self.url(path));
        self.execute(request)
    }

    /// POST to a JSON endpoint relative to the base URL.
    pub fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DevpayrError> {
        let request = self.client.post(self.url(path)).json(body);
        self.execute(request)
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    fn execute(&self, request: RequestBuilder) -> Result<serde_json::Value, DevpayrError> {
        let mut request = request
            .header(USER_AGENT, &self.user_agent)
            .header("Accept", "application/json");

        // License header takes precedence; both may be configured.
        if let Some(license) = self.license.as_deref().filter(|l| !l.is_empty()) {
            request = request.header("X-License-Key", license);
        } else if let Some(api_key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.header("X-Api-Key", api_key);
        }

        let response = request
            .send()
            .map_err(|e| DevpayrError::Transport(format!("Request failed: {e}")))?;

        Self::handle_response(response)
    }

    fn handle_response(response: Response) -> Result<serde_json::Value, DevpayrError> {
        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .map_err(|e| DevpayrError::Protocol(format!("Invalid JSON response: {e}")))?;

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("request failed")
                .to_string();
            return Err(DevpayrError::ApiResponse {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

/// Build a User-Agent string for API requests.
///
/// Format: `devpayr-rust/<version>`
pub fn build_user_agent() -> String {
    format!("devpayr-rust/{}", env!("CARGO_PKG_VERSION"))
}
