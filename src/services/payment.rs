//! Payment-status check — the remote trust boundary for validation.

use crate::client::http::DevpayrClient;
use crate::config::Config;
use crate::protocol::models::PaymentCheckResponse;
use crate::DevpayrError;

/// Remote payment-status check consulted by the validator.
///
/// The validator depends on this trait, not the HTTP client, so tests
/// (and embedders with their own transports) can substitute their own
/// implementation.
pub trait PaymentCheck: Send + Sync {
    /// Check payment status for the project bound to the configured
    /// credential.
    fn check_project(&self) -> Result<PaymentCheckResponse, DevpayrError>;
}

/// HTTP-backed payment service.
pub struct PaymentService {
    client: DevpayrClient,
}

impl PaymentService {
    /// Create a payment service from config.
    pub fn new(config: &Config) -> Result<Self, DevpayrError> {
        Ok(Self {
            client: DevpayrClient::new(config)?,
        })
    }

    /// Check payment status using the license key; the remote resolves
    /// the bound project itself.
    pub fn check_with_license_key(&self) -> Result<PaymentCheckResponse, DevpayrError> {
        let body = self
            .client
            .post_json("project/has-paid", &serde_json::json!({}))?;
        parse_payment_response(body)
    }

    /// Check payment status for an explicit project using an API key.
    pub fn check_with_api_key(
        &self,
        project_id: &str,
    ) -> Result<PaymentCheckResponse, DevpayrError> {
        let body = self.client.get_json(&format!("project/{project_id}/has-paid"))?;
        parse_payment_response(body)
    }
}

impl PaymentCheck for PaymentService {
    fn check_project(&self) -> Result<PaymentCheckResponse, DevpayrError> {
        self.check_with_license_key()
    }
}

fn parse_payment_response(
    body: serde_json::Value,
) -> Result<PaymentCheckResponse, DevpayrError> {
    serde_json::from_value(body)
        .map_err(|e| DevpayrError::Protocol(format!("Failed to parse payment response: {e}")))
}
