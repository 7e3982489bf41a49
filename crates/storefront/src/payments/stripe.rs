//! Stripe-backed payment processor client.
//!
//! Uses `reqwest` against the Payment Methods endpoint. The checkout core
//! only needs tokenization; the server-side charge using the returned token
//! belongs to the settlement collaborator, not this crate.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::ProcessorConfig;
use crate::payments::{CardDetails, PaymentProcessor, PaymentToken, ProcessorError};

/// Client for the Stripe tokenization API.
///
/// Cheaply cloneable; the HTTP client and credentials are shared behind an
/// `Arc`.
#[derive(Clone)]
pub struct StripeClient {
    inner: Arc<StripeClientInner>,
}

struct StripeClientInner {
    client: reqwest::Client,
    endpoint: String,
    secret_key: String,
}

/// Successful tokenization response body.
#[derive(Debug, Deserialize)]
struct PaymentMethodResponse {
    id: String,
}

/// Error envelope returned by Stripe on rejection.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl StripeClient {
    /// Create a new client from processor configuration.
    #[must_use]
    pub fn new(config: &ProcessorConfig) -> Self {
        let endpoint = format!("{}/v1/payment_methods", config.api_base);
        Self {
            inner: Arc::new(StripeClientInner {
                client: reqwest::Client::new(),
                endpoint,
                secret_key: config.secret_key.expose_secret().to_string(),
            }),
        }
    }

    async fn request_token(&self, card: &CardDetails) -> Result<PaymentToken, ProcessorError> {
        let params = [
            ("type", "card".to_string()),
            ("card[number]", card.number.expose_secret().to_string()),
            ("card[exp_month]", card.exp_month.to_string()),
            ("card[exp_year]", card.exp_year.to_string()),
            ("card[cvc]", card.cvc.expose_secret().to_string()),
        ];

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .bearer_auth(&self.inner.secret_key)
            .form(&params)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ProcessorError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            // Stripe declines carry a structured error with a message meant
            // for the cardholder; pass it through untouched.
            if let Ok(envelope) = serde_json::from_str::<ErrorResponse>(&response_text) {
                return Err(ProcessorError::Declined(envelope.error.message));
            }
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "processor returned non-success status without error envelope"
            );
            return Err(ProcessorError::Declined(format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            )));
        }

        let parsed: PaymentMethodResponse = serde_json::from_str(&response_text)?;
        debug!(token = %parsed.id, "tokenization succeeded");
        Ok(PaymentToken::new(parsed.id))
    }
}

impl PaymentProcessor for StripeClient {
    #[instrument(skip(self, card))]
    async fn tokenize(&self, card: &CardDetails) -> Result<PaymentToken, ProcessorError> {
        self.request_token(card).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body_parses() {
        let body = r#"{ "id": "pm_1NO6mA2eZvKYlo2C", "object": "payment_method" }"#;
        let parsed: PaymentMethodResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.id, "pm_1NO6mA2eZvKYlo2C");
    }

    #[test]
    fn test_error_envelope_parses() {
        let body = r#"{ "error": { "message": "Your card was declined.", "type": "card_error" } }"#;
        let parsed: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "Your card was declined.");
    }

    #[test]
    fn test_endpoint_built_from_config() {
        let config = ProcessorConfig::for_tests("sk_test_4eC39HqLyjWDarjtT1zdp7dc");
        let client = StripeClient::new(&config);
        assert!(client.inner.endpoint.ends_with("/v1/payment_methods"));
    }
}
