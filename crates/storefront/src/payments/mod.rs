//! Payment processor capability.
//!
//! The checkout orchestrator never talks to a processor directly; it is
//! handed anything implementing [`PaymentProcessor`]. The single operation is
//! tokenization: exchanging raw card details for an opaque, single-use token
//! the processor understands. The concrete Stripe-backed client lives in
//! [`stripe`]; tests inject in-memory fakes.

mod stripe;

pub use stripe::StripeClient;

use std::future::Future;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a payment processor.
///
/// Declines carry the processor's human-readable message; the checkout layer
/// surfaces it to the user verbatim (after display sanitization).
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The HTTP request itself failed.
    #[error("processor request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The processor response could not be parsed.
    #[error("processor response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The processor rejected the tokenization. The message is
    /// human-readable and shown to the user as-is.
    #[error("{0}")]
    Declined(String),

    /// Rate limited by the processor.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The tokenization call exceeded the configured timeout.
    #[error("payment processor timed out after {0:?}")]
    Timeout(Duration),
}

/// An opaque payment-method token returned by tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentToken(String);

impl PaymentToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value handed to the settlement collaborator.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors found validating card input before any processor call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardValidationError {
    /// No card number was entered.
    #[error("card number is required")]
    MissingNumber,
    /// The card number is not 12-19 digits.
    #[error("card number must be 12-19 digits")]
    InvalidNumber,
    /// The expiry month is outside 1-12.
    #[error("expiry month must be between 1 and 12")]
    InvalidExpiryMonth,
    /// The security code is not 3-4 digits.
    #[error("security code must be 3-4 digits")]
    InvalidCvc,
}

/// Raw card input collected from the user.
///
/// Implements `Debug` manually so card data never reaches logs.
#[derive(Clone)]
pub struct CardDetails {
    /// Primary account number.
    pub number: SecretString,
    /// Expiry month (1-12).
    pub exp_month: u8,
    /// Four-digit expiry year.
    pub exp_year: u16,
    /// Card security code.
    pub cvc: SecretString,
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &"[REDACTED]")
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .field("cvc", &"[REDACTED]")
            .finish()
    }
}

impl CardDetails {
    /// Build card details from the raw strings a card form produces.
    #[must_use]
    pub fn new(number: &str, exp_month: u8, exp_year: u16, cvc: &str) -> Self {
        Self {
            number: SecretString::from(number.trim().replace(' ', "")),
            exp_month,
            exp_year,
            cvc: SecretString::from(cvc.trim()),
        }
    }

    /// Validate the input without contacting any processor.
    ///
    /// This runs before submission so missing or malformed input never
    /// produces a wasted processor request.
    ///
    /// # Errors
    ///
    /// Returns the first [`CardValidationError`] found.
    pub fn validate(&self) -> Result<(), CardValidationError> {
        let number = self.number.expose_secret();
        if number.is_empty() {
            return Err(CardValidationError::MissingNumber);
        }
        if !(12..=19).contains(&number.len()) || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CardValidationError::InvalidNumber);
        }
        if !(1..=12).contains(&self.exp_month) {
            return Err(CardValidationError::InvalidExpiryMonth);
        }
        let cvc = self.cvc.expose_secret();
        if !(3..=4).contains(&cvc.len()) || !cvc.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CardValidationError::InvalidCvc);
        }
        Ok(())
    }
}

/// Capability to exchange card details for a payment-method token.
///
/// Asynchronous; the checkout orchestrator issues at most one call per
/// submission attempt and bounds it with its configured timeout.
pub trait PaymentProcessor {
    /// Tokenize `card` with the external processor.
    fn tokenize(
        &self,
        card: &CardDetails,
    ) -> impl Future<Output = Result<PaymentToken, ProcessorError>> + Send;
}
