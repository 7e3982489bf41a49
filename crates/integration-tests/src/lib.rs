//! Integration tests for Whizyre.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p whizyre-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Full catalog -> cart -> checkout journeys over both
//!   payment paths
//! - `cart_properties` - Cart total/count invariants over arbitrary add
//!   sequences
//!
//! This library holds the shared fixtures: a sample catalog matching the
//! production configuration shape and a scripted in-memory payment
//! processor.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use whizyre_storefront::catalog::Catalog;
use whizyre_storefront::checkout::{CompletionHook, PaymentOutcome};
use whizyre_storefront::payments::{CardDetails, PaymentProcessor, PaymentToken, ProcessorError};

/// Initialize test logging once. Respects `RUST_LOG`.
pub fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// The store's three-product catalog, in configuration order.
pub const SAMPLE_CATALOG: &str = r#"[
    { "id": 1, "name": "Tidal Account", "price": "9.99",
      "description": "Premium Tidal streaming account" },
    { "id": 2, "name": "Twitter Script", "price": "19.99",
      "description": "Automate your Twitter activities" },
    { "id": 3, "name": "Instagram Script", "price": "24.99",
      "description": "Boost your Instagram engagement" }
]"#;

/// Load the sample catalog.
///
/// # Panics
///
/// Panics if the embedded JSON is invalid; that is a fixture bug.
#[must_use]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
pub fn sample_catalog() -> Catalog {
    Catalog::from_json(SAMPLE_CATALOG).unwrap()
}

/// Well-formed card input for the happy paths.
#[must_use]
pub fn valid_card() -> CardDetails {
    CardDetails::new("4242 4242 4242 4242", 12, 2030, "123")
}

/// Scripted in-memory payment processor.
///
/// Pops one pre-loaded response per tokenize call and counts calls, so
/// tests can assert exactly how many processor requests a flow issued.
#[derive(Clone, Default)]
pub struct RecordingProcessor {
    responses: Arc<Mutex<VecDeque<Result<PaymentToken, ProcessorError>>>>,
    calls: Arc<AtomicUsize>,
}

impl RecordingProcessor {
    /// Create a processor that answers with `responses`, in order.
    #[must_use]
    pub fn scripted(
        responses: impl IntoIterator<Item = Result<PaymentToken, ProcessorError>>,
    ) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().collect())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many tokenize calls this processor has served.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PaymentProcessor for RecordingProcessor {
    #[allow(clippy::unwrap_used, clippy::expect_used)]
    async fn tokenize(&self, _card: &CardDetails) -> Result<PaymentToken, ProcessorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected tokenize call")
    }
}

/// Captured completion outcomes, shared with a hook.
pub type CapturedOutcomes = Arc<Mutex<Vec<PaymentOutcome>>>;

/// Build a completion hook that records every outcome it receives.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn capture_hook() -> (CompletionHook, CapturedOutcomes) {
    let outcomes: CapturedOutcomes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&outcomes);
    let hook: CompletionHook = Box::new(move |outcome, _session| {
        sink.lock().unwrap().push(outcome);
    });
    (hook, outcomes)
}
