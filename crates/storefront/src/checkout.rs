//! Checkout session and submission state machine.
//!
//! A [`CheckoutOrchestrator`] owns exactly one [`CheckoutSession`]: the cart
//! snapshot and total captured when checkout opened, the selected payment
//! method, and the submission status. It executes the correct payment path on
//! submit:
//!
//! - **card**: validate staged input, then one tokenization call against the
//!   injected [`PaymentProcessor`], bounded by the configured timeout.
//! - **qr**: no processor call; the session parks in `Processing` holding a
//!   payment reference until the caller reports the out-of-band confirmation
//!   via [`CheckoutOrchestrator::confirm_qr_payment`] (or cancels). There is
//!   no timer-based auto-resolution.
//!
//! All methods take `&mut self`: transitions are driven by discrete events on
//! a single logical thread, and the tokenize call is the only suspension
//! point. While it is suspended the session is `Processing` and rejects
//! further submits, so at most one tokenization request is ever outstanding.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use whizyre_core::{PaymentMethod, Price, SubmissionStatus};

use crate::cart::{CartLine, CartStore};
use crate::payments::{CardDetails, PaymentProcessor, PaymentToken, ProcessorError};

/// Maximum length of an error message surfaced for display.
const MAX_ERROR_DISPLAY_LEN: usize = 200;

/// Checkout behavior configuration, passed in at construction.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Upper bound on a single tokenization call. Elapsing is treated
    /// exactly like a processor error.
    pub tokenize_timeout: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            tokenize_timeout: Duration::from_secs(30),
        }
    }
}

/// Out-of-band confirmation of a QR payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrConfirmation {
    /// The payment reference the user paid against.
    pub reference: String,
}

/// What a completed payment produced, handed to the completion hook.
///
/// The server-side charge (for card) and reconciliation (for QR) belong to
/// the settlement collaborator behind the hook, not to this core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Card path: the tokenized payment method.
    Card(PaymentToken),
    /// QR path: the out-of-band confirmation.
    Qr(QrConfirmation),
}

/// Caller-supplied hook invoked once on success with the outcome and the
/// session snapshot.
pub type CompletionHook = Box<dyn FnMut(PaymentOutcome, &CheckoutSession) + Send>;

/// Errors surfaced by checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Missing or invalid input detected before any external call.
    #[error("validation error: {0}")]
    Validation(String),

    /// The processor rejected or failed the tokenization (timeouts
    /// included). The inner message is shown to the user.
    #[error(transparent)]
    Processor(#[from] ProcessorError),

    /// Submit (or a method switch) arrived while a submission was already
    /// processing.
    #[error("a submission is already in flight")]
    ConcurrentSubmission,

    /// The session was cancelled by the user and no longer reacts.
    #[error("checkout was cancelled")]
    CancelledByUser,

    /// The session already succeeded and is terminal.
    #[error("checkout session is closed")]
    SessionClosed,
}

/// One checkout attempt's transient state.
///
/// Created when checkout opens, discarded on cancel or completion. Never
/// shared or persisted.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    id: Uuid,
    lines: Vec<CartLine>,
    total: Price,
    method: PaymentMethod,
    status: SubmissionStatus,
    last_error: Option<String>,
    opened_at: DateTime<Utc>,
}

impl CheckoutSession {
    fn open(cart: &CartStore) -> Self {
        Self {
            id: Uuid::new_v4(),
            lines: cart.lines().to_vec(),
            total: cart.total(),
            method: PaymentMethod::default(),
            status: SubmissionStatus::default(),
            last_error: None,
            opened_at: Utc::now(),
        }
    }

    /// Session identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The cart lines captured when checkout opened.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The payable total captured when checkout opened.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// The currently selected payment method.
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Current submission status.
    #[must_use]
    pub const fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// The last user-visible error, if the previous submission failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// When the session was opened.
    #[must_use]
    pub const fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }
}

/// Truncate and strip control characters from a message before it reaches
/// the UI. Short processor messages pass through verbatim.
fn sanitize_for_display(message: &str) -> String {
    message
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_ERROR_DISPLAY_LEN)
        .collect()
}

// =============================================================================
// CheckoutOrchestrator
// =============================================================================

/// Owns a [`CheckoutSession`] and drives the two payment paths.
///
/// Constructed per checkout attempt from an explicit config, a cart
/// snapshot, a processor capability, and a completion hook. Clearing the
/// cart after success is the caller's responsibility; the orchestrator only
/// works on its snapshot.
pub struct CheckoutOrchestrator<P: PaymentProcessor> {
    config: CheckoutConfig,
    session: CheckoutSession,
    processor: P,
    on_complete: CompletionHook,
    card_input: Option<CardDetails>,
    qr_reference: Option<String>,
    cancelled: bool,
}

impl<P: PaymentProcessor> CheckoutOrchestrator<P> {
    /// Open a checkout session over the cart's current contents.
    #[must_use]
    pub fn new(
        config: CheckoutConfig,
        cart: &CartStore,
        processor: P,
        on_complete: CompletionHook,
    ) -> Self {
        let session = CheckoutSession::open(cart);
        debug!(session = %session.id, total = %session.total, "opened checkout session");
        Self {
            config,
            session,
            processor,
            on_complete,
            card_input: None,
            qr_reference: None,
            cancelled: false,
        }
    }

    /// The session owned by this orchestrator.
    #[must_use]
    pub const fn session(&self) -> &CheckoutSession {
        &self.session
    }

    /// Whether the session was cancelled by the user.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// The payment reference rendered as a QR code, while one is pending.
    #[must_use]
    pub fn qr_reference(&self) -> Option<&str> {
        self.qr_reference.as_deref()
    }

    /// Select the payment method for the next submission.
    ///
    /// Permitted in `Idle` and `Failed`. Rejected while `Processing`: an
    /// in-flight submission must not change target behavior mid-flight.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::ConcurrentSubmission`] while processing,
    /// [`CheckoutError::CancelledByUser`] / [`CheckoutError::SessionClosed`]
    /// on a discarded or terminal session.
    pub fn select_method(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.ensure_open()?;
        if self.session.status == SubmissionStatus::Processing {
            warn!(session = %self.session.id, "rejected method switch while processing");
            return Err(CheckoutError::ConcurrentSubmission);
        }
        self.session.method = method;
        Ok(())
    }

    /// Stage card input for the card path. Same gating as
    /// [`Self::select_method`].
    ///
    /// # Errors
    ///
    /// See [`Self::select_method`].
    pub fn set_card_details(&mut self, card: CardDetails) -> Result<(), CheckoutError> {
        self.ensure_open()?;
        if self.session.status == SubmissionStatus::Processing {
            return Err(CheckoutError::ConcurrentSubmission);
        }
        self.card_input = Some(card);
        Ok(())
    }

    /// Execute the selected payment path.
    ///
    /// Entry into `Processing` is gated: only `Idle` and `Failed` may
    /// submit, so a session can be retried after failure but never
    /// double-submitted.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::ConcurrentSubmission`] while already processing,
    /// [`CheckoutError::Validation`] before any external call on bad card
    /// input, [`CheckoutError::Processor`] when tokenization fails or times
    /// out, and the discarded/terminal session errors.
    #[instrument(skip(self), fields(session = %self.session.id, method = %self.session.method))]
    pub async fn submit(&mut self) -> Result<(), CheckoutError> {
        self.ensure_open()?;
        if !self.session.status.can_submit() {
            warn!("rejected concurrent submission");
            return Err(CheckoutError::ConcurrentSubmission);
        }

        match self.session.method {
            PaymentMethod::Card => self.submit_card().await,
            PaymentMethod::Qr => self.submit_qr(),
        }
    }

    /// Report the out-of-band QR confirmation.
    ///
    /// Valid only while a QR submission is awaiting confirmation. There is
    /// no programmatic confirmation signal in scope, so the caller relays
    /// whatever channel told it the payment landed.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::Validation`] if no QR payment is pending, plus the
    /// discarded/terminal session errors.
    pub fn confirm_qr_payment(&mut self) -> Result<(), CheckoutError> {
        self.ensure_open()?;
        let pending = self.session.status == SubmissionStatus::Processing
            && self.session.method == PaymentMethod::Qr;
        let Some(reference) = (if pending { self.qr_reference.take() } else { None }) else {
            return Err(CheckoutError::Validation(
                "no QR payment awaiting confirmation".to_string(),
            ));
        };
        info!(session = %self.session.id, "QR payment confirmed");
        self.succeed(PaymentOutcome::Qr(QrConfirmation { reference }));
        Ok(())
    }

    /// Cancel the session.
    ///
    /// Valid from any state except `Succeeded`. Discards staged input and
    /// the pending QR reference; every later operation reports
    /// [`CheckoutError::CancelledByUser`]. An already-sent processor request
    /// is not rolled back, the session just stops reacting to it.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::SessionClosed`] if the session already succeeded.
    pub fn cancel(&mut self) -> Result<(), CheckoutError> {
        if self.session.status == SubmissionStatus::Succeeded {
            return Err(CheckoutError::SessionClosed);
        }
        info!(session = %self.session.id, status = %self.session.status, "checkout cancelled");
        self.cancelled = true;
        self.card_input = None;
        self.qr_reference = None;
        Ok(())
    }

    // =========================================================================
    // Payment paths
    // =========================================================================

    async fn submit_card(&mut self) -> Result<(), CheckoutError> {
        // Validate before issuing any external call so bad input never
        // produces a wasted or ambiguous processor request.
        let Some(card) = self.card_input.as_ref() else {
            return Err(self.fail_validation("card details are required"));
        };
        if let Err(err) = card.validate() {
            return Err(self.fail_validation(&err.to_string()));
        }

        self.session.status = SubmissionStatus::Processing;
        debug!("requesting tokenization");

        let result =
            tokio::time::timeout(self.config.tokenize_timeout, self.processor.tokenize(card))
                .await;

        match result {
            Ok(Ok(token)) => {
                self.succeed(PaymentOutcome::Card(token));
                Ok(())
            }
            Ok(Err(err)) => {
                self.fail(&err.to_string());
                Err(CheckoutError::Processor(err))
            }
            Err(_elapsed) => {
                let err = ProcessorError::Timeout(self.config.tokenize_timeout);
                self.fail(&err.to_string());
                Err(CheckoutError::Processor(err))
            }
        }
    }

    fn submit_qr(&mut self) -> Result<(), CheckoutError> {
        use rand::Rng;

        let suffix: String = rand::rng()
            .sample_iter(rand::distr::Alphanumeric)
            .take(10)
            .map(char::from)
            .collect();
        let reference = format!("qr_{suffix}");

        self.session.status = SubmissionStatus::Processing;
        self.qr_reference = Some(reference);
        info!(session = %self.session.id, "awaiting out-of-band QR confirmation");
        Ok(())
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn ensure_open(&self) -> Result<(), CheckoutError> {
        if self.cancelled {
            return Err(CheckoutError::CancelledByUser);
        }
        if self.session.status == SubmissionStatus::Succeeded {
            return Err(CheckoutError::SessionClosed);
        }
        Ok(())
    }

    fn succeed(&mut self, outcome: PaymentOutcome) {
        self.session.status = SubmissionStatus::Succeeded;
        self.session.last_error = None;
        info!(session = %self.session.id, "checkout succeeded");
        (self.on_complete)(outcome, &self.session);
    }

    fn fail(&mut self, message: &str) {
        self.session.status = SubmissionStatus::Failed;
        self.session.last_error = Some(sanitize_for_display(message));
        warn!(session = %self.session.id, error = %message, "checkout submission failed");
    }

    fn fail_validation(&mut self, message: &str) -> CheckoutError {
        self.fail(message);
        CheckoutError::Validation(message.to_string())
    }
}
