//! End-to-end checkout journeys: catalog -> cart -> checkout -> payment.
//!
//! Exercises the full flow with the scripted in-memory processor, covering
//! both payment paths and the user-visible failure and cancellation
//! contracts.

#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;
use whizyre_core::{PaymentMethod, ProductId, SubmissionStatus};
use whizyre_integration_tests::{
    RecordingProcessor, capture_hook, init_tracing, sample_catalog, valid_card,
};
use whizyre_storefront::cart::CartStore;
use whizyre_storefront::checkout::{
    CheckoutConfig, CheckoutError, CheckoutOrchestrator, PaymentOutcome,
};
use whizyre_storefront::payments::{PaymentToken, ProcessorError};

fn stocked_cart() -> CartStore {
    let catalog = sample_catalog();
    let mut cart = CartStore::new();
    cart.add_from_catalog(&catalog, ProductId::new(1)).unwrap();
    cart.add_from_catalog(&catalog, ProductId::new(2)).unwrap();
    cart
}

// =============================================================================
// Card Path
// =============================================================================

#[tokio::test]
async fn test_card_purchase_end_to_end() {
    init_tracing();
    let mut cart = stocked_cart();
    assert_eq!(cart.total().amount(), dec!(29.98));
    assert_eq!(cart.item_count(), 2);

    let processor = RecordingProcessor::scripted([Ok(PaymentToken::new("tok_123"))]);
    let (hook, outcomes) = capture_hook();
    let mut checkout =
        CheckoutOrchestrator::new(CheckoutConfig::default(), &cart, processor.clone(), hook);

    checkout.set_card_details(valid_card()).unwrap();
    checkout.submit().await.unwrap();

    assert_eq!(checkout.session().status(), SubmissionStatus::Succeeded);
    assert_eq!(processor.call_count(), 1);
    assert_eq!(
        *outcomes.lock().unwrap(),
        vec![PaymentOutcome::Card(PaymentToken::new("tok_123"))]
    );

    // Clearing on success is the caller's job, not the orchestrator's
    cart.clear();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_declined_card_then_successful_retry() {
    init_tracing();
    let cart = stocked_cart();
    let processor = RecordingProcessor::scripted([
        Err(ProcessorError::Declined("card declined".to_string())),
        Ok(PaymentToken::new("tok_second_try")),
    ]);
    let (hook, outcomes) = capture_hook();
    let mut checkout =
        CheckoutOrchestrator::new(CheckoutConfig::default(), &cart, processor.clone(), hook);
    checkout.set_card_details(valid_card()).unwrap();

    // First attempt fails with the processor's message shown verbatim
    assert!(checkout.submit().await.is_err());
    assert_eq!(checkout.session().status(), SubmissionStatus::Failed);
    assert_eq!(checkout.session().last_error(), Some("card declined"));
    assert!(outcomes.lock().unwrap().is_empty());

    // The user resubmits from Failed without reopening checkout
    checkout.submit().await.unwrap();
    assert_eq!(checkout.session().status(), SubmissionStatus::Succeeded);
    assert_eq!(processor.call_count(), 2);
    assert_eq!(outcomes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_card_input_never_reaches_processor() {
    init_tracing();
    let cart = stocked_cart();
    let processor = RecordingProcessor::default();
    let (hook, _) = capture_hook();
    let mut checkout =
        CheckoutOrchestrator::new(CheckoutConfig::default(), &cart, processor.clone(), hook);

    let err = checkout.submit().await.unwrap_err();
    assert!(matches!(err, CheckoutError::Validation(_)));
    assert_eq!(processor.call_count(), 0);

    // Fixing the input from Failed recovers the session
    checkout.set_card_details(valid_card()).unwrap();
    assert_eq!(checkout.session().status(), SubmissionStatus::Failed);
}

// =============================================================================
// QR Path
// =============================================================================

#[tokio::test]
async fn test_qr_purchase_end_to_end() {
    init_tracing();
    let cart = stocked_cart();
    let processor = RecordingProcessor::default();
    let (hook, outcomes) = capture_hook();
    let mut checkout =
        CheckoutOrchestrator::new(CheckoutConfig::default(), &cart, processor.clone(), hook);

    checkout.select_method(PaymentMethod::Qr).unwrap();
    checkout.submit().await.unwrap();

    // The session parks awaiting the out-of-band signal; nothing resolves
    // it except the caller
    assert_eq!(checkout.session().status(), SubmissionStatus::Processing);
    let reference = checkout.qr_reference().unwrap().to_string();

    checkout.confirm_qr_payment().unwrap();
    assert_eq!(checkout.session().status(), SubmissionStatus::Succeeded);
    assert_eq!(processor.call_count(), 0);
    assert_eq!(
        *outcomes.lock().unwrap(),
        vec![PaymentOutcome::Qr(
            whizyre_storefront::checkout::QrConfirmation { reference }
        )]
    );
}

#[tokio::test]
async fn test_qr_wait_rejects_double_submit_and_method_switch() {
    init_tracing();
    let cart = stocked_cart();
    let (hook, _) = capture_hook();
    let mut checkout = CheckoutOrchestrator::new(
        CheckoutConfig::default(),
        &cart,
        RecordingProcessor::default(),
        hook,
    );
    checkout.select_method(PaymentMethod::Qr).unwrap();
    checkout.submit().await.unwrap();

    assert!(matches!(
        checkout.submit().await.unwrap_err(),
        CheckoutError::ConcurrentSubmission
    ));
    assert!(matches!(
        checkout.select_method(PaymentMethod::Card).unwrap_err(),
        CheckoutError::ConcurrentSubmission
    ));
    assert_eq!(checkout.session().method(), PaymentMethod::Qr);
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn test_cancel_mid_qr_wait_abandons_checkout() {
    init_tracing();
    let mut cart = stocked_cart();
    let (hook, outcomes) = capture_hook();
    let mut checkout = CheckoutOrchestrator::new(
        CheckoutConfig::default(),
        &cart,
        RecordingProcessor::default(),
        hook,
    );
    checkout.select_method(PaymentMethod::Qr).unwrap();
    checkout.submit().await.unwrap();

    checkout.cancel().unwrap();
    assert!(checkout.is_cancelled());
    assert!(matches!(
        checkout.confirm_qr_payment().unwrap_err(),
        CheckoutError::CancelledByUser
    ));
    assert!(outcomes.lock().unwrap().is_empty());

    // The cart survives the discarded session untouched
    assert_eq!(cart.item_count(), 2);
    cart.add_from_catalog(&sample_catalog(), ProductId::new(3))
        .unwrap();
    assert_eq!(cart.item_count(), 3);
}
