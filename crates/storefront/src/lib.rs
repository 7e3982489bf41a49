//! Whizyre Storefront library.
//!
//! This crate provides the cart-and-checkout core as a library, allowing it
//! to be tested and embedded in whatever surface renders the storefront.
//!
//! # Architecture
//!
//! - [`catalog`] - Static product catalog loaded once at startup
//! - [`cart`] - Ordered cart lines and the derived total
//! - [`checkout`] - The branching submission state machine over card and QR
//!   payment paths
//! - [`payments`] - The payment processor capability and its concrete
//!   Stripe-backed implementation
//! - [`config`] - Explicit configuration, no ambient globals
//!
//! Presentation (components, layout, the promotional banner) and settlement
//! are external collaborators and live elsewhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod payments;
