//! Unified error handling for the storefront core.
//!
//! Embedding surfaces work with one error type; everything here converts
//! into `StorefrontError` via `#[from]`. No failure in this crate is fatal
//! to the overall process: checkout failures are recovered at the session
//! level, and the rest surface at startup.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;

/// Top-level error type for the storefront core.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration loading or validation failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog loading or lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A checkout operation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
