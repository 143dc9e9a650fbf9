//! Storefront error types.

use playrent_cache::CacheError;
use playrent_commerce::ids::OrderId;
use playrent_commerce::CommerceError;
use playrent_data::{ErrorClass, FetchError};
use thiserror::Error;

/// Errors surfaced by the storefront flows.
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// Rejected by local domain rules; nothing was sent.
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// The remote call failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Local state could not be read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),
}

impl StorefrontError {
    /// Classification of a remote failure.
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            Self::Fetch(e) => Some(ErrorClass::of(e)),
            _ => None,
        }
    }
}
