//! Commerce error types.

use thiserror::Error;

use crate::form::ValidationErrors;

/// Errors that can occur in storefront domain operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// The product cannot be sold or rented the requested way.
    #[error("Product {product_id} is not available for {transaction}")]
    UnsupportedTransaction {
        product_id: String,
        transaction: &'static str,
    },

    /// A rental line without a rental window.
    #[error("Rental dates are required for rented items")]
    MissingRentalPeriod,

    /// Rental dates sent for a sale line.
    #[error("Rental dates only apply to rented items")]
    NotARental,

    /// Rental end before rental start.
    #[error("Rental end must not be before rental start")]
    InvalidRentalPeriod,

    /// Rental length outside the product's allowed range.
    #[error("Rental of {days} day(s) is outside the allowed range {min}-{max}")]
    RentalPeriodOutOfRange { days: i64, min: i64, max: i64 },

    /// The product has no price for the requested transaction.
    #[error("No {0} price configured")]
    MissingPrice(&'static str),

    /// Invalid order status transition.
    #[error("Invalid order transition from {from} to {to}")]
    InvalidOrderTransition { from: String, to: String },

    /// Invalid form step transition.
    #[error("Invalid step transition from {from} to {to}")]
    InvalidStepTransition { from: String, to: String },

    /// Form validation failed.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}

impl From<ValidationErrors> for CommerceError {
    fn from(errors: ValidationErrors) -> Self {
        CommerceError::Validation(errors)
    }
}
