//! Domain types and logic for the PlayRent game marketplace.
//!
//! This crate is pure: no I/O, no async. It provides:
//!
//! - **Catalog**: Products with sale and rental pricing, wishlists
//! - **Cart**: Cart mirror, rental windows, the pricing engine
//! - **Orders**: Orders, the status state machine, dashboard analytics
//! - **Search**: Filters, sorting, pagination
//! - **Form**: The multi-step product form and its validation schema
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use playrent_commerce::prelude::*;
//!
//! let product = Product::new("gloomhaven", "Gloomhaven", TransactionMode::Both)
//!     .with_sale_price(Money::from_major(120, Currency::USD))
//!     .with_rental_price(Money::from_major(4, Currency::USD));
//!
//! let period = RentalPeriod::new(
//!     Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2025, 1, 4, 0, 0, 0).unwrap(),
//! )
//! .unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add_item(CartItem::new(product, TransactionType::Rent, 2, Some(period)).unwrap());
//!
//! let pricing = cart.calculate_pricing().unwrap();
//! assert_eq!(pricing.grand_total.display(), "$24.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod user;

pub mod cart;
pub mod catalog;
pub mod form;
pub mod orders;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::user::{Role, UserProfile};

    // Catalog
    pub use crate::catalog::{
        PriceDetails, Product, TransactionMode, TransactionType, UploadedVideos, Wishlist,
    };

    // Cart
    pub use crate::cart::{
        cart_subtotal, days_between, line_total, unit_price, Cart, CartItem, CartPricing,
        LineItemPricing, RentalPeriod,
    };

    // Orders
    pub use crate::orders::{DashboardSummary, Order, OrderLineItem, OrderStatus, PaymentMethod};

    // Search
    pub use crate::search::{CatalogQuery, Filter, Pagination, ProductPage, SearchResults, SortOption};

    // Form
    pub use crate::form::{
        Field, FormMode, FormStep, ProductDraft, ProductForm, ProductPayload, Submission,
        ValidationErrors,
    };
}
