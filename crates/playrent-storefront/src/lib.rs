//! Stateful client flows for the PlayRent storefront and admin area.
//!
//! Everything hangs off an [`AppState`]: the API client, the query cache,
//! the persisted session and draft slices, and a [`Notifier`] that shows
//! messages to the user. The flows borrow it through an `Arc`:
//!
//! - [`CartStore`]: optimistic cart with rollback and per-item ordering
//! - [`ProductEditor`]: the multi-step product form and its submit
//! - [`CatalogBrowser`], [`WishlistService`], [`AdminService`]
//!
//! # Example
//!
//! ```rust,ignore
//! use playrent_storefront::prelude::*;
//!
//! let state = Arc::new(AppState::new(client, Cache::open_dir(".playrent")?, notifier));
//! let cart = CartStore::new(state.clone());
//! cart.load().await?;
//!
//! let outcome = cart
//!     .add_to_cart(product, TransactionType::Sale, 1, None, None)
//!     .await;
//! if !outcome.is_applied() {
//!     // the notifier already told the user what happened
//! }
//! ```

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod editor;
mod error;
pub mod notify;
pub mod state;
pub mod wishlist;

pub use admin::AdminService;
pub use cart::{CartItemUpdate, CartStore, SyncOutcome};
pub use catalog::CatalogBrowser;
pub use editor::ProductEditor;
pub use error::StorefrontError;
pub use notify::{ChannelNotifier, Level, Notification, Notifier, RecordingNotifier};
pub use state::{AppState, DraftState, SessionState, Settings};
pub use wishlist::WishlistService;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AdminService, AppState, CartItemUpdate, CartStore, CatalogBrowser, Notification,
        Notifier, ProductEditor, StorefrontError, SyncOutcome, WishlistService,
    };
}
