//! Product catalog module.
//!
//! Contains the game product record and wishlist membership.

mod product;
mod wishlist;

pub use product::{PriceDetails, Product, TransactionMode, TransactionType, UploadedVideos};
pub use wishlist::Wishlist;
