//! Request and response bodies of the store API.

use chrono::{DateTime, Utc};
use playrent_commerce::catalog::TransactionType;
use playrent_commerce::ids::{CartItemId, ProductId};
use playrent_commerce::orders::OrderStatus;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/cart`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_end: Option<DateTime<Utc>>,
}

/// Body of `PATCH /api/cart`. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    pub cart_item_id: CartItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_end: Option<DateTime<Utc>>,
}

impl UpdateCartItemRequest {
    /// An update that changes nothing yet.
    pub fn new(cart_item_id: CartItemId) -> Self {
        Self {
            cart_item_id,
            quantity: None,
            rental_start: None,
            rental_end: None,
        }
    }

    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.rental_start.is_none() && self.rental_end.is_none()
    }
}

/// Body of `DELETE /api/cart`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartItemRequest {
    pub cart_item_id: CartItemId,
}

/// Body of `POST /api/wishlist`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistToggleRequest {
    pub product_id: ProductId,
}

/// Reply to `POST /api/wishlist`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistToggle {
    pub product_id: ProductId,
    pub in_wishlist: bool,
}

/// Body of `PATCH /api/orders/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}
