//! Order types and the status state machine.

use crate::catalog::TransactionType;
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId, UserId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status.
///
/// Orders move forward along `Pending -> Processing -> Paid -> Delivered`.
/// Anything not yet delivered can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Payment received.
    Paid,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    /// All statuses in display order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Paid,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Paid => "paid",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Paid => "Paid",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Check if order can be cancelled.
    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether the order counts towards revenue.
    pub fn is_revenue(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Delivered)
    }

    /// The next status along the happy path.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Paid),
            OrderStatus::Paid => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Check whether moving to `to` is allowed. Staying put is always allowed.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        *self == to
            || self.next() == Some(to)
            || (to == OrderStatus::Cancelled && self.can_cancel())
    }

    /// Validate a transition. Returns whether the status actually changes.
    pub fn transition(&self, to: OrderStatus) -> Result<bool, CommerceError> {
        if !self.can_transition_to(to) {
            return Err(CommerceError::InvalidOrderTransition {
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        Ok(*self != to)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    Card,
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::CashOnDelivery => "Cash on delivery",
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Purchasing user.
    pub user_id: UserId,
    /// Items in the order.
    #[serde(default)]
    pub line_items: Vec<OrderLineItem>,
    /// Total charged.
    pub total_price: Money,
    /// Payment method.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Order status.
    #[serde(default)]
    pub status: OrderStatus,
    /// Creation time.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.line_items.iter().map(|i| i.quantity).sum()
    }

    /// Check if order is paid.
    pub fn is_paid(&self) -> bool {
        self.status.is_revenue()
    }

    /// Move to a new status. Returns whether the status changed.
    pub fn set_status(&mut self, status: OrderStatus) -> Result<bool, CommerceError> {
        let changed = self.status.transition(status)?;
        self.status = status;
        Ok(changed)
    }

    /// Cancel the order.
    pub fn cancel(&mut self) -> Result<bool, CommerceError> {
        self.set_status(OrderStatus::Cancelled)
    }
}

/// A line item in an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name at time of order.
    pub product_name: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Unit price at time of order.
    pub unit_price: Money,
    /// Sale or rental, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: OrderId::new("ord-1"),
            user_id: UserId::new("user-1"),
            line_items: vec![OrderLineItem {
                product_id: ProductId::new("p1"),
                product_name: "Catan".to_string(),
                quantity: 2,
                unit_price: Money::from_major(50, Currency::USD),
                transaction_type: Some(TransactionType::Sale),
            }],
            total_price: Money::from_major(100, Currency::USD),
            payment_method: PaymentMethod::Card,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_happy_path() {
        let mut order = order(OrderStatus::Pending);
        assert!(order.set_status(OrderStatus::Processing).unwrap());
        assert!(order.set_status(OrderStatus::Paid).unwrap());
        assert!(order.set_status(OrderStatus::Delivered).unwrap());
        assert!(order.status.is_terminal());
    }

    #[test]
    fn test_skipping_forward_is_rejected() {
        let mut order = order(OrderStatus::Pending);
        assert!(matches!(
            order.set_status(OrderStatus::Delivered),
            Err(CommerceError::InvalidOrderTransition { .. })
        ));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_moving_backwards_is_rejected() {
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Processing));
    }

    #[test]
    fn test_cancel_rules() {
        assert!(order(OrderStatus::Paid).cancel().unwrap());
        assert!(order(OrderStatus::Delivered).cancel().is_err());
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_same_status_is_noop() {
        let mut order = order(OrderStatus::Paid);
        assert!(!order.set_status(OrderStatus::Paid).unwrap());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(OrderStatus::from_str("PAID"), Some(OrderStatus::Paid));
        assert_eq!(OrderStatus::from_str("shipped"), None);
    }

    #[test]
    fn test_item_count() {
        assert_eq!(order(OrderStatus::Pending).item_count(), 2);
    }
}
