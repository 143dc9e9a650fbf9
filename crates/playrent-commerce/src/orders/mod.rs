//! Orders module.
//!
//! Contains orders, the order status state machine and dashboard analytics.

mod dashboard;
mod order;

pub use dashboard::{DashboardSummary, ProductSales};
pub use order::{Order, OrderLineItem, OrderStatus, PaymentMethod};
