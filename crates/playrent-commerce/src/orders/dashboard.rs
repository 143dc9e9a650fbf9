//! Admin dashboard analytics.

use crate::catalog::{Product, TransactionMode};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use crate::orders::{Order, OrderStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Units sold for one product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_id: ProductId,
    pub product_name: String,
    pub units: i64,
}

/// Aggregates shown on the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Revenue from paid and delivered orders.
    pub revenue: Money,
    /// Number of orders.
    pub order_count: usize,
    /// Orders per status, in status order.
    pub orders_by_status: Vec<(OrderStatus, usize)>,
    /// Revenue divided by the number of revenue orders.
    pub average_order_value: Money,
    /// Best sellers by units across non-cancelled orders.
    pub top_products: Vec<ProductSales>,
    /// Products per transaction mode.
    pub products_by_mode: Vec<(TransactionMode, usize)>,
    /// Products with a discount.
    pub discounted_products: usize,
}

impl DashboardSummary {
    /// Compute the summary.
    pub fn compute(
        orders: &[Order],
        products: &[Product],
        top_n: usize,
    ) -> Result<Self, CommerceError> {
        let currency = orders
            .first()
            .map(|o| o.total_price.currency)
            .unwrap_or(Currency::default());

        let mut revenue = Money::zero(currency);
        let mut revenue_orders = 0_i64;
        for order in orders.iter().filter(|o| o.status.is_revenue()) {
            if order.total_price.currency != currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: currency.code().to_string(),
                    got: order.total_price.currency.code().to_string(),
                });
            }
            revenue = revenue
                .try_add(&order.total_price)
                .ok_or(CommerceError::Overflow)?;
            revenue_orders += 1;
        }
        let average_order_value = if revenue_orders == 0 {
            Money::zero(currency)
        } else {
            Money::new(revenue.amount_cents / revenue_orders, currency)
        };

        let orders_by_status = OrderStatus::ALL
            .into_iter()
            .map(|status| (status, orders.iter().filter(|o| o.status == status).count()))
            .collect();

        let mut units: HashMap<&ProductId, (&str, i64)> = HashMap::new();
        for item in orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .flat_map(|o| &o.line_items)
        {
            let entry = units
                .entry(&item.product_id)
                .or_insert((item.product_name.as_str(), 0));
            entry.1 = entry.1.saturating_add(item.quantity);
        }
        let mut top_products: Vec<ProductSales> = units
            .into_iter()
            .map(|(id, (name, units))| ProductSales {
                product_id: id.clone(),
                product_name: name.to_string(),
                units,
            })
            .collect();
        top_products.sort_by(|a, b| {
            b.units
                .cmp(&a.units)
                .then_with(|| a.product_name.cmp(&b.product_name))
        });
        top_products.truncate(top_n);

        let products_by_mode = [TransactionMode::Sale, TransactionMode::Rent, TransactionMode::Both]
            .into_iter()
            .map(|mode| {
                (
                    mode,
                    products.iter().filter(|p| p.transaction_mode == mode).count(),
                )
            })
            .collect();

        Ok(Self {
            revenue,
            order_count: orders.len(),
            orders_by_status,
            average_order_value,
            top_products,
            products_by_mode,
            discounted_products: products.iter().filter(|p| p.is_discounted()).count(),
        })
    }

    /// Count for one status.
    pub fn count_for(&self, status: OrderStatus) -> usize {
        self.orders_by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}
