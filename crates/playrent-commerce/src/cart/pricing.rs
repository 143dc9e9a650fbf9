//! Cart pricing calculations.
//!
//! Unit prices are always the product's price after its discount
//! percentage. A sale line costs `unit_price * quantity`; a rental line
//! costs `unit_price * rental_days * quantity`, where the unit price is the
//! discounted price per day.

use crate::cart::CartItem;
use crate::catalog::TransactionType;
use crate::error::CommerceError;
use crate::ids::CartItemId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartPricing {
    /// Subtotal at list prices.
    pub gross_subtotal: Money,
    /// Total amount taken off by product discounts.
    pub discount_total: Money,
    /// Amount payable (gross subtotal minus discounts).
    pub grand_total: Money,
    /// Per-line breakdown.
    pub line_items: Vec<LineItemPricing>,
}

impl CartPricing {
    /// Calculate the savings from discounts.
    pub fn savings(&self) -> Money {
        self.discount_total
    }

    /// Check if any discounts are applied.
    pub fn has_discounts(&self) -> bool {
        self.discount_total.amount_cents > 0
    }

    /// Get discount percentage of the gross subtotal.
    pub fn discount_percentage(&self) -> f64 {
        if self.gross_subtotal.amount_cents == 0 {
            return 0.0;
        }
        (self.discount_total.amount_cents as f64 / self.gross_subtotal.amount_cents as f64)
            * 100.0
    }
}

/// Pricing breakdown for a single cart item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItemPricing {
    /// Cart item ID.
    pub cart_item_id: CartItemId,
    /// Sale or rental.
    pub transaction_type: TransactionType,
    /// List price per unit (per day for rentals).
    pub list_price: Money,
    /// Discounted price per unit (per day for rentals).
    pub unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// Billable days, rentals only.
    pub rental_days: Option<i64>,
    /// Line total at list price.
    pub gross: Money,
    /// Discount on this line.
    pub discount_amount: Money,
    /// Final total for this line.
    pub total: Money,
}

/// Discounted price per unit (per day for rentals).
pub fn unit_price(item: &CartItem) -> Result<Money, CommerceError> {
    item.product.effective_price(item.transaction_type)
}

/// Total for one line.
pub fn line_total(item: &CartItem) -> Result<Money, CommerceError> {
    extend(item, unit_price(item)?)
}

/// Sum of line totals.
pub fn cart_subtotal(items: &[CartItem]) -> Result<Money, CommerceError> {
    let currency = items
        .first()
        .map(|i| i.product.currency())
        .unwrap_or_default();
    items.iter().try_fold(Money::zero(currency), |acc, item| {
        checked_add(&acc, &line_total(item)?)
    })
}

/// Price a single line.
pub fn price_line(item: &CartItem) -> Result<LineItemPricing, CommerceError> {
    let list_price = item
        .product
        .list_price(item.transaction_type)
        .ok_or(CommerceError::MissingPrice(match item.transaction_type {
            TransactionType::Sale => "sale",
            TransactionType::Rent => "rental",
        }))?;
    let unit_price = unit_price(item)?;
    let gross = extend(item, list_price)?;
    let total = extend(item, unit_price)?;
    let discount_amount = gross.try_subtract(&total).ok_or(CommerceError::Overflow)?;

    Ok(LineItemPricing {
        cart_item_id: item.id.clone(),
        transaction_type: item.transaction_type,
        list_price,
        unit_price,
        quantity: item.quantity,
        rental_days: item.rental_days(),
        gross,
        discount_amount,
        total,
    })
}

/// Price a whole cart.
pub fn price_cart(items: &[CartItem]) -> Result<CartPricing, CommerceError> {
    let line_items = items
        .iter()
        .map(price_line)
        .collect::<Result<Vec<_>, _>>()?;
    let currency = line_items
        .first()
        .map(|l| l.total.currency)
        .unwrap_or(Currency::default());

    let mut gross_subtotal = Money::zero(currency);
    let mut discount_total = Money::zero(currency);
    let mut grand_total = Money::zero(currency);
    for line in &line_items {
        gross_subtotal = checked_add(&gross_subtotal, &line.gross)?;
        discount_total = checked_add(&discount_total, &line.discount_amount)?;
        grand_total = checked_add(&grand_total, &line.total)?;
    }

    Ok(CartPricing {
        gross_subtotal,
        discount_total,
        grand_total,
        line_items,
    })
}

/// Multiply a per-unit price out to the line.
fn extend(item: &CartItem, per_unit: Money) -> Result<Money, CommerceError> {
    let units = match item.transaction_type {
        TransactionType::Sale => item.quantity,
        TransactionType::Rent => {
            let days = item.rental_days().ok_or(CommerceError::MissingRentalPeriod)?;
            days.checked_mul(item.quantity).ok_or(CommerceError::Overflow)?
        }
    };
    per_unit.try_multiply(units).ok_or(CommerceError::Overflow)
}

fn checked_add(a: &Money, b: &Money) -> Result<Money, CommerceError> {
    if a.currency != b.currency {
        return Err(CommerceError::CurrencyMismatch {
            expected: a.currency.code().to_string(),
            got: b.currency.code().to_string(),
        });
    }
    a.try_add(b).ok_or(CommerceError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::RentalPeriod;
    use crate::catalog::{Product, TransactionMode};
    use chrono::{TimeZone, Utc};

    fn usd(major: i64) -> Money {
        Money::from_major(major, Currency::USD)
    }

    fn sale_item(price: i64, quantity: i64, discount: u8) -> CartItem {
        let product = Product::new("sale", "Chess", TransactionMode::Sale)
            .with_sale_price(usd(price))
            .with_discount(discount);
        CartItem::new(product, TransactionType::Sale, quantity, None).unwrap()
    }

    fn rent_item(per_day: i64, quantity: i64) -> CartItem {
        let product = Product::new("rent", "Gloomhaven", TransactionMode::Rent)
            .with_rental_price(usd(per_day));
        let period = RentalPeriod::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 4, 0, 0, 0).unwrap(),
        )
        .unwrap();
        CartItem::new(product, TransactionType::Rent, quantity, Some(period)).unwrap()
    }

    #[test]
    fn test_rental_line_total() {
        let item = rent_item(100, 2);
        assert_eq!(item.rental_days(), Some(3));
        assert_eq!(line_total(&item).unwrap(), usd(600));
    }

    #[test]
    fn test_sale_line_total() {
        assert_eq!(line_total(&sale_item(50, 3, 0)).unwrap(), usd(150));
    }

    #[test]
    fn test_discount_applies_to_unit_price() {
        let item = sale_item(40, 2, 25);
        assert_eq!(unit_price(&item).unwrap(), usd(30));
        assert_eq!(line_total(&item).unwrap(), usd(60));
    }

    #[test]
    fn test_subtotal_is_sum_of_lines() {
        let items = vec![sale_item(50, 3, 0), rent_item(100, 2)];
        assert_eq!(cart_subtotal(&items).unwrap(), usd(750));
    }

    #[test]
    fn test_quantity_change_is_local_to_line() {
        let mut items = vec![sale_item(50, 3, 0), rent_item(100, 2)];
        let before = line_total(&items[1]).unwrap();
        items[0].quantity = 7;
        assert_eq!(line_total(&items[1]).unwrap(), before);
    }

    #[test]
    fn test_empty_cart_subtotal() {
        assert!(cart_subtotal(&[]).unwrap().is_zero());
    }

    #[test]
    fn test_price_cart_breakdown() {
        let items = vec![sale_item(40, 2, 25), rent_item(100, 1)];
        let pricing = price_cart(&items).unwrap();

        assert_eq!(pricing.gross_subtotal, usd(380));
        assert_eq!(pricing.discount_total, usd(20));
        assert_eq!(pricing.grand_total, usd(360));
        assert_eq!(pricing.line_items[1].rental_days, Some(3));
        assert!(pricing.has_discounts());
    }

    #[test]
    fn test_currency_mismatch() {
        let euro = Product::new("eu", "Carcassonne", TransactionMode::Sale)
            .with_sale_price(Money::from_major(10, Currency::EUR));
        let items = vec![
            sale_item(50, 1, 0),
            CartItem::new(euro, TransactionType::Sale, 1, None).unwrap(),
        ];
        assert!(matches!(
            cart_subtotal(&items),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let product = Product::new("big", "Gold Edition", TransactionMode::Sale)
            .with_sale_price(Money::new(i64::MAX / 2, Currency::USD));
        let item = CartItem::new(product, TransactionType::Sale, 3, None).unwrap();
        assert_eq!(line_total(&item), Err(CommerceError::Overflow));
    }
}
