//! Cart and cart item types.

use crate::cart::pricing::{self, CartPricing};
use crate::cart::RentalPeriod;
use crate::catalog::{Product, TransactionType};
use crate::error::CommerceError;
use crate::ids::{CartItemId, ProductId};
use crate::money::{Currency, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// The client-side mirror of the remote cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Items in the cart, in insertion order.
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart from server items.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Append an item. Returns its ID.
    pub fn add_item(&mut self, item: CartItem) -> CartItemId {
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    /// Insert an item at a position, clamped to the end of the cart.
    pub fn insert_item(&mut self, index: usize, item: CartItem) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    /// Replace an item in place, possibly under a new ID.
    pub fn replace_item(&mut self, id: &CartItemId, item: CartItem) -> bool {
        match self.items.iter_mut().find(|i| &i.id == id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Set an item's quantity.
    ///
    /// Quantities below one are ignored and leave the cart unchanged;
    /// returns whether the item was updated.
    pub fn set_quantity(&mut self, id: &CartItemId, quantity: i64) -> bool {
        if !(1..=MAX_QUANTITY_PER_ITEM).contains(&quantity) {
            return false;
        }
        match self.get_item_mut(id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Move a rental's start date, pulling the end along if needed.
    pub fn set_rental_start(
        &mut self,
        id: &CartItemId,
        start: DateTime<Utc>,
    ) -> Result<(), CommerceError> {
        let item = self
            .get_item_mut(id)
            .ok_or_else(|| CommerceError::ItemNotInCart(id.to_string()))?;
        let period = item.rental_period().ok_or(CommerceError::NotARental)?;
        item.set_rental_period(period.with_start(start));
        Ok(())
    }

    /// Move a rental's end date, pulling the start back if needed.
    pub fn set_rental_end(
        &mut self,
        id: &CartItemId,
        end: DateTime<Utc>,
    ) -> Result<(), CommerceError> {
        let item = self
            .get_item_mut(id)
            .ok_or_else(|| CommerceError::ItemNotInCart(id.to_string()))?;
        let period = item.rental_period().ok_or(CommerceError::NotARental)?;
        item.set_rental_period(period.with_end(end));
        Ok(())
    }

    /// Remove an item, returning it with its former position.
    pub fn remove_item(&mut self, id: &CartItemId) -> Option<(usize, CartItem)> {
        let index = self.position(id)?;
        Some((index, self.items.remove(index)))
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of unique items.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of an item.
    pub fn position(&self, id: &CartItemId) -> Option<usize> {
        self.items.iter().position(|i| &i.id == id)
    }

    /// Get an item by ID.
    pub fn get_item(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Get a mutable item by ID.
    pub fn get_item_mut(&mut self, id: &CartItemId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| &i.id == id)
    }

    /// Items for a product, across transaction types.
    pub fn items_for_product<'a>(
        &'a self,
        product_id: &'a ProductId,
    ) -> impl Iterator<Item = &'a CartItem> + 'a {
        self.items.iter().filter(move |i| &i.product.id == product_id)
    }

    /// Currency of the cart, taken from the first item.
    pub fn currency(&self) -> Currency {
        self.items
            .first()
            .map(|i| i.product.currency())
            .unwrap_or_default()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        pricing::cart_subtotal(&self.items)
    }

    /// Calculate the full pricing breakdown.
    pub fn calculate_pricing(&self) -> Result<CartPricing, CommerceError> {
        pricing::price_cart(&self.items)
    }
}

/// One line of the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Cart item identifier.
    pub id: CartItemId,
    /// Product snapshot.
    pub product: Product,
    /// Sale or rental.
    pub transaction_type: TransactionType,
    /// Quantity, at least one.
    pub quantity: i64,
    /// Rental start, rentals only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_start: Option<DateTime<Utc>>,
    /// Rental end, rentals only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_end: Option<DateTime<Utc>>,
}

impl CartItem {
    /// Build a validated cart item under a placeholder ID.
    ///
    /// Returns an error if:
    /// - quantity is below one or above MAX_QUANTITY_PER_ITEM
    /// - the product does not support the transaction type
    /// - a rental has no window, or a sale has one
    /// - the rental length is outside the product's limits
    pub fn new(
        product: Product,
        transaction_type: TransactionType,
        quantity: i64,
        rental: Option<RentalPeriod>,
    ) -> Result<Self, CommerceError> {
        validate_quantity(quantity)?;
        if !product.supports(transaction_type) {
            return Err(CommerceError::UnsupportedTransaction {
                product_id: product.id.to_string(),
                transaction: transaction_type.as_str(),
            });
        }
        product.effective_price(transaction_type)?;

        let rental = match (transaction_type, rental) {
            (TransactionType::Rent, Some(period)) => {
                product.check_rental_days(period.days())?;
                Some(period)
            }
            (TransactionType::Rent, None) => return Err(CommerceError::MissingRentalPeriod),
            (TransactionType::Sale, Some(_)) => return Err(CommerceError::NotARental),
            (TransactionType::Sale, None) => None,
        };

        Ok(Self {
            id: CartItemId::placeholder(),
            product,
            transaction_type,
            quantity,
            rental_start: rental.map(|p| p.start),
            rental_end: rental.map(|p| p.end),
        })
    }

    /// Set the ID.
    pub fn with_id(mut self, id: impl Into<CartItemId>) -> Self {
        self.id = id.into();
        self
    }

    /// Whether this is a rental line.
    pub fn is_rental(&self) -> bool {
        self.transaction_type == TransactionType::Rent
    }

    /// The rental window, when both ends are set.
    pub fn rental_period(&self) -> Option<RentalPeriod> {
        match (self.rental_start, self.rental_end) {
            (Some(start), Some(end)) if self.is_rental() => Some(RentalPeriod { start, end }),
            _ => None,
        }
    }

    /// Billable rental days.
    pub fn rental_days(&self) -> Option<i64> {
        self.rental_period().map(|p| p.days())
    }

    pub(crate) fn set_rental_period(&mut self, period: RentalPeriod) {
        self.rental_start = Some(period.start);
        self.rental_end = Some(period.end);
    }
}

/// Check a requested quantity.
pub fn validate_quantity(quantity: i64) -> Result<(), CommerceError> {
    if quantity < 1 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TransactionMode;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap()
    }

    fn board_game() -> Product {
        Product::new("p1", "Catan", TransactionMode::Both)
            .with_sale_price(Money::from_major(50, Currency::USD))
            .with_rental_price(Money::from_major(100, Currency::USD))
            .with_rental_limits(1, 30)
    }

    fn rental(start: u32, end: u32) -> CartItem {
        let period = RentalPeriod::new(day(start), day(end)).unwrap();
        CartItem::new(board_game(), TransactionType::Rent, 1, Some(period))
            .unwrap()
            .with_id("rent-1")
    }

    #[test]
    fn test_new_item_gets_placeholder_id() {
        let item = CartItem::new(board_game(), TransactionType::Sale, 1, None).unwrap();
        assert!(item.id.is_placeholder());
    }

    #[test]
    fn test_new_item_rejects_bad_quantity() {
        assert_eq!(
            CartItem::new(board_game(), TransactionType::Sale, 0, None),
            Err(CommerceError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_new_item_rejects_unsupported_type() {
        let product = Product::new("p2", "Chess", TransactionMode::Sale)
            .with_sale_price(Money::from_major(10, Currency::USD));
        let period = RentalPeriod::new(day(1), day(2)).unwrap();
        let err = CartItem::new(product, TransactionType::Rent, 1, Some(period)).unwrap_err();
        assert!(matches!(err, CommerceError::UnsupportedTransaction { .. }));
    }

    #[test]
    fn test_new_item_requires_rental_window() {
        assert_eq!(
            CartItem::new(board_game(), TransactionType::Rent, 1, None),
            Err(CommerceError::MissingRentalPeriod)
        );
    }

    #[test]
    fn test_new_item_rejects_window_outside_limits() {
        let product = board_game().with_rental_limits(3, 5);
        let period = RentalPeriod::new(day(1), day(2)).unwrap();
        let err = CartItem::new(product, TransactionType::Rent, 1, Some(period)).unwrap_err();
        assert_eq!(
            err,
            CommerceError::RentalPeriodOutOfRange { days: 1, min: 3, max: 5 }
        );
    }

    #[test]
    fn test_set_quantity_ignores_non_positive() {
        let mut cart = Cart::new();
        let id = cart.add_item(rental(1, 4));

        assert!(!cart.set_quantity(&id, 0));
        assert!(!cart.set_quantity(&id, -1));
        assert_eq!(cart.get_item(&id).unwrap().quantity, 1);

        assert!(cart.set_quantity(&id, 3));
        assert_eq!(cart.get_item(&id).unwrap().quantity, 3);
    }

    #[test]
    fn test_set_rental_start_after_end_pulls_end() {
        let mut cart = Cart::new();
        let id = cart.add_item(rental(1, 3));

        cart.set_rental_start(&id, day(5)).unwrap();
        let item = cart.get_item(&id).unwrap();
        assert_eq!(item.rental_start, Some(day(5)));
        assert_eq!(item.rental_end, Some(day(5)));
    }

    #[test]
    fn test_set_rental_end_before_start_pulls_start() {
        let mut cart = Cart::new();
        let id = cart.add_item(rental(3, 6));

        cart.set_rental_end(&id, day(2)).unwrap();
        let item = cart.get_item(&id).unwrap();
        assert_eq!(item.rental_start, Some(day(2)));
        assert_eq!(item.rental_end, Some(day(2)));
    }

    #[test]
    fn test_set_rental_dates_rejected_on_sale() {
        let mut cart = Cart::new();
        let id = cart.add_item(
            CartItem::new(board_game(), TransactionType::Sale, 1, None)
                .unwrap()
                .with_id("sale-1"),
        );
        assert_eq!(
            cart.set_rental_start(&id, day(2)),
            Err(CommerceError::NotARental)
        );
    }

    #[test]
    fn test_remove_and_reinsert() {
        let mut cart = Cart::new();
        cart.add_item(rental(1, 2).with_id("a"));
        let b = cart.add_item(rental(1, 2).with_id("b"));
        cart.add_item(rental(1, 2).with_id("c"));

        let (index, item) = cart.remove_item(&b).unwrap();
        assert_eq!(index, 1);
        assert_eq!(cart.unique_item_count(), 2);

        cart.insert_item(index, item);
        assert_eq!(cart.position(&b), Some(1));
        assert!(cart.remove_item(&CartItemId::new("missing")).is_none());
    }

    #[test]
    fn test_item_wire_format() {
        let item = rental(1, 4);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["transactionType"], "RENT");
        assert!(json.get("rentalStart").is_some());
        let back: CartItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }
}
