//! Product types for the game catalog.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a product may be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionMode {
    /// Outright purchase only.
    #[default]
    Sale,
    /// Time-boxed rental only.
    Rent,
    /// Either.
    Both,
}

impl TransactionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionMode::Sale => "SALE",
            TransactionMode::Rent => "RENT",
            TransactionMode::Both => "BOTH",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SALE" => Some(TransactionMode::Sale),
            "RENT" => Some(TransactionMode::Rent),
            "BOTH" => Some(TransactionMode::Both),
            _ => None,
        }
    }

    /// Check whether a line of the given type can be created for this mode.
    pub fn supports(&self, transaction: TransactionType) -> bool {
        matches!(
            (self, transaction),
            (TransactionMode::Both, _)
                | (TransactionMode::Sale, TransactionType::Sale)
                | (TransactionMode::Rent, TransactionType::Rent)
        )
    }

    /// Whether sale fields apply.
    pub fn includes_sale(&self) -> bool {
        self.supports(TransactionType::Sale)
    }

    /// Whether rental fields apply.
    pub fn includes_rent(&self) -> bool {
        self.supports(TransactionType::Rent)
    }
}

impl fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction type of a single cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Sale,
    Rent,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "SALE",
            TransactionType::Rent => "RENT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SALE" => Some(TransactionType::Sale),
            "RENT" => Some(TransactionType::Rent),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prices and rental limits of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PriceDetails {
    /// Outright sale price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Money>,
    /// Rental price per day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_price_per_day: Option<Money>,
    /// Shortest rental in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_rental_period: Option<i64>,
    /// Longest rental in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_rental_period: Option<i64>,
}

/// Video links shown on the product page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UploadedVideos {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_card: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_play: Option<String>,
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Cover image URL.
    #[serde(default)]
    pub cover_image: String,
    /// Game type tag (e.g. "strategy", "party").
    #[serde(default)]
    pub game_type: String,
    /// Age restriction tag (e.g. "12+").
    #[serde(default)]
    pub age_restriction: String,
    /// Discount percentage, 0-100.
    #[serde(default)]
    pub discount_percentage: u8,
    /// Supported transaction modes.
    #[serde(rename = "productType", default)]
    pub transaction_mode: TransactionMode,
    /// Prices and rental limits.
    #[serde(default)]
    pub price_details: PriceDetails,
    /// Units available for sale. Not checked against cart quantities.
    #[serde(default)]
    pub available_for_sale: i64,
    /// Units available for rent. Not checked against cart quantities.
    #[serde(default)]
    pub available_for_rent: i64,
    /// Video links.
    #[serde(default)]
    pub uploaded_video: UploadedVideos,
    /// Creation time.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product with empty pricing.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, mode: TransactionMode) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            cover_image: String::new(),
            game_type: String::new(),
            age_restriction: String::new(),
            discount_percentage: 0,
            transaction_mode: mode,
            price_details: PriceDetails::default(),
            available_for_sale: 0,
            available_for_rent: 0,
            uploaded_video: UploadedVideos::default(),
            created_at: Utc::now(),
        }
    }

    /// Set the sale price.
    pub fn with_sale_price(mut self, price: Money) -> Self {
        self.price_details.sale_price = Some(price);
        self
    }

    /// Set the rental price per day.
    pub fn with_rental_price(mut self, per_day: Money) -> Self {
        self.price_details.rental_price_per_day = Some(per_day);
        self
    }

    /// Set the rental period limits in days.
    pub fn with_rental_limits(mut self, min_days: i64, max_days: i64) -> Self {
        self.price_details.minimum_rental_period = Some(min_days);
        self.price_details.maximum_rental_period = Some(max_days);
        self
    }

    /// Set the discount percentage (clamped to 100).
    pub fn with_discount(mut self, percent: u8) -> Self {
        self.discount_percentage = percent.min(100);
        self
    }

    /// Check if a line of the given type can be created.
    pub fn supports(&self, transaction: TransactionType) -> bool {
        self.transaction_mode.supports(transaction)
    }

    /// Check if a discount applies.
    pub fn is_discounted(&self) -> bool {
        self.discount_percentage > 0
    }

    /// Undiscounted price for the transaction type (per unit, per day for rentals).
    pub fn list_price(&self, transaction: TransactionType) -> Option<Money> {
        match transaction {
            TransactionType::Sale => self.price_details.sale_price,
            TransactionType::Rent => self.price_details.rental_price_per_day,
        }
    }

    /// Price after the product discount.
    pub fn effective_price(&self, transaction: TransactionType) -> Result<Money, CommerceError> {
        self.list_price(transaction)
            .map(|price| price.discounted(self.discount_percentage))
            .ok_or(CommerceError::MissingPrice(match transaction {
                TransactionType::Sale => "sale",
                TransactionType::Rent => "rental",
            }))
    }

    /// Lowest price shown on listing cards, used for price sorting.
    pub fn display_price(&self) -> Option<Money> {
        let sale = self
            .transaction_mode
            .includes_sale()
            .then(|| self.effective_price(TransactionType::Sale).ok())
            .flatten();
        let rent = self
            .transaction_mode
            .includes_rent()
            .then(|| self.effective_price(TransactionType::Rent).ok())
            .flatten();
        match (sale, rent) {
            (Some(s), Some(r)) => Some(if r.amount_cents < s.amount_cents { r } else { s }),
            (s, r) => s.or(r),
        }
    }

    /// Currency the product is priced in.
    pub fn currency(&self) -> Currency {
        self.price_details
            .sale_price
            .or(self.price_details.rental_price_per_day)
            .map(|m| m.currency)
            .unwrap_or_default()
    }

    /// Rental limits in days; a missing bound is open.
    pub fn rental_limits(&self) -> (i64, i64) {
        (
            self.price_details.minimum_rental_period.unwrap_or(1),
            self.price_details.maximum_rental_period.unwrap_or(i64::MAX),
        )
    }

    /// Check a rental length against the product's limits.
    pub fn check_rental_days(&self, days: i64) -> Result<(), CommerceError> {
        let (min, max) = self.rental_limits();
        if days < min || days > max {
            return Err(CommerceError::RentalPeriodOutOfRange { days, min, max });
        }
        Ok(())
    }
}
