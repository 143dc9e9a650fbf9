//! Catalog filters.

use crate::catalog::{Product, TransactionType};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A filter applied to an in-memory product list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    /// Case-insensitive match on name or description.
    Text(String),
    /// Game type tag, case-insensitive.
    GameType(String),
    /// Age restriction tag, case-insensitive.
    AgeRestriction(String),
    /// Products that can be bought or rented this way.
    Transaction(TransactionType),
    /// Display price within a range (inclusive).
    PriceRange {
        min: Option<Money>,
        max: Option<Money>,
    },
    /// Only discounted products.
    Discounted,
}

impl Filter {
    /// Create a text search filter.
    pub fn text(query: impl Into<String>) -> Self {
        Filter::Text(query.into())
    }

    /// Create a game type filter.
    pub fn game_type(tag: impl Into<String>) -> Self {
        Filter::GameType(tag.into())
    }

    /// Create an age restriction filter.
    pub fn age_restriction(tag: impl Into<String>) -> Self {
        Filter::AgeRestriction(tag.into())
    }

    /// Create a price range filter.
    pub fn price_range(min: Option<Money>, max: Option<Money>) -> Self {
        Filter::PriceRange { min, max }
    }

    /// Check whether a product passes the filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Filter::Text(query) => {
                let needle = query.trim().to_lowercase();
                needle.is_empty()
                    || product.name.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
            }
            Filter::GameType(tag) => product.game_type.eq_ignore_ascii_case(tag.trim()),
            Filter::AgeRestriction(tag) => product.age_restriction.eq_ignore_ascii_case(tag.trim()),
            Filter::Transaction(transaction) => product.supports(*transaction),
            Filter::PriceRange { min, max } => match product.display_price() {
                Some(price) => {
                    min.map_or(true, |m| price.amount_cents >= m.amount_cents)
                        && max.map_or(true, |m| price.amount_cents <= m.amount_cents)
                }
                None => false,
            },
            Filter::Discounted => product.is_discounted(),
        }
    }
}
