//! Product form fields and the per-step field table.

use crate::catalog::TransactionMode;
use crate::form::FormStep;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A field of the product form, addressed by its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Field {
    ProductName,
    ProductDescription,
    CoverImage,
    DiscountPercentage,
    AgeRestriction,
    GameType,
    ProductType,
    SalePrice,
    RentalPricePerDay,
    MinimumRentalPeriod,
    MaximumRentalPeriod,
    AvailableForSale,
    AvailableForRent,
    SetUpVideo,
    ActionCardVideo,
    GamePlayVideo,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Field; 16] = [
        Field::ProductName,
        Field::ProductDescription,
        Field::CoverImage,
        Field::AgeRestriction,
        Field::GameType,
        Field::ProductType,
        Field::DiscountPercentage,
        Field::SalePrice,
        Field::RentalPricePerDay,
        Field::MinimumRentalPeriod,
        Field::MaximumRentalPeriod,
        Field::AvailableForSale,
        Field::AvailableForRent,
        Field::SetUpVideo,
        Field::ActionCardVideo,
        Field::GamePlayVideo,
    ];

    /// Path of the field in the form payload.
    pub fn path(&self) -> &'static str {
        match self {
            Field::ProductName => "productName",
            Field::ProductDescription => "productDescription",
            Field::CoverImage => "coverImage",
            Field::DiscountPercentage => "discountPercentage",
            Field::AgeRestriction => "ageRestriction",
            Field::GameType => "gameType",
            Field::ProductType => "productType",
            Field::SalePrice => "pricing.salePrice",
            Field::RentalPricePerDay => "pricing.rentalPricePerDay",
            Field::MinimumRentalPeriod => "pricing.minimumRentalPeriod",
            Field::MaximumRentalPeriod => "pricing.maximumRentalPeriod",
            Field::AvailableForSale => "availableForSale",
            Field::AvailableForRent => "availableForRent",
            Field::SetUpVideo => "uploadedVideo.setUp",
            Field::ActionCardVideo => "uploadedVideo.actionCard",
            Field::GamePlayVideo => "uploadedVideo.gamePlay",
        }
    }

    /// Look a field up by path.
    pub fn from_path(path: &str) -> Option<Field> {
        Self::ALL.into_iter().find(|f| f.path() == path)
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Field::ProductName => "Product name",
            Field::ProductDescription => "Description",
            Field::CoverImage => "Cover image URL",
            Field::DiscountPercentage => "Discount (%)",
            Field::AgeRestriction => "Age restriction",
            Field::GameType => "Game type",
            Field::ProductType => "Product type",
            Field::SalePrice => "Sale price",
            Field::RentalPricePerDay => "Rental price per day",
            Field::MinimumRentalPeriod => "Minimum rental period (days)",
            Field::MaximumRentalPeriod => "Maximum rental period (days)",
            Field::AvailableForSale => "Units available for sale",
            Field::AvailableForRent => "Units available for rent",
            Field::SetUpVideo => "Set-up video URL",
            Field::ActionCardVideo => "Action card video URL",
            Field::GamePlayVideo => "Game play video URL",
        }
    }

    /// The step the field is edited on.
    pub fn step(&self) -> FormStep {
        STEP_FIELDS
            .iter()
            .find(|(_, field, _)| field == self)
            .map(|(step, _, _)| *step)
            .unwrap_or(FormStep::Review)
    }

    /// Whether the product type makes this field mandatory.
    pub fn gate(&self) -> Gate {
        STEP_FIELDS
            .iter()
            .find(|(_, field, _)| field == self)
            .map(|(_, _, gate)| *gate)
            .unwrap_or(Gate::Always)
    }

    /// Whether the field applies to a product type.
    pub fn applies_to(&self, mode: TransactionMode) -> bool {
        self.gate().admits(mode)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl From<Field> for &'static str {
    fn from(field: Field) -> Self {
        field.path()
    }
}

impl TryFrom<String> for Field {
    type Error = String;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        Field::from_path(&path).ok_or_else(|| format!("unknown form field: {path}"))
    }
}

/// Which product types a field applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Every product type.
    Always,
    /// SALE and BOTH.
    Sale,
    /// RENT and BOTH.
    Rent,
}

impl Gate {
    pub fn admits(&self, mode: TransactionMode) -> bool {
        match self {
            Gate::Always => true,
            Gate::Sale => mode.includes_sale(),
            Gate::Rent => mode.includes_rent(),
        }
    }
}

/// Fields validated when leaving each step.
const STEP_FIELDS: &[(FormStep, Field, Gate)] = &[
    (FormStep::Basic, Field::ProductName, Gate::Always),
    (FormStep::Basic, Field::ProductDescription, Gate::Always),
    (FormStep::Basic, Field::CoverImage, Gate::Always),
    (FormStep::Basic, Field::AgeRestriction, Gate::Always),
    (FormStep::Basic, Field::GameType, Gate::Always),
    (FormStep::Basic, Field::ProductType, Gate::Always),
    (FormStep::Pricing, Field::DiscountPercentage, Gate::Always),
    (FormStep::Pricing, Field::SalePrice, Gate::Sale),
    (FormStep::Pricing, Field::RentalPricePerDay, Gate::Rent),
    (FormStep::Pricing, Field::MinimumRentalPeriod, Gate::Rent),
    (FormStep::Pricing, Field::MaximumRentalPeriod, Gate::Rent),
    (FormStep::Pricing, Field::AvailableForSale, Gate::Sale),
    (FormStep::Pricing, Field::AvailableForRent, Gate::Rent),
    (FormStep::Media, Field::SetUpVideo, Gate::Always),
    (FormStep::Media, Field::ActionCardVideo, Gate::Always),
    (FormStep::Media, Field::GamePlayVideo, Gate::Always),
];

/// Fields of a step that apply to a product type, in form order.
pub fn fields_for_step(step: FormStep, mode: TransactionMode) -> Vec<Field> {
    STEP_FIELDS
        .iter()
        .filter(|(s, _, gate)| *s == step && gate.admits(mode))
        .map(|(_, field, _)| *field)
        .collect()
}

/// Every field that applies to a product type.
pub fn fields_for_mode(mode: TransactionMode) -> Vec<Field> {
    STEP_FIELDS
        .iter()
        .filter(|(_, _, gate)| gate.admits(mode))
        .map(|(_, field, _)| *field)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_path(field.path()), Some(field));
        }
    }

    #[test]
    fn test_every_field_has_a_step() {
        for field in Field::ALL {
            assert_ne!(field.step(), FormStep::Review, "{field}");
        }
    }

    #[test]
    fn test_pricing_fields_by_type() {
        assert_eq!(
            fields_for_step(FormStep::Pricing, TransactionMode::Sale),
            vec![
                Field::DiscountPercentage,
                Field::SalePrice,
                Field::AvailableForSale
            ]
        );
        let rent = fields_for_step(FormStep::Pricing, TransactionMode::Rent);
        assert!(!rent.contains(&Field::SalePrice));
        assert!(rent.contains(&Field::MinimumRentalPeriod));
        assert_eq!(fields_for_step(FormStep::Pricing, TransactionMode::Both).len(), 7);
    }

    #[test]
    fn test_review_has_no_fields() {
        assert!(fields_for_step(FormStep::Review, TransactionMode::Both).is_empty());
    }

    #[test]
    fn test_serializes_as_path() {
        assert_eq!(
            serde_json::to_string(&Field::SalePrice).unwrap(),
            "\"pricing.salePrice\""
        );
        let field: Field = serde_json::from_str("\"uploadedVideo.setUp\"").unwrap();
        assert_eq!(field, Field::SetUpVideo);
    }
}
