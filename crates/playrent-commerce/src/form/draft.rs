//! Editable product drafts and the payload sent to the catalog.

use crate::catalog::{PriceDetails, Product, TransactionMode, UploadedVideos};
use crate::form::{Field, FieldError};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Price inputs as typed into the form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PricingDraft {
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub rental_price_per_day: Option<f64>,
    #[serde(default)]
    pub minimum_rental_period: Option<i64>,
    #[serde(default)]
    pub maximum_rental_period: Option<i64>,
}

/// Video URL inputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VideoDraft {
    #[serde(default)]
    pub set_up: String,
    #[serde(default)]
    pub action_card: String,
    #[serde(default)]
    pub game_play: String,
}

/// The full, possibly invalid, state of the product form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_description: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub discount_percentage: Option<i64>,
    #[serde(default)]
    pub age_restriction: String,
    #[serde(default)]
    pub game_type: String,
    #[serde(default)]
    pub product_type: TransactionMode,
    #[serde(default)]
    pub pricing: PricingDraft,
    #[serde(default)]
    pub available_for_sale: Option<i64>,
    #[serde(default)]
    pub available_for_rent: Option<i64>,
    #[serde(default)]
    pub uploaded_video: VideoDraft,
}

impl ProductDraft {
    /// Seed a draft from an existing product.
    pub fn from_product(product: &Product) -> Self {
        let prices = &product.price_details;
        Self {
            product_name: product.name.clone(),
            product_description: product.description.clone(),
            cover_image: product.cover_image.clone(),
            discount_percentage: Some(i64::from(product.discount_percentage)),
            age_restriction: product.age_restriction.clone(),
            game_type: product.game_type.clone(),
            product_type: product.transaction_mode,
            pricing: PricingDraft {
                sale_price: prices.sale_price.map(|m| m.to_decimal()),
                rental_price_per_day: prices.rental_price_per_day.map(|m| m.to_decimal()),
                minimum_rental_period: prices.minimum_rental_period,
                maximum_rental_period: prices.maximum_rental_period,
            },
            available_for_sale: Some(product.available_for_sale),
            available_for_rent: Some(product.available_for_rent),
            uploaded_video: VideoDraft {
                set_up: product.uploaded_video.set_up.clone().unwrap_or_default(),
                action_card: product.uploaded_video.action_card.clone().unwrap_or_default(),
                game_play: product.uploaded_video.game_play.clone().unwrap_or_default(),
            },
        }
    }

    /// Current value of a field as text, empty when unset.
    pub fn value(&self, field: Field) -> String {
        fn opt<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map(ToString::to_string).unwrap_or_default()
        }
        match field {
            Field::ProductName => self.product_name.clone(),
            Field::ProductDescription => self.product_description.clone(),
            Field::CoverImage => self.cover_image.clone(),
            Field::DiscountPercentage => opt(&self.discount_percentage),
            Field::AgeRestriction => self.age_restriction.clone(),
            Field::GameType => self.game_type.clone(),
            Field::ProductType => self.product_type.as_str().to_string(),
            Field::SalePrice => opt(&self.pricing.sale_price),
            Field::RentalPricePerDay => opt(&self.pricing.rental_price_per_day),
            Field::MinimumRentalPeriod => opt(&self.pricing.minimum_rental_period),
            Field::MaximumRentalPeriod => opt(&self.pricing.maximum_rental_period),
            Field::AvailableForSale => opt(&self.available_for_sale),
            Field::AvailableForRent => opt(&self.available_for_rent),
            Field::SetUpVideo => self.uploaded_video.set_up.clone(),
            Field::ActionCardVideo => self.uploaded_video.action_card.clone(),
            Field::GamePlayVideo => self.uploaded_video.game_play.clone(),
        }
    }

    /// Set a field from text input. Blank input clears optional fields.
    pub fn set(&mut self, field: Field, input: &str) -> Result<(), FieldError> {
        let raw = input.trim();
        match field {
            Field::ProductName => self.product_name = raw.to_string(),
            Field::ProductDescription => self.product_description = raw.to_string(),
            Field::CoverImage => self.cover_image = raw.to_string(),
            Field::AgeRestriction => self.age_restriction = raw.to_string(),
            Field::GameType => self.game_type = raw.to_string(),
            Field::SetUpVideo => self.uploaded_video.set_up = raw.to_string(),
            Field::ActionCardVideo => self.uploaded_video.action_card = raw.to_string(),
            Field::GamePlayVideo => self.uploaded_video.game_play = raw.to_string(),
            Field::ProductType => {
                self.product_type = if raw.is_empty() {
                    TransactionMode::default()
                } else {
                    TransactionMode::from_str(raw)
                        .ok_or_else(|| FieldError::new(field, "Choose SALE, RENT or BOTH"))?
                }
            }
            Field::DiscountPercentage => self.discount_percentage = parse_int(field, raw)?,
            Field::MinimumRentalPeriod => self.pricing.minimum_rental_period = parse_int(field, raw)?,
            Field::MaximumRentalPeriod => self.pricing.maximum_rental_period = parse_int(field, raw)?,
            Field::AvailableForSale => self.available_for_sale = parse_int(field, raw)?,
            Field::AvailableForRent => self.available_for_rent = parse_int(field, raw)?,
            Field::SalePrice => self.pricing.sale_price = parse_decimal(field, raw)?,
            Field::RentalPricePerDay => self.pricing.rental_price_per_day = parse_decimal(field, raw)?,
        }
        Ok(())
    }

    /// Build the payload for create or update.
    ///
    /// Fields the product type does not use are left out. The draft should
    /// have passed validation first.
    pub fn to_payload(&self, currency: Currency) -> ProductPayload {
        let mode = self.product_type;
        let sale = mode.includes_sale();
        let rent = mode.includes_rent();
        let money = |v: Option<f64>| v.map(|amount| Money::from_decimal(amount, currency));
        let url = |s: &str| (!s.trim().is_empty()).then(|| s.trim().to_string());

        ProductPayload {
            name: self.product_name.trim().to_string(),
            description: self.product_description.trim().to_string(),
            cover_image: self.cover_image.trim().to_string(),
            game_type: self.game_type.trim().to_string(),
            age_restriction: self.age_restriction.trim().to_string(),
            discount_percentage: self
                .discount_percentage
                .unwrap_or(0)
                .clamp(0, 100) as u8,
            product_type: mode,
            price_details: PriceDetails {
                sale_price: if sale { money(self.pricing.sale_price) } else { None },
                rental_price_per_day: if rent {
                    money(self.pricing.rental_price_per_day)
                } else {
                    None
                },
                minimum_rental_period: if rent { self.pricing.minimum_rental_period } else { None },
                maximum_rental_period: if rent { self.pricing.maximum_rental_period } else { None },
            },
            available_for_sale: if sale { self.available_for_sale.unwrap_or(0) } else { 0 },
            available_for_rent: if rent { self.available_for_rent.unwrap_or(0) } else { 0 },
            uploaded_video: UploadedVideos {
                set_up: url(&self.uploaded_video.set_up),
                action_card: url(&self.uploaded_video.action_card),
                game_play: url(&self.uploaded_video.game_play),
            },
        }
    }
}

/// Body of `POST /api/products` and `PUT /api/products/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub cover_image: String,
    pub game_type: String,
    pub age_restriction: String,
    pub discount_percentage: u8,
    pub product_type: TransactionMode,
    pub price_details: PriceDetails,
    pub available_for_sale: i64,
    pub available_for_rent: i64,
    pub uploaded_video: UploadedVideos,
}

fn parse_int(field: Field, raw: &str) -> Result<Option<i64>, FieldError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| FieldError::new(field, "Enter a whole number"))
}

fn parse_decimal(field: Field, raw: &str) -> Result<Option<f64>, FieldError> {
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(FieldError::new(field, "Enter a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_parses_numbers() {
        let mut draft = ProductDraft::default();
        draft.set(Field::SalePrice, "49.99").unwrap();
        draft.set(Field::MinimumRentalPeriod, " 3 ").unwrap();
        assert_eq!(draft.pricing.sale_price, Some(49.99));
        assert_eq!(draft.pricing.minimum_rental_period, Some(3));

        draft.set(Field::SalePrice, "").unwrap();
        assert_eq!(draft.pricing.sale_price, None);
    }

    #[test]
    fn test_set_rejects_garbage() {
        let mut draft = ProductDraft::default();
        let err = draft.set(Field::AvailableForSale, "many").unwrap_err();
        assert_eq!(err.field, Field::AvailableForSale);
        assert!(draft.set(Field::ProductType, "LEASE").is_err());
        assert!(draft.set(Field::SalePrice, "NaN").is_err());
    }

    #[test]
    fn test_payload_drops_gated_out_fields() {
        let mut draft = ProductDraft {
            product_name: "Azul".to_string(),
            product_type: TransactionMode::Sale,
            ..Default::default()
        };
        draft.pricing.sale_price = Some(30.0);
        draft.pricing.rental_price_per_day = Some(2.5);
        draft.available_for_rent = Some(4);

        let payload = draft.to_payload(Currency::USD);
        assert_eq!(
            payload.price_details.sale_price,
            Some(Money::new(3000, Currency::USD))
        );
        assert_eq!(payload.price_details.rental_price_per_day, None);
        assert_eq!(payload.available_for_rent, 0);
    }

    #[test]
    fn test_from_product_round_trip() {
        let product = Product::new("p1", "Azul", TransactionMode::Both)
            .with_sale_price(Money::new(3999, Currency::USD))
            .with_rental_price(Money::new(250, Currency::USD))
            .with_rental_limits(2, 10)
            .with_discount(15);
        let draft = ProductDraft::from_product(&product);
        assert_eq!(draft.value(Field::SalePrice), "39.99");
        assert_eq!(draft.discount_percentage, Some(15));

        let payload = draft.to_payload(Currency::USD);
        assert_eq!(payload.price_details, product.price_details);
        assert_eq!(payload.discount_percentage, 15);
    }
}
