//! Validation rules for the product form.

use crate::form::{fields_for_mode, Field, ProductDraft};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Minimum length of a product description.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// Highest accepted price, in major units. Keeps cent amounts well inside `i64`.
pub const MAX_PRICE: f64 = 1_000_000.0;

/// A validation failure on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.path(), self.message)
    }
}

/// Ordered validation failures, at most one per field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure unless the field already has one.
    pub fn push(&mut self, error: FieldError) {
        if self.get(error.field).is_none() {
            self.0.push(error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The first failure in form order.
    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    /// The failure for a field.
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(())` when there are no failures.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

/// Check one field. Gated fields are only required when the product type
/// admits them.
pub fn validate_field(draft: &ProductDraft, field: Field) -> Option<FieldError> {
    let required = field.applies_to(draft.product_type);
    let fail = |message: &str| Some(FieldError::new(field, message));
    let pricing = &draft.pricing;

    match field {
        Field::ProductName => {
            if draft.product_name.trim().is_empty() {
                fail("Product name is required")
            } else {
                None
            }
        }
        Field::ProductDescription => {
            if draft.product_description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
                fail("Description must be at least 10 characters")
            } else {
                None
            }
        }
        Field::CoverImage => {
            if is_absolute_url(&draft.cover_image) {
                None
            } else {
                fail("Cover image must be a valid URL")
            }
        }
        Field::DiscountPercentage => match draft.discount_percentage {
            Some(p) if !(0..=100).contains(&p) => fail("Discount must be between 0 and 100"),
            _ => None,
        },
        Field::AgeRestriction => {
            if draft.age_restriction.trim().is_empty() {
                fail("Age restriction is required")
            } else {
                None
            }
        }
        Field::GameType => {
            if draft.game_type.trim().is_empty() {
                fail("Game type is required")
            } else {
                None
            }
        }
        Field::ProductType => None,
        Field::SalePrice => check_price(field, pricing.sale_price, required),
        Field::RentalPricePerDay => check_price(field, pricing.rental_price_per_day, required),
        Field::MinimumRentalPeriod => check_period(field, pricing.minimum_rental_period, required),
        Field::MaximumRentalPeriod => {
            check_period(field, pricing.maximum_rental_period, required).or_else(|| {
                match (pricing.minimum_rental_period, pricing.maximum_rental_period) {
                    (Some(min), Some(max)) if required && min > max => {
                        fail("Maximum rental period must not be below the minimum")
                    }
                    _ => None,
                }
            })
        }
        Field::AvailableForSale => check_stock(field, draft.available_for_sale, required),
        Field::AvailableForRent => check_stock(field, draft.available_for_rent, required),
        Field::SetUpVideo => check_video(field, &draft.uploaded_video.set_up),
        Field::ActionCardVideo => check_video(field, &draft.uploaded_video.action_card),
        Field::GamePlayVideo => check_video(field, &draft.uploaded_video.game_play),
    }
}

/// Check a set of fields, keeping their order.
pub fn validate_fields(draft: &ProductDraft, fields: &[Field]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for field in fields {
        if let Some(error) = validate_field(draft, *field) {
            errors.push(error);
        }
    }
    errors
}

/// Check the whole form, including the rule that at least one price is set.
pub fn validate_all(draft: &ProductDraft) -> ValidationErrors {
    let mut errors = validate_fields(draft, &fields_for_mode(draft.product_type));
    if draft.pricing.sale_price.is_none() && draft.pricing.rental_price_per_day.is_none() {
        errors.push(FieldError::new(
            Field::SalePrice,
            "Provide a sale price or a rental price",
        ));
    }
    errors
}

fn check_price(field: Field, value: Option<f64>, required: bool) -> Option<FieldError> {
    match value {
        None if required => Some(FieldError::new(field, format!("{} is required", field.label()))),
        Some(v) if !v.is_finite() || v < 0.0 => {
            Some(FieldError::new(field, "Price must not be negative"))
        }
        Some(v) if v > MAX_PRICE => Some(FieldError::new(
            field,
            format!("Price must be at most {MAX_PRICE}"),
        )),
        _ => None,
    }
}

fn check_period(field: Field, value: Option<i64>, required: bool) -> Option<FieldError> {
    match value {
        None if required => Some(FieldError::new(field, format!("{} is required", field.label()))),
        Some(days) if days < 1 => Some(FieldError::new(field, "Rental period must be at least 1 day")),
        _ => None,
    }
}

fn check_stock(field: Field, value: Option<i64>, required: bool) -> Option<FieldError> {
    match value {
        None if required => Some(FieldError::new(field, format!("{} is required", field.label()))),
        Some(units) if units < 0 => Some(FieldError::new(field, "Stock must not be negative")),
        _ => None,
    }
}

fn check_video(field: Field, value: &str) -> Option<FieldError> {
    if value.trim().is_empty() || is_absolute_url(value) {
        None
    } else {
        Some(FieldError::new(field, "Video must be a valid URL"))
    }
}

fn is_absolute_url(value: &str) -> bool {
    Url::parse(value.trim())
        .map(|url| url.has_host())
        .unwrap_or(false)
}
