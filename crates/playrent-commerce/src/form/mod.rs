//! Product form module.
//!
//! The admin product editor is a four-step wizard. Each step validates
//! only the fields listed for it in a per-step, per-product-type table;
//! submission validates the whole form.

mod draft;
mod field;
mod schema;
mod wizard;

pub use draft::{PricingDraft, ProductDraft, ProductPayload, VideoDraft};
pub use field::{fields_for_mode, fields_for_step, Field, Gate};
pub use schema::{
    validate_all, validate_field, validate_fields, FieldError, ValidationErrors,
    MAX_PRICE, MIN_DESCRIPTION_CHARS,
};
pub use wizard::{FormMode, FormStep, ProductForm, Submission};
