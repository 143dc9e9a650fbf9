//! Multi-step product form state machine.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::form::{
    fields_for_step, validate_all, validate_fields, Field, ProductDraft, ProductPayload,
    ValidationErrors,
};
use crate::ids::ProductId;
use crate::money::Currency;
use serde::{Deserialize, Serialize};

/// Steps of the product form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormStep {
    /// Name, description, cover, tags and product type.
    #[default]
    Basic,
    /// Prices, rental limits and stock.
    Pricing,
    /// Video links.
    Media,
    /// Final check before submission.
    Review,
}

impl FormStep {
    /// All steps in order.
    pub const ALL: [FormStep; 4] = [
        FormStep::Basic,
        FormStep::Pricing,
        FormStep::Media,
        FormStep::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormStep::Basic => "basic",
            FormStep::Pricing => "pricing",
            FormStep::Media => "media",
            FormStep::Review => "review",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FormStep::Basic => "Basic information",
            FormStep::Pricing => "Pricing",
            FormStep::Media => "Media",
            FormStep::Review => "Review",
        }
    }

    /// Zero-based position.
    pub fn index(&self) -> usize {
        match self {
            FormStep::Basic => 0,
            FormStep::Pricing => 1,
            FormStep::Media => 2,
            FormStep::Review => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }
}

/// Whether the form creates a product or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "productId", rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Update(ProductId),
}

/// A validated request produced by the form.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(ProductPayload),
    Update {
        product_id: ProductId,
        payload: ProductPayload,
    },
}

impl Submission {
    pub fn payload(&self) -> &ProductPayload {
        match self {
            Submission::Create(payload) => payload,
            Submission::Update { payload, .. } => payload,
        }
    }
}

/// State of the product form: the current step, the draft, the last
/// validation errors and the field that should receive focus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    mode: FormMode,
    step: FormStep,
    currency: Currency,
    draft: ProductDraft,
    #[serde(default)]
    errors: ValidationErrors,
    #[serde(default)]
    focus: Option<Field>,
}

impl ProductForm {
    /// An empty form for a new product.
    pub fn create(currency: Currency) -> Self {
        Self::with_draft(ProductDraft::default(), currency)
    }

    /// A new-product form resumed from a saved draft.
    pub fn with_draft(draft: ProductDraft, currency: Currency) -> Self {
        Self {
            mode: FormMode::Create,
            step: FormStep::Basic,
            currency,
            draft,
            errors: ValidationErrors::new(),
            focus: None,
        }
    }

    /// A form seeded from an existing product.
    pub fn update(product: &Product) -> Self {
        Self {
            mode: FormMode::Update(product.id.clone()),
            step: FormStep::Basic,
            currency: product.currency(),
            draft: ProductDraft::from_product(product),
            errors: ValidationErrors::new(),
            focus: None,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_update(&self) -> bool {
        matches!(self.mode, FormMode::Update(_))
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProductDraft {
        &mut self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The field to focus, set after a failed validation.
    pub fn focus(&self) -> Option<Field> {
        self.focus
    }

    /// Fields shown on the current step for the draft's product type.
    pub fn current_fields(&self) -> Vec<Field> {
        fields_for_step(self.step, self.draft.product_type)
    }

    /// Set a field from text input, recording a parse failure as an error.
    pub fn set_field(&mut self, field: Field, input: &str) -> Result<(), CommerceError> {
        self.draft.set(field, input).map_err(|error| {
            self.focus = Some(error.field);
            self.errors = ValidationErrors::from(error);
            CommerceError::Validation(self.errors.clone())
        })
    }

    /// Validate the current step and advance.
    ///
    /// On failure the form stays on the step and focuses the first invalid
    /// field.
    pub fn next_step(&mut self) -> Result<FormStep, CommerceError> {
        let next = self
            .step
            .next()
            .ok_or_else(|| CommerceError::InvalidStepTransition {
                from: self.step.as_str().to_string(),
                to: "none".to_string(),
            })?;

        let errors = validate_fields(&self.draft, &self.current_fields());
        self.record(errors)?;

        tracing::debug!(from = self.step.as_str(), to = next.as_str(), "form step advanced");
        self.step = next;
        Ok(next)
    }

    /// Go back one step without validation.
    pub fn prev_step(&mut self) -> Result<FormStep, CommerceError> {
        let prev = self
            .step
            .prev()
            .ok_or_else(|| CommerceError::InvalidStepTransition {
                from: self.step.as_str().to_string(),
                to: "none".to_string(),
            })?;
        self.step = prev;
        Ok(prev)
    }

    /// Jump directly to any step without validation.
    pub fn jump_to(&mut self, step: FormStep) {
        self.step = step;
        self.focus = None;
    }

    /// Validate the whole form and build the request.
    ///
    /// Only allowed from the review step. On failure the form stays on
    /// review with the first invalid field focused.
    pub fn prepare_submission(&mut self) -> Result<Submission, CommerceError> {
        if self.step != FormStep::Review {
            return Err(CommerceError::InvalidStepTransition {
                from: self.step.as_str().to_string(),
                to: "submit".to_string(),
            });
        }
        self.record(validate_all(&self.draft))?;

        let payload = self.draft.to_payload(self.currency);
        Ok(match &self.mode {
            FormMode::Create => Submission::Create(payload),
            FormMode::Update(product_id) => Submission::Update {
                product_id: product_id.clone(),
                payload,
            },
        })
    }

    /// Start over with an empty draft.
    pub fn reset(&mut self) {
        self.step = FormStep::Basic;
        self.draft = ProductDraft::default();
        self.errors = ValidationErrors::new();
        self.focus = None;
    }

    /// Progress through the steps as a percentage.
    pub fn progress_percent(&self) -> u8 {
        ((self.step.index() * 100) / (FormStep::ALL.len() - 1)) as u8
    }

    fn record(&mut self, errors: ValidationErrors) -> Result<(), CommerceError> {
        self.focus = errors.first().map(|e| e.field);
        self.errors = errors.clone();
        errors.into_result().map_err(CommerceError::Validation)
    }
}
