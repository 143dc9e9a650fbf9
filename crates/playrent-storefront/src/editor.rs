//! Product create/edit flow around the multi-step form.

use crate::notify::Notification;
use crate::state::{AppState, DraftState};
use crate::StorefrontError;
use playrent_cache::QueryTag;
use playrent_commerce::catalog::Product;
use playrent_commerce::form::{Field, FormStep, ProductForm, Submission};
use playrent_commerce::ids::ProductId;
use playrent_commerce::CommerceError;
use playrent_data::ErrorClass;
use std::sync::Arc;
use tracing::{info, warn};

/// Drives a [`ProductForm`] and submits it.
///
/// In create mode the draft is saved after every change and restored
/// the next time the editor is opened, until a submit succeeds.
pub struct ProductEditor {
    state: Arc<AppState>,
    form: ProductForm,
}

impl ProductEditor {
    /// Open the create form, resuming a saved draft if there is one.
    pub fn create(state: Arc<AppState>) -> Result<Self, StorefrontError> {
        let currency = state.settings().currency;
        let saved = state.drafts().load()?;
        let mut form = match saved.draft {
            Some(draft) => ProductForm::with_draft(draft, currency),
            None => ProductForm::create(currency),
        };
        form.jump_to(saved.step);
        Ok(Self { state, form })
    }

    /// Open the edit form for an existing product.
    pub async fn edit(state: Arc<AppState>, id: &ProductId) -> Result<Self, StorefrontError> {
        let product = crate::catalog::CatalogBrowser::new(state.clone())
            .product(id)
            .await?;
        Ok(Self::edit_product(state, &product))
    }

    /// Open the edit form for a product already in hand.
    pub fn edit_product(state: Arc<AppState>, product: &Product) -> Self {
        Self {
            state,
            form: ProductForm::update(product),
        }
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn step(&self) -> FormStep {
        self.form.step()
    }

    pub fn set_field(&mut self, field: Field, input: &str) -> Result<(), StorefrontError> {
        self.form.set_field(field, input)?;
        self.save_draft()
    }

    /// Validate the current step and advance.
    ///
    /// On a validation failure the form stays put with the first invalid
    /// field focused, and the error is returned.
    pub fn next_step(&mut self) -> Result<FormStep, StorefrontError> {
        let step = self.form.next_step()?;
        self.save_draft()?;
        Ok(step)
    }

    pub fn prev_step(&mut self) -> Result<FormStep, StorefrontError> {
        let step = self.form.prev_step()?;
        self.save_draft()?;
        Ok(step)
    }

    pub fn jump_to(&mut self, step: FormStep) -> Result<(), StorefrontError> {
        self.form.jump_to(step);
        self.save_draft()
    }

    /// Validate everything and send the product to the server.
    ///
    /// Invalid forms never reach the network. When the request fails the
    /// form is left as it was so the user can try again. On success the form
    /// stays populated; a create also drops the saved draft.
    pub async fn submit(&mut self) -> Result<Product, StorefrontError> {
        let submission = self.form.prepare_submission()?;
        let client = self.state.client();

        let result = match &submission {
            Submission::Create(payload) => client.create_product(payload).await,
            Submission::Update {
                product_id,
                payload,
            } => client.update_product(product_id, payload).await,
        };

        let product = match result {
            Ok(product) => product,
            Err(e) => {
                let class = ErrorClass::of(&e);
                warn!(class = class.as_str(), error = %e, "product submit failed");
                self.state.notify(Notification::failure(class));
                return Err(e.into());
            }
        };

        self.state.queries().invalidate_all_of(&[
            QueryTag::Products,
            QueryTag::Product(product.id.clone()),
        ])?;

        match submission {
            Submission::Create(_) => {
                info!(product = %product.id, "product created");
                self.state
                    .notify(Notification::success(format!("{} created", product.name)));
                self.state.drafts().clear()?;
            }
            Submission::Update { .. } => {
                info!(product = %product.id, "product updated");
                self.state
                    .notify(Notification::success(format!("{} updated", product.name)));
            }
        }
        Ok(product)
    }

    /// Throw away the create draft.
    pub fn discard(&mut self) -> Result<(), StorefrontError> {
        self.form.reset();
        if !self.form.is_update() {
            self.state.drafts().clear()?;
        }
        Ok(())
    }

    fn save_draft(&self) -> Result<(), StorefrontError> {
        if self.form.is_update() {
            return Ok(());
        }
        self.state.drafts().save(&DraftState {
            draft: Some(self.form.draft().clone()),
            step: self.form.step(),
        })?;
        Ok(())
    }
}

/// Whether an editor error is a local validation failure.
pub fn is_validation(error: &StorefrontError) -> bool {
    matches!(error, StorefrontError::Commerce(CommerceError::Validation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Level;
    use crate::state::testing::{harness, harness_with_store};
    use playrent_cache::Cache;
    use playrent_commerce::catalog::TransactionMode;
    use playrent_commerce::money::{Currency, Money};
    use playrent_data::{FetchError, Method};

    fn fill_basic(editor: &mut ProductEditor, mode: &str) {
        editor.set_field(Field::ProductName, "Gloomhaven").unwrap();
        editor
            .set_field(Field::ProductDescription, "Dungeon crawling campaign game")
            .unwrap();
        editor
            .set_field(Field::CoverImage, "https://img.test/gloomhaven.png")
            .unwrap();
        editor.set_field(Field::AgeRestriction, "14+").unwrap();
        editor.set_field(Field::GameType, "campaign").unwrap();
        editor.set_field(Field::ProductType, mode).unwrap();
    }

    fn created() -> Product {
        Product::new("p9", "Gloomhaven", TransactionMode::Sale)
            .with_sale_price(Money::from_major(120, Currency::USD))
    }

    #[tokio::test]
    async fn test_pricing_step_blocks_missing_sale_price() {
        let h = harness();
        let mut editor = ProductEditor::create(h.state.clone()).unwrap();
        fill_basic(&mut editor, "BOTH");
        assert_eq!(editor.next_step().unwrap(), FormStep::Pricing);

        editor.set_field(Field::RentalPricePerDay, "4").unwrap();
        editor.set_field(Field::MinimumRentalPeriod, "1").unwrap();
        editor.set_field(Field::MaximumRentalPeriod, "7").unwrap();
        editor.set_field(Field::AvailableForSale, "2").unwrap();
        editor.set_field(Field::AvailableForRent, "2").unwrap();

        let err = editor.next_step().unwrap_err();
        assert!(is_validation(&err));
        assert_eq!(editor.step(), FormStep::Pricing);
        assert_eq!(editor.form().focus(), Some(Field::SalePrice));
    }

    #[tokio::test]
    async fn test_submit_create_clears_saved_draft_keeps_form() {
        let h = harness();
        let mut editor = ProductEditor::create(h.state.clone()).unwrap();
        fill_basic(&mut editor, "SALE");
        editor.next_step().unwrap();
        editor.set_field(Field::SalePrice, "120").unwrap();
        editor.set_field(Field::AvailableForSale, "3").unwrap();
        editor.next_step().unwrap();
        editor.next_step().unwrap();
        assert_eq!(editor.step(), FormStep::Review);
        assert!(h.state.drafts().exists().unwrap());

        h.mock.reply(Method::Post, "/api/products", 201, &created());
        let product = editor.submit().await.unwrap();

        assert_eq!(product.id.as_str(), "p9");
        assert!(!h.state.drafts().exists().unwrap());
        assert_eq!(editor.step(), FormStep::Review);
        assert_eq!(editor.form().draft().product_name, "Gloomhaven");
        assert_eq!(editor.form().draft().pricing.sale_price, Some(120.0));
        assert_eq!(h.notifier.last().unwrap().level, Level::Success);

        let body: serde_json::Value = h.mock.requests()[0].body_json().unwrap();
        assert_eq!(body["name"], "Gloomhaven");
        assert_eq!(body["productType"], "SALE");
    }

    #[tokio::test]
    async fn test_invalid_submit_never_sent() {
        let h = harness();
        let mut editor = ProductEditor::create(h.state.clone()).unwrap();
        editor.jump_to(FormStep::Review).unwrap();

        let err = editor.submit().await.unwrap_err();
        assert!(is_validation(&err));
        assert!(h.mock.requests().is_empty());
        assert_eq!(editor.form().focus(), Some(Field::ProductName));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_form() {
        let h = harness();
        let mut editor = ProductEditor::edit_product(h.state.clone(), &created());
        editor.set_field(Field::ProductName, "Gloomhaven 2nd ed").unwrap();
        editor.set_field(Field::ProductDescription, "A much longer description").unwrap();
        editor
            .set_field(Field::CoverImage, "https://img.test/g.png")
            .unwrap();
        editor.set_field(Field::AgeRestriction, "14+").unwrap();
        editor.set_field(Field::GameType, "campaign").unwrap();
        editor.set_field(Field::AvailableForSale, "1").unwrap();
        editor.jump_to(FormStep::Review).unwrap();
        h.mock
            .fail(Method::Put, "/api/products/p9", FetchError::Timeout)
            .fail(Method::Put, "/api/products/p9", FetchError::Timeout);

        let err = editor.submit().await.unwrap_err();

        assert_eq!(err.class(), Some(ErrorClass::Network));
        assert_eq!(editor.step(), FormStep::Review);
        assert_eq!(
            editor.form().draft().value(Field::ProductName),
            "Gloomhaven 2nd ed"
        );
        assert!(!h.state.drafts().exists().unwrap());
    }

    #[tokio::test]
    async fn test_draft_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let h = harness_with_store(Cache::open_dir(dir.path()).unwrap());
            let mut editor = ProductEditor::create(h.state.clone()).unwrap();
            fill_basic(&mut editor, "RENT");
            editor.next_step().unwrap();
        }

        let h = harness_with_store(Cache::open_dir(dir.path()).unwrap());
        let editor = ProductEditor::create(h.state.clone()).unwrap();
        assert_eq!(editor.step(), FormStep::Pricing);
        assert_eq!(editor.form().draft().value(Field::ProductName), "Gloomhaven");
    }
}
