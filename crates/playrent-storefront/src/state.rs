//! The application state container shared by every flow.

use crate::notify::{Notification, Notifier};
use crate::StorefrontError;
use playrent_cache::{Cache, Persisted, QueryCache};
use playrent_commerce::form::{FormStep, ProductDraft};
use playrent_commerce::money::Currency;
use playrent_commerce::search::DEFAULT_PAGE_SIZE;
use playrent_commerce::user::UserProfile;
use playrent_data::ApiClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub const SESSION_SLICE: &str = "session";
pub const SESSION_SLICE_VERSION: u32 = 1;
pub const DRAFT_SLICE: &str = "product-draft";
pub const DRAFT_SLICE_VERSION: u32 = 1;

/// Persisted session: who is signed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Persisted create-product draft, resumed on the next visit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftState {
    #[serde(default)]
    pub draft: Option<ProductDraft>,
    #[serde(default)]
    pub step: FormStep,
}

/// Storefront display settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub currency: Currency,
    pub page_size: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Everything the flows share: the API client, the query cache, persisted
/// slices and the notifier.
pub struct AppState {
    client: ApiClient,
    queries: QueryCache,
    session: Persisted<SessionState>,
    drafts: Persisted<DraftState>,
    notifier: Arc<dyn Notifier>,
    settings: Settings,
}

impl AppState {
    /// Build state whose slices live in `store`.
    pub fn new(client: ApiClient, store: Cache, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            queries: QueryCache::new(),
            session: Persisted::new(store.clone(), SESSION_SLICE, SESSION_SLICE_VERSION),
            drafts: Persisted::new(store, DRAFT_SLICE, DRAFT_SLICE_VERSION),
            notifier,
            settings: Settings::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_query_cache(mut self, queries: QueryCache) -> Self {
        self.queries = queries;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn queries(&self) -> &QueryCache {
        &self.queries
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn drafts(&self) -> &Persisted<DraftState> {
        &self.drafts
    }

    pub fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Result<Option<UserProfile>, StorefrontError> {
        Ok(self.session.load()?.user)
    }

    pub fn sign_in(&self, user: UserProfile) -> Result<(), StorefrontError> {
        info!(user = %user.id, role = user.role.as_str(), "signed in");
        self.session.save(&SessionState { user: Some(user) })?;
        Ok(())
    }

    /// Forget the user and every cached query.
    pub fn sign_out(&self) -> Result<(), StorefrontError> {
        self.session.clear()?;
        self.queries.clear()?;
        info!("signed out");
        Ok(())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("client", &self.client)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
