//! Optimistic cart mirror kept in sync with the remote cart.
//!
//! Every mutation is applied to the local mirror first, then sent to the
//! server. Mutations on the same cart item are sent one at a time in the
//! order they were issued. When a request fails, the local change is undone
//! unless a newer mutation has touched the item since; the newer state wins.

use crate::notify::Notification;
use crate::state::AppState;
use crate::StorefrontError;
use chrono::{DateTime, Utc};
use playrent_cache::QueryTag;
use playrent_commerce::cart::{validate_quantity, Cart, CartItem, CartPricing, RentalPeriod};
use playrent_commerce::catalog::{Product, TransactionType};
use playrent_commerce::ids::CartItemId;
use playrent_commerce::CommerceError;
use playrent_data::api::{AddToCartRequest, UpdateCartItemRequest};
use playrent_data::{ErrorClass, FetchError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

const CART_QUERY: &str = "cart";

/// How a cart mutation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The server accepted the change.
    Applied,
    /// Rejected by local rules; nothing was sent.
    Rejected(CommerceError),
    /// The server call failed and the local change was undone.
    RolledBack(ErrorClass),
    /// The server call failed after a newer mutation touched the item, so
    /// the local state was left to the newer mutation.
    Superseded(ErrorClass),
}

impl SyncOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn error_class(&self) -> Option<ErrorClass> {
        match self {
            Self::RolledBack(class) | Self::Superseded(class) => Some(*class),
            _ => None,
        }
    }
}

/// Requested change to one cart line. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartItemUpdate {
    pub quantity: Option<i64>,
    pub rental_start: Option<DateTime<Utc>>,
    pub rental_end: Option<DateTime<Utc>>,
}

impl CartItemUpdate {
    pub fn quantity(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn rental(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self {
            quantity: None,
            rental_start: start,
            rental_end: end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.rental_start.is_none() && self.rental_end.is_none()
    }
}

#[derive(Debug, Default)]
struct Mirror {
    cart: Cart,
    /// Bumped by every local mutation of an item.
    generations: HashMap<CartItemId, u64>,
    /// Requests still out per item.
    in_flight: HashMap<CartItemId, usize>,
    /// Last state of each item the server accepted.
    confirmed: HashMap<CartItemId, CartItem>,
}

impl Mirror {
    fn touch(&mut self, id: &CartItemId) -> u64 {
        let generation = self.generations.entry(id.clone()).or_insert(0);
        *generation += 1;
        *self.in_flight.entry(id.clone()).or_insert(0) += 1;
        *generation
    }

    fn generation(&self, id: &CartItemId) -> u64 {
        self.generations.get(id).copied().unwrap_or(0)
    }

    fn settle(&mut self, id: &CartItemId) {
        if let Some(count) = self.in_flight.get_mut(id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.in_flight.remove(id);
            }
        }
    }

    fn is_busy(&self, id: &CartItemId) -> bool {
        self.in_flight.contains_key(id)
    }

    fn confirm(&mut self, item: CartItem) {
        self.confirmed.insert(item.id.clone(), item);
    }

    /// What to restore when the newest change to an item fails: the
    /// server's last accepted state, else the local state before the change.
    fn restore_point(&self, id: &CartItemId, fallback: CartItem) -> CartItem {
        self.confirmed.get(id).cloned().unwrap_or(fallback)
    }

    /// Adopt the server cart, keeping local state for items with requests
    /// still out.
    fn reconcile(&mut self, server: Cart) {
        self.confirmed
            .retain(|id, _| self.in_flight.contains_key(id));
        for item in &server.items {
            self.confirmed.insert(item.id.clone(), item.clone());
        }

        let mut items = Vec::with_capacity(server.items.len());
        for item in server.items {
            if !self.is_busy(&item.id) {
                items.push(item);
            } else if let Some(local) = self.cart.get_item(&item.id) {
                items.push(local.clone());
            }
        }
        for local in &self.cart.items {
            if self.is_busy(&local.id) && !items.iter().any(|i| i.id == local.id) {
                items.push(local.clone());
            }
        }
        self.cart = Cart::from_items(items);
    }
}

/// The cart mutation hook: local mirror plus remote sync.
pub struct CartStore {
    state: Arc<AppState>,
    mirror: Mutex<Mirror>,
    item_locks: Mutex<HashMap<CartItemId, Arc<tokio::sync::Mutex<()>>>>,
}

impl CartStore {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            mirror: Mutex::new(Mirror::default()),
            item_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Snapshot of the local mirror.
    pub fn cart(&self) -> Cart {
        self.mirror().cart.clone()
    }

    /// Pricing of the local mirror.
    pub fn pricing(&self) -> Result<CartPricing, CommerceError> {
        self.mirror().cart.calculate_pricing()
    }

    /// Load the cart, from the query cache when possible.
    pub async fn load(&self) -> Result<Cart, StorefrontError> {
        let client = self.state.client();
        let server: Cart = self
            .state
            .queries()
            .get_or_fetch(CART_QUERY, vec![QueryTag::Cart], || async {
                client.get_cart().await.map_err(StorefrontError::from)
            })
            .await?;
        let mut mirror = self.mirror();
        mirror.reconcile(server);
        Ok(mirror.cart.clone())
    }

    /// Drop the cached cart and load it again.
    pub async fn refresh(&self) -> Result<Cart, StorefrontError> {
        self.state.queries().invalidate(&QueryTag::Cart)?;
        self.load().await
    }

    /// Add a product to the cart.
    ///
    /// Rentals need both `rental_start` and `rental_end`.
    pub async fn add_to_cart(
        &self,
        product: Product,
        transaction_type: TransactionType,
        quantity: i64,
        rental_start: Option<DateTime<Utc>>,
        rental_end: Option<DateTime<Utc>>,
    ) -> SyncOutcome {
        let item = match build_item(product, transaction_type, quantity, rental_start, rental_end) {
            Ok(item) => item,
            Err(e) => return self.reject(e),
        };
        let placeholder = item.id.clone();
        let name = item.product.name.clone();
        let request = AddToCartRequest {
            product_id: item.product.id.clone(),
            transaction_type,
            quantity,
            rental_start: item.rental_start,
            rental_end: item.rental_end,
        };

        {
            let mut mirror = self.mirror();
            mirror.cart.add_item(item);
            mirror.touch(&placeholder);
        }
        debug!(item = %placeholder, product = %request.product_id, "optimistic add");

        let result = self.state.client().add_to_cart(&request).await;

        let outcome = {
            let mut mirror = self.mirror();
            mirror.settle(&placeholder);
            match result {
                Ok(server_item) => {
                    let id = server_item.id.clone();
                    mirror.confirm(server_item.clone());
                    mirror.cart.replace_item(&placeholder, server_item);
                    info!(item = %id, product = %request.product_id, "added to cart");
                    Ok(())
                }
                Err(e) => {
                    mirror.cart.remove_item(&placeholder);
                    Err(Failure::RolledBack(e))
                }
            }
        };
        self.finish(outcome, "add", format!("{name} added to cart"))
            .await
    }

    /// Change a line's quantity and/or rental dates.
    ///
    /// Rental dates are clamped so the window never inverts.
    pub async fn update_cart_item(&self, id: &CartItemId, update: CartItemUpdate) -> SyncOutcome {
        if update.is_empty() {
            return SyncOutcome::Applied;
        }

        let (previous, generation, request) = {
            let mut mirror = self.mirror();
            let previous = match editable_item(&mirror.cart, id).cloned() {
                Ok(item) => item,
                Err(e) => return self.reject(e),
            };
            if let Err(e) = apply_update(&mut mirror.cart, id, &update) {
                mirror.cart.replace_item(id, previous);
                return self.reject(e);
            }

            let mut request = UpdateCartItemRequest::new(id.clone());
            request.quantity = update.quantity;
            if update.rental_start.is_some() || update.rental_end.is_some() {
                if let Some(item) = mirror.cart.get_item(id) {
                    request.rental_start = item.rental_start;
                    request.rental_end = item.rental_end;
                }
            }
            let generation = mirror.touch(id);
            (previous, generation, request)
        };
        debug!(item = %id, generation, "optimistic update");

        let result = {
            let lock = self.item_lock(id);
            let _turn = lock.lock().await;
            self.state.client().update_cart_item(&request).await
        };

        let outcome = {
            let mut mirror = self.mirror();
            mirror.settle(id);
            match result {
                Ok(server_item) => {
                    mirror.confirm(server_item.clone());
                    if mirror.generation(id) == generation {
                        mirror.cart.replace_item(id, server_item);
                    }
                    info!(item = %id, "cart item updated");
                    Ok(())
                }
                Err(e) if mirror.generation(id) == generation => {
                    let restored = mirror.restore_point(id, previous);
                    mirror.cart.replace_item(id, restored);
                    Err(Failure::RolledBack(e))
                }
                Err(e) => Err(Failure::Superseded(e)),
            }
        };
        self.finish(outcome, "update", "Cart updated".to_string())
            .await
    }

    /// Remove a line from the cart.
    pub async fn remove_from_cart(&self, id: &CartItemId) -> SyncOutcome {
        let (index, removed, generation) = {
            let mut mirror = self.mirror();
            if let Err(e) = editable_item(&mirror.cart, id).map(|_| ()) {
                return self.reject(e);
            }
            let Some((index, removed)) = mirror.cart.remove_item(id) else {
                return self.reject(CommerceError::ItemNotInCart(id.to_string()));
            };
            let generation = mirror.touch(id);
            (index, removed, generation)
        };
        let name = removed.product.name.clone();
        debug!(item = %id, generation, "optimistic remove");

        let result = {
            let lock = self.item_lock(id);
            let _turn = lock.lock().await;
            self.state.client().remove_cart_item(id).await
        };

        let outcome = {
            let mut mirror = self.mirror();
            mirror.settle(id);
            match result {
                Ok(()) => {
                    mirror.confirmed.remove(id);
                    info!(item = %id, "removed from cart");
                    Ok(())
                }
                Err(e) if mirror.generation(id) == generation => {
                    let restored = mirror.restore_point(id, removed);
                    mirror.cart.insert_item(index, restored);
                    Err(Failure::RolledBack(e))
                }
                Err(e) => Err(Failure::Superseded(e)),
            }
        };
        self.finish(outcome, "remove", format!("{name} removed from cart"))
            .await
    }

    /// Notify, log and refetch after a remote call settled.
    async fn finish(
        &self,
        outcome: Result<(), Failure>,
        op: &'static str,
        success: String,
    ) -> SyncOutcome {
        match outcome {
            Ok(()) => {
                self.state.notify(Notification::success(success));
                if let Err(e) = self.refresh().await {
                    warn!(op, error = %e, "cart refetch failed; keeping local copy");
                }
                SyncOutcome::Applied
            }
            Err(Failure::RolledBack(e)) => {
                let class = ErrorClass::of(&e);
                warn!(op, class = class.as_str(), error = %e, "cart sync failed, rolled back");
                self.state.notify(Notification::failure(class));
                SyncOutcome::RolledBack(class)
            }
            Err(Failure::Superseded(e)) => {
                let class = ErrorClass::of(&e);
                warn!(op, class = class.as_str(), error = %e, "stale cart sync failed, newer change kept");
                self.state.notify(Notification::failure(class));
                SyncOutcome::Superseded(class)
            }
        }
    }

    fn reject(&self, error: CommerceError) -> SyncOutcome {
        debug!(error = %error, "cart change rejected locally");
        self.state.notify(Notification::error(error.to_string()));
        SyncOutcome::Rejected(error)
    }

    fn item_lock(&self, id: &CartItemId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .item_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(id.clone()).or_default().clone()
    }

    fn mirror(&self) -> MutexGuard<'_, Mirror> {
        self.mirror
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Remote failure, split by whether the local change was undone.
enum Failure {
    RolledBack(FetchError),
    Superseded(FetchError),
}

fn build_item(
    product: Product,
    transaction_type: TransactionType,
    quantity: i64,
    rental_start: Option<DateTime<Utc>>,
    rental_end: Option<DateTime<Utc>>,
) -> Result<CartItem, CommerceError> {
    let rental = match (rental_start, rental_end) {
        (Some(start), Some(end)) => Some(RentalPeriod::new(start, end)?),
        (None, None) => None,
        _ => return Err(CommerceError::MissingRentalPeriod),
    };
    CartItem::new(product, transaction_type, quantity, rental)
}

/// Items still waiting on their add request cannot be edited yet.
fn editable_item<'a>(cart: &'a Cart, id: &CartItemId) -> Result<&'a CartItem, CommerceError> {
    match cart.get_item(id) {
        Some(item) if !item.id.is_placeholder() => Ok(item),
        _ => Err(CommerceError::ItemNotInCart(id.to_string())),
    }
}

fn apply_update(
    cart: &mut Cart,
    id: &CartItemId,
    update: &CartItemUpdate,
) -> Result<(), CommerceError> {
    if let Some(quantity) = update.quantity {
        validate_quantity(quantity)?;
        cart.set_quantity(id, quantity);
    }
    if let Some(start) = update.rental_start {
        cart.set_rental_start(id, start)?;
    }
    if let Some(end) = update.rental_end {
        cart.set_rental_end(id, end)?;
    }
    if let Some(item) = cart.get_item(id) {
        if let Some(days) = item.rental_days() {
            item.product.check_rental_days(days)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Level;
    use crate::state::testing::{harness, Harness};
    use chrono::TimeZone;
    use playrent_commerce::catalog::TransactionMode;
    use playrent_commerce::money::{Currency, Money};
    use playrent_data::Method;
    use std::time::Duration;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap()
    }

    fn catan() -> Product {
        Product::new("p1", "Catan", TransactionMode::Both)
            .with_sale_price(Money::from_major(50, Currency::USD))
            .with_rental_price(Money::from_major(5, Currency::USD))
            .with_rental_limits(1, 14)
    }

    fn sale_line(id: &str, quantity: i64) -> CartItem {
        CartItem::new(catan(), TransactionType::Sale, quantity, None)
            .unwrap()
            .with_id(id)
    }

    /// A store whose mirror already holds `items`.
    async fn seeded(h: &Harness, items: Vec<CartItem>) -> CartStore {
        h.mock
            .reply(Method::Get, "/api/cart", 200, &Cart::from_items(items));
        let store = CartStore::new(h.state.clone());
        store.load().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_add_replaces_placeholder_with_server_item() {
        let h = harness();
        let store = CartStore::new(h.state.clone());
        h.mock
            .reply(Method::Post, "/api/cart", 201, &sale_line("ci-1", 2))
            .reply(
                Method::Get,
                "/api/cart",
                200,
                &Cart::from_items(vec![sale_line("ci-1", 2)]),
            );

        let outcome = store
            .add_to_cart(catan(), TransactionType::Sale, 2, None, None)
            .await;

        assert_eq!(outcome, SyncOutcome::Applied);
        let cart = store.cart();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].id.as_str(), "ci-1");
        assert_eq!(h.notifier.last().unwrap().level, Level::Success);
        assert_eq!(h.mock.count(Method::Get, "/api/cart"), 1);
    }

    #[tokio::test]
    async fn test_add_unauthorized_leaves_cart_unchanged() {
        let h = harness();
        let store = seeded(&h, vec![sale_line("ci-1", 1)]).await;
        let before = store.cart();
        h.mock.reply(
            Method::Post,
            "/api/cart",
            401,
            &serde_json::json!({ "message": "unauthorized" }),
        );

        let outcome = store
            .add_to_cart(catan(), TransactionType::Rent, 1, Some(day(1)), Some(day(4)))
            .await;

        assert_eq!(outcome, SyncOutcome::RolledBack(ErrorClass::SignInRequired));
        assert_eq!(store.cart(), before);
        let last = h.notifier.last().unwrap();
        assert_eq!(last.class, Some(ErrorClass::SignInRequired));
        assert_eq!(last.message, "Please sign in to continue");
    }

    #[tokio::test]
    async fn test_add_rejects_rental_outside_limits() {
        let h = harness();
        let store = CartStore::new(h.state.clone());

        let outcome = store
            .add_to_cart(catan(), TransactionType::Rent, 1, Some(day(1)), Some(day(31)))
            .await;

        assert!(matches!(
            outcome,
            SyncOutcome::Rejected(CommerceError::RentalPeriodOutOfRange { .. })
        ));
        assert!(h.mock.requests().is_empty());
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_zero_quantity() {
        let h = harness();
        let store = CartStore::new(h.state.clone());

        let outcome = store
            .add_to_cart(catan(), TransactionType::Sale, 0, None, None)
            .await;

        assert_eq!(outcome, SyncOutcome::Rejected(CommerceError::InvalidQuantity(0)));
        assert!(h.mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_rolls_back() {
        let h = harness();
        let store = seeded(&h, vec![sale_line("ci-1", 1)]).await;
        h.mock.reply(
            Method::Patch,
            "/api/cart",
            500,
            &serde_json::json!({ "message": "boom" }),
        );

        let outcome = store
            .update_cart_item(&CartItemId::new("ci-1"), CartItemUpdate::quantity(4))
            .await;

        assert_eq!(outcome, SyncOutcome::RolledBack(ErrorClass::Server));
        assert_eq!(store.cart().items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_update_zero_quantity_never_sent() {
        let h = harness();
        let store = seeded(&h, vec![sale_line("ci-1", 3)]).await;

        let outcome = store
            .update_cart_item(&CartItemId::new("ci-1"), CartItemUpdate::quantity(0))
            .await;

        assert!(matches!(outcome, SyncOutcome::Rejected(_)));
        assert_eq!(store.cart().items[0].quantity, 3);
        assert_eq!(h.mock.count(Method::Patch, "/api/cart"), 0);
    }

    #[tokio::test]
    async fn test_update_rental_start_sends_clamped_window() {
        let h = harness();
        let rental = CartItem::new(
            catan(),
            TransactionType::Rent,
            1,
            Some(RentalPeriod::new(day(1), day(4)).unwrap()),
        )
        .unwrap()
        .with_id("ci-r");
        let store = seeded(&h, vec![rental.clone()]).await;

        let mut moved = rental.clone();
        moved.rental_start = Some(day(6));
        moved.rental_end = Some(day(6));
        h.mock
            .reply(Method::Patch, "/api/cart", 200, &moved)
            .reply(Method::Get, "/api/cart", 200, &Cart::from_items(vec![moved.clone()]));

        let outcome = store
            .update_cart_item(
                &CartItemId::new("ci-r"),
                CartItemUpdate::rental(Some(day(6)), None),
            )
            .await;

        assert_eq!(outcome, SyncOutcome::Applied);
        let sent: serde_json::Value = h
            .mock
            .requests()
            .into_iter()
            .find(|r| r.method() == Method::Patch)
            .and_then(|r| r.body_json())
            .unwrap();
        assert_eq!(sent["rentalStart"], sent["rentalEnd"]);
        assert_eq!(store.cart().items[0].rental_days(), Some(1));
    }

    #[tokio::test]
    async fn test_failed_remove_restores_position() {
        let h = harness();
        let store = seeded(&h, vec![sale_line("ci-1", 1), sale_line("ci-2", 1)]).await;
        h.mock
            .fail(Method::Delete, "/api/cart", FetchError::Connect("reset".into()))
            .fail(Method::Delete, "/api/cart", FetchError::Connect("reset".into()));

        let outcome = store.remove_from_cart(&CartItemId::new("ci-1")).await;

        assert_eq!(outcome, SyncOutcome::RolledBack(ErrorClass::Network));
        let ids: Vec<_> = store.cart().items.iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids, vec!["ci-1", "ci-2"]);
    }

    #[tokio::test]
    async fn test_stale_failure_keeps_newer_update() {
        let h = harness();
        let store = seeded(&h, vec![sale_line("ci-1", 1)]).await;
        h.mock
            .fail_after(
                Duration::from_millis(30),
                Method::Patch,
                "/api/cart",
                FetchError::Timeout,
            )
            .reply(Method::Patch, "/api/cart", 200, &sale_line("ci-1", 3))
            .reply(
                Method::Get,
                "/api/cart",
                200,
                &Cart::from_items(vec![sale_line("ci-1", 3)]),
            );
        let id = CartItemId::new("ci-1");

        let (first, second) = tokio::join!(
            store.update_cart_item(&id, CartItemUpdate::quantity(2)),
            store.update_cart_item(&id, CartItemUpdate::quantity(3)),
        );

        assert_eq!(first, SyncOutcome::Superseded(ErrorClass::Network));
        assert_eq!(second, SyncOutcome::Applied);
        assert_eq!(store.cart().items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_two_failed_updates_restore_server_quantity() {
        let h = harness();
        let store = seeded(&h, vec![sale_line("ci-1", 1)]).await;
        h.mock
            .fail_after(
                Duration::from_millis(30),
                Method::Patch,
                "/api/cart",
                FetchError::Connect("reset".into()),
            )
            .fail(Method::Patch, "/api/cart", FetchError::Connect("reset".into()));
        let id = CartItemId::new("ci-1");

        let (first, second) = tokio::join!(
            store.update_cart_item(&id, CartItemUpdate::quantity(2)),
            store.update_cart_item(&id, CartItemUpdate::quantity(3)),
        );

        assert_eq!(first, SyncOutcome::Superseded(ErrorClass::Network));
        assert_eq!(second, SyncOutcome::RolledBack(ErrorClass::Network));
        assert_eq!(store.cart().items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_failed_update_after_accepted_one_keeps_accepted_state() {
        let h = harness();
        let store = seeded(&h, vec![sale_line("ci-1", 1)]).await;
        h.mock
            .reply_after(
                Duration::from_millis(20),
                Method::Patch,
                "/api/cart",
                200,
                &sale_line("ci-1", 2),
            )
            .fail(Method::Patch, "/api/cart", FetchError::Connect("reset".into()))
            .reply(
                Method::Get,
                "/api/cart",
                200,
                &Cart::from_items(vec![sale_line("ci-1", 2)]),
            );
        let id = CartItemId::new("ci-1");

        let (first, second) = tokio::join!(
            store.update_cart_item(&id, CartItemUpdate::quantity(2)),
            store.update_cart_item(&id, CartItemUpdate::quantity(3)),
        );

        assert_eq!(first, SyncOutcome::Applied);
        assert_eq!(second, SyncOutcome::RolledBack(ErrorClass::Network));
        assert_eq!(store.cart().items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_failed_remove_after_failed_update_restores_server_item() {
        let h = harness();
        let store = seeded(&h, vec![sale_line("ci-1", 1)]).await;
        h.mock
            .fail_after(
                Duration::from_millis(30),
                Method::Patch,
                "/api/cart",
                FetchError::Connect("reset".into()),
            )
            .fail(Method::Delete, "/api/cart", FetchError::Connect("reset".into()))
            .fail(Method::Delete, "/api/cart", FetchError::Connect("reset".into()));
        let id = CartItemId::new("ci-1");

        let (update, remove) = tokio::join!(
            store.update_cart_item(&id, CartItemUpdate::quantity(4)),
            store.remove_from_cart(&id),
        );

        assert_eq!(update, SyncOutcome::Superseded(ErrorClass::Network));
        assert_eq!(remove, SyncOutcome::RolledBack(ErrorClass::Network));
        let cart = store.cart();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_same_item_requests_go_out_in_issue_order() {
        let h = harness();
        let store = seeded(&h, vec![sale_line("ci-1", 1)]).await;
        h.mock
            .reply_after(
                Duration::from_millis(20),
                Method::Patch,
                "/api/cart",
                200,
                &sale_line("ci-1", 2),
            )
            .reply(Method::Patch, "/api/cart", 200, &sale_line("ci-1", 5));
        let id = CartItemId::new("ci-1");

        let _ = tokio::join!(
            store.update_cart_item(&id, CartItemUpdate::quantity(2)),
            store.update_cart_item(&id, CartItemUpdate::quantity(5)),
        );

        let sent: Vec<i64> = h
            .mock
            .requests()
            .iter()
            .filter(|r| r.method() == Method::Patch)
            .filter_map(|r| r.body_json::<serde_json::Value>())
            .filter_map(|b| b["quantity"].as_i64())
            .collect();
        assert_eq!(sent, vec![2, 5]);
    }

    #[tokio::test]
    async fn test_placeholder_cannot_be_edited() {
        let h = harness();
        let store = CartStore::new(h.state.clone());
        store
            .mirror()
            .cart
            .add_item(CartItem::new(catan(), TransactionType::Sale, 1, None).unwrap());
        let placeholder = store.cart().items[0].id.clone();

        let outcome = store.remove_from_cart(&placeholder).await;
        assert!(matches!(outcome, SyncOutcome::Rejected(CommerceError::ItemNotInCart(_))));
    }

    #[test]
    fn test_reconcile_keeps_busy_items() {
        let mut mirror = Mirror::default();
        mirror.cart = Cart::from_items(vec![sale_line("ci-1", 4), sale_line("ci-2", 1)]);
        mirror.touch(&CartItemId::new("ci-1"));

        mirror.reconcile(Cart::from_items(vec![
            sale_line("ci-1", 1),
            sale_line("ci-2", 7),
        ]));

        assert_eq!(mirror.cart.items[0].quantity, 4);
        assert_eq!(mirror.cart.items[1].quantity, 7);
    }
}
