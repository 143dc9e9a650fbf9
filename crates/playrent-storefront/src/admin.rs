//! Admin area: orders, product removal and the dashboard.

use crate::catalog::CatalogBrowser;
use crate::notify::Notification;
use crate::state::AppState;
use crate::StorefrontError;
use playrent_cache::QueryTag;
use playrent_commerce::ids::{OrderId, ProductId};
use playrent_commerce::orders::{DashboardSummary, Order, OrderStatus};
use playrent_data::{ErrorClass, FetchError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Number of best sellers shown on the dashboard.
pub const DEFAULT_TOP_PRODUCTS: usize = 5;

pub struct AdminService {
    state: Arc<AppState>,
}

impl AdminService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// All orders, newest first.
    pub async fn orders(&self) -> Result<Vec<Order>, StorefrontError> {
        let client = self.state.client();
        let mut orders: Vec<Order> = self
            .state
            .queries()
            .get_or_fetch("orders", vec![QueryTag::Orders], || async {
                client.list_orders().await.map_err(StorefrontError::from)
            })
            .await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Move an order to a new status.
    ///
    /// The transition is checked before anything is sent; setting the
    /// current status returns the order untouched.
    pub async fn set_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, StorefrontError> {
        let order = self
            .orders()
            .await?
            .into_iter()
            .find(|o| &o.id == id)
            .ok_or_else(|| StorefrontError::OrderNotFound(id.clone()))?;

        if !order.status.transition(status)? {
            debug!(order = %id, status = status.as_str(), "order already in status");
            return Ok(order);
        }

        let updated = self
            .remote(self.state.client().update_order_status(id, status).await)?;
        self.state.queries().invalidate(&QueryTag::Orders)?;
        info!(
            order = %id,
            from = order.status.as_str(),
            to = status.as_str(),
            "order status changed"
        );
        self.state.notify(Notification::success(format!(
            "Order marked {}",
            status.display_name()
        )));
        Ok(updated)
    }

    pub async fn delete_product(&self, id: &ProductId) -> Result<(), StorefrontError> {
        self.remote(self.state.client().delete_product(id).await)?;
        self.state
            .queries()
            .invalidate_all_of(&[QueryTag::Products, QueryTag::Product(id.clone())])?;
        info!(product = %id, "product deleted");
        self.state.notify(Notification::success("Product deleted"));
        Ok(())
    }

    /// Dashboard figures from every order and product.
    pub async fn dashboard(&self, top_n: usize) -> Result<DashboardSummary, StorefrontError> {
        let catalog = CatalogBrowser::new(self.state.clone());
        let (orders, products) = futures::try_join!(self.orders(), catalog.all())?;
        Ok(DashboardSummary::compute(&orders, &products, top_n)?)
    }

    fn remote<T>(&self, result: Result<T, FetchError>) -> Result<T, StorefrontError> {
        result.map_err(|e| {
            let class = ErrorClass::of(&e);
            warn!(class = class.as_str(), error = %e, "admin request failed");
            self.state.notify(Notification::failure(class));
            e.into()
        })
    }
}
