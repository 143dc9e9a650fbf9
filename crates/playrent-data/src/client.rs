//! Typed client for the store REST API.

use crate::api::{
    AddToCartRequest, OrderStatusUpdate, RemoveCartItemRequest, UpdateCartItemRequest,
    WishlistToggle, WishlistToggleRequest,
};
use crate::transport::{ReqwestTransport, Transport};
use crate::{FetchError, Method, RequestBuilder, Response, RetryPolicy};
use playrent_commerce::cart::{Cart, CartItem};
use playrent_commerce::catalog::{Product, Wishlist};
use playrent_commerce::form::ProductPayload;
use playrent_commerce::ids::{CartItemId, OrderId, ProductId, TenantId};
use playrent_commerce::orders::{Order, OrderStatus};
use playrent_commerce::search::{CatalogQuery, ProductPage};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Header carrying the tenant of every request.
pub const TENANT_HEADER: &str = "X-Tenant-Id";

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the store, e.g. `https://shop.example.com`.
    pub base_url: String,
    /// Tenant sent in `X-Tenant-Id`.
    pub tenant_id: TenantId,
    /// Session token sent as a bearer token.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy for idempotent requests.
    pub retry: RetryPolicy,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, tenant_id: impl Into<TenantId>) -> Self {
        Self {
            base_url: base_url.into(),
            tenant_id: tenant_id.into(),
            token: None,
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Client for the store API.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
    tenant_id: TenantId,
    token: Option<String>,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Create a client over the given transport.
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self, FetchError> {
        let mut base_url = Url::parse(&config.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            transport,
            base_url,
            tenant_id: config.tenant_id,
            token: config.token,
            retry: config.retry,
        })
    }

    /// Create a client that talks HTTP through `reqwest`.
    pub fn connect(config: ClientConfig) -> Result<Self, FetchError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Self::new(config, Arc::new(transport))
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // === Products ===

    /// `GET /api/products`
    pub async fn list_products(&self, query: &CatalogQuery) -> Result<ProductPage, FetchError> {
        let request = self.request(Method::Get, "api/products")?.query(&query.to_params());
        self.send_json(request).await
    }

    /// `GET /api/products/{id}`
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, FetchError> {
        let request = self.request(Method::Get, &format!("api/products/{id}"))?;
        self.send_json(request).await
    }

    /// `POST /api/products`
    pub async fn create_product(&self, payload: &ProductPayload) -> Result<Product, FetchError> {
        let request = self.request(Method::Post, "api/products")?.json(payload)?;
        self.send_json(request).await
    }

    /// `PUT /api/products/{id}`
    pub async fn update_product(
        &self,
        id: &ProductId,
        payload: &ProductPayload,
    ) -> Result<Product, FetchError> {
        let request = self
            .request(Method::Put, &format!("api/products/{id}"))?
            .json(payload)?;
        self.send_json(request).await
    }

    /// `DELETE /api/products/{id}`
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), FetchError> {
        let request = self.request(Method::Delete, &format!("api/products/{id}"))?;
        self.execute(request).await.map(|_| ())
    }

    // === Cart ===

    /// `GET /api/cart`
    pub async fn get_cart(&self) -> Result<Cart, FetchError> {
        let request = self.request(Method::Get, "api/cart")?;
        self.send_json(request).await
    }

    /// `POST /api/cart`
    pub async fn add_to_cart(&self, body: &AddToCartRequest) -> Result<CartItem, FetchError> {
        let request = self.request(Method::Post, "api/cart")?.json(body)?;
        self.send_json(request).await
    }

    /// `PATCH /api/cart`
    pub async fn update_cart_item(
        &self,
        body: &UpdateCartItemRequest,
    ) -> Result<CartItem, FetchError> {
        let request = self.request(Method::Patch, "api/cart")?.json(body)?;
        self.send_json(request).await
    }

    /// `DELETE /api/cart`
    pub async fn remove_cart_item(&self, id: &CartItemId) -> Result<(), FetchError> {
        let body = RemoveCartItemRequest {
            cart_item_id: id.clone(),
        };
        let request = self.request(Method::Delete, "api/cart")?.json(&body)?;
        self.execute(request).await.map(|_| ())
    }

    // === Wishlist ===

    /// `GET /api/wishlist`
    pub async fn get_wishlist(&self) -> Result<Wishlist, FetchError> {
        let request = self.request(Method::Get, "api/wishlist")?;
        self.send_json(request).await
    }

    /// `POST /api/wishlist`
    pub async fn toggle_wishlist(&self, id: &ProductId) -> Result<WishlistToggle, FetchError> {
        let body = WishlistToggleRequest {
            product_id: id.clone(),
        };
        let request = self.request(Method::Post, "api/wishlist")?.json(&body)?;
        self.send_json(request).await
    }

    // === Orders ===

    /// `GET /api/orders`
    pub async fn list_orders(&self) -> Result<Vec<Order>, FetchError> {
        let request = self.request(Method::Get, "api/orders")?;
        self.send_json(request).await
    }

    /// `PATCH /api/orders/{id}`
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, FetchError> {
        let request = self
            .request(Method::Patch, &format!("api/orders/{id}"))?
            .json(&OrderStatusUpdate { status })?;
        self.send_json(request).await
    }

    // === Plumbing ===

    /// Build a request with the tenant and auth headers.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, FetchError> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        let mut request = RequestBuilder::new(method, url)
            .header(TENANT_HEADER, self.tenant_id.as_str())
            .accept("application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, FetchError> {
        self.execute(request).await?.json()
    }

    /// Send a request, retrying idempotent methods per the retry policy.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let method = request.method();
        let mut attempt = 0;
        loop {
            debug!(
                method = method.as_str(),
                path = request.path(),
                attempt,
                "dispatching request"
            );
            let result = self
                .transport
                .send(request.clone())
                .await
                .and_then(Response::error_for_status);

            match result {
                Ok(response) => return Ok(response),
                Err(error) if self.retry.should_retry(method, &error, attempt) => {
                    let delay = self.retry.backoff.delay_for_attempt(attempt);
                    warn!(
                        method = method.as_str(),
                        path = request.path(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        %error,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("tenant_id", &self.tenant_id)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}
