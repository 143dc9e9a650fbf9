//! HTTP data layer for PlayRent.
//!
//! Wraps the store's REST API in a typed async client. Requests go through
//! a [`Transport`], so the network can be swapped for a scripted
//! `MockTransport` in tests (enable the `mock` feature outside this crate).
//!
//! # Example
//!
//! ```rust,ignore
//! use playrent_data::{ApiClient, ClientConfig};
//! use playrent_commerce::search::CatalogQuery;
//!
//! let client = ApiClient::connect(
//!     ClientConfig::new("https://shop.example.com", "tenant-a").with_token(token),
//! )?;
//!
//! let page = client.list_products(&CatalogQuery::new().with_search("catan")).await?;
//! for product in page.products {
//!     println!("{}", product.name);
//! }
//! ```

pub mod api;
mod classify;
mod client;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod request;
mod response;
mod retry;
mod transport;

pub use classify::ErrorClass;
pub use client::{ApiClient, ClientConfig, TENANT_HEADER};
pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;
pub use retry::{BackoffStrategy, RetryCondition, RetryPolicy};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;
pub use transport::{ReqwestTransport, Transport};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ApiClient, ClientConfig, ErrorClass, FetchError, Method, Response};
}
