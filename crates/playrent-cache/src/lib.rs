//! Client-side state for PlayRent.
//!
//! Two layers:
//!
//! - [`Cache`] over a [`KvBackend`] ([`MemoryStore`] or [`FileStore`]), with
//!   [`Persisted`] slices on top: named, versioned JSON documents that
//!   survive restarts and reset to their default when the schema version
//!   changes.
//! - [`QueryCache`]: results of remote reads, tagged with [`QueryTag`]s so a
//!   mutation can drop every query it makes stale.
//!
//! # Example
//!
//! ```rust,ignore
//! use playrent_cache::{QueryCache, QueryTag};
//!
//! let queries = QueryCache::new();
//! let cart = queries
//!     .get_or_fetch("cart", vec![QueryTag::Cart], || client.get_cart())
//!     .await?;
//!
//! // After a cart mutation
//! queries.invalidate(&QueryTag::Cart)?;
//! ```

mod error;
mod kv;
mod query;
mod slice;

pub use error::CacheError;
pub use kv::{Cache, FileStore, KvBackend, MemoryStore};
pub use query::{QueryCache, QueryTag};
pub use slice::{Persisted, SliceData};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, Persisted, QueryCache, QueryTag};
}
