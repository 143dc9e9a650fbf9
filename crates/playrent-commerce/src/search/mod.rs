//! Catalog search module.
//!
//! Contains filters, sorting and pagination for product listings.

mod filter;
mod query;
mod results;

pub use filter::Filter;
pub use query::{CatalogQuery, SortOption, DEFAULT_PAGE_SIZE};
pub use results::{Pagination, ProductPage, SearchResults};
