//! Catalog browsing through the query cache.

use crate::state::AppState;
use crate::StorefrontError;
use playrent_cache::QueryTag;
use playrent_commerce::catalog::Product;
use playrent_commerce::ids::ProductId;
use playrent_commerce::search::{CatalogQuery, ProductPage, SearchResults};
use std::sync::Arc;

/// Largest page the API serves.
const MAX_PAGE_SIZE: i64 = 100;

/// Read-side of the catalog.
pub struct CatalogBrowser {
    state: Arc<AppState>,
}

impl CatalogBrowser {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// One page of the remote listing, refined by the query's local
    /// filters and sort order.
    ///
    /// Pagination reflects the server's totals.
    pub async fn browse(&self, query: &CatalogQuery) -> Result<SearchResults<Product>, StorefrontError> {
        let page = self.page(query).await?;
        let mut results = page.into_results(query.page, query.per_page);
        results.items.retain(|p| query.matches(p));
        results.items.sort_by(|a, b| query.sort.compare(a, b));
        Ok(results)
    }

    /// Raw remote page.
    pub async fn page(&self, query: &CatalogQuery) -> Result<ProductPage, StorefrontError> {
        let client = self.state.client();
        self.state
            .queries()
            .get_or_fetch(&listing_key(query), vec![QueryTag::Products], || async {
                client.list_products(query).await.map_err(StorefrontError::from)
            })
            .await
    }

    /// Every product in the catalog, fetched page by page.
    pub async fn all(&self) -> Result<Vec<Product>, StorefrontError> {
        let mut products = Vec::new();
        let mut page = 1;
        loop {
            let query = CatalogQuery::new().with_pagination(page, MAX_PAGE_SIZE);
            let batch = self.page(&query).await?;
            let fetched = batch.products.len();
            products.extend(batch.products);
            if fetched == 0 || products.len() as i64 >= batch.total {
                return Ok(products);
            }
            page += 1;
        }
    }

    /// Filter, sort and paginate products already in memory.
    pub fn search_local(&self, products: &[Product], query: &CatalogQuery) -> SearchResults<Product> {
        query.apply(products)
    }

    /// A single product.
    pub async fn product(&self, id: &ProductId) -> Result<Product, StorefrontError> {
        let client = self.state.client();
        self.state
            .queries()
            .get_or_fetch(
                &format!("product:{id}"),
                vec![QueryTag::Products, QueryTag::Product(id.clone())],
                || async { client.get_product(id).await.map_err(StorefrontError::from) },
            )
            .await
    }
}

fn listing_key(query: &CatalogQuery) -> String {
    let params: Vec<String> = query
        .to_params()
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    format!("products?{}", params.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::harness;
    use playrent_commerce::catalog::TransactionMode;
    use playrent_commerce::money::{Currency, Money};
    use playrent_commerce::search::{Filter, SortOption};
    use playrent_data::Method;

    fn product(id: &str, name: &str, price: i64) -> Product {
        Product::new(id, name, TransactionMode::Sale)
            .with_sale_price(Money::from_major(price, Currency::USD))
    }

    fn page(products: Vec<Product>, total: i64) -> ProductPage {
        ProductPage { products, total }
    }

    #[tokio::test]
    async fn test_browse_is_cached_per_query() {
        let h = harness();
        h.mock.reply(
            Method::Get,
            "/api/products",
            200,
            &page(vec![product("p1", "Catan", 40), product("p2", "Azul", 30)], 2),
        );
        let browser = CatalogBrowser::new(h.state.clone());
        let query = CatalogQuery::new().with_sort(SortOption::PriceAsc);

        let first = browser.browse(&query).await.unwrap();
        let second = browser.browse(&query).await.unwrap();

        assert_eq!(first.items[0].name, "Azul");
        assert_eq!(first, second);
        assert_eq!(h.mock.count(Method::Get, "/api/products"), 1);
    }

    #[tokio::test]
    async fn test_browse_applies_local_filters() {
        let h = harness();
        h.mock.reply(
            Method::Get,
            "/api/products",
            200,
            &page(vec![product("p1", "Catan", 40), product("p2", "Azul", 30)], 2),
        );
        let browser = CatalogBrowser::new(h.state.clone());
        let query = CatalogQuery::new().with_filter(Filter::text("cat"));

        let results = browser.browse(&query).await.unwrap();
        assert_eq!(results.items.len(), 1);
        assert_eq!(results.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_all_walks_pages() {
        let h = harness();
        let first: Vec<Product> = (0..100)
            .map(|i| product(&format!("p{i}"), "Game", 10))
            .collect();
        h.mock
            .reply(Method::Get, "/api/products", 200, &page(first, 101))
            .reply(
                Method::Get,
                "/api/products",
                200,
                &page(vec![product("p100", "Last", 10)], 101),
            );

        let all = CatalogBrowser::new(h.state.clone()).all().await.unwrap();
        assert_eq!(all.len(), 101);
        assert_eq!(h.mock.count(Method::Get, "/api/products"), 2);
    }

    #[tokio::test]
    async fn test_product_invalidated_by_tag() {
        let h = harness();
        h.mock
            .reply(Method::Get, "/api/products/p1", 200, &product("p1", "Catan", 40))
            .reply(Method::Get, "/api/products/p1", 200, &product("p1", "Catan 2", 40));
        let browser = CatalogBrowser::new(h.state.clone());
        let id = ProductId::new("p1");

        assert_eq!(browser.product(&id).await.unwrap().name, "Catan");
        assert_eq!(browser.product(&id).await.unwrap().name, "Catan");

        h.state
            .queries()
            .invalidate(&QueryTag::Product(id.clone()))
            .unwrap();
        assert_eq!(browser.product(&id).await.unwrap().name, "Catan 2");
    }

    #[test]
    fn test_listing_key_includes_params() {
        let query = CatalogQuery::new().with_search("azul").with_pagination(2, 24);
        assert_eq!(listing_key(&query), "products?search=azul&page=2&limit=24");
    }
}
