//! Catalog query builder.

use crate::catalog::Product;
use crate::search::{Filter, Pagination, SearchResults};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Sort options for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    /// Newest first.
    #[default]
    Newest,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by name Z-A.
    NameDesc,
    /// Biggest discount first.
    Discount,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Newest => "newest",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::NameAsc => "name-asc",
            SortOption::NameDesc => "name-desc",
            SortOption::Discount => "discount",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        [
            SortOption::Newest,
            SortOption::PriceAsc,
            SortOption::PriceDesc,
            SortOption::NameAsc,
            SortOption::NameDesc,
            SortOption::Discount,
        ]
        .into_iter()
        .find(|o| o.as_str() == s)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Newest => "Newest",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::NameAsc => "Name: A-Z",
            SortOption::NameDesc => "Name: Z-A",
            SortOption::Discount => "Biggest Discount",
        }
    }

    /// Compare two products. Products without a price sort last on price.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let price = |p: &Product| p.display_price().map(|m| m.amount_cents);
        match self {
            SortOption::Newest => b.created_at.cmp(&a.created_at),
            SortOption::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortOption::NameDesc => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
            SortOption::Discount => b.discount_percentage.cmp(&a.discount_percentage),
            SortOption::PriceAsc => match (price(a), price(b)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortOption::PriceDesc => match (price(a), price(b)) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

/// A catalog query: remote listing parameters plus local refinement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    /// Remote category parameter.
    pub category: Option<String>,
    /// Remote search parameter; also matched locally.
    pub search: Option<String>,
    /// Local filters.
    pub filters: Vec<Filter>,
    /// Sort option.
    pub sort: SortOption,
    /// Current page (1-indexed).
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogQuery {
    /// Create a new query.
    pub fn new() -> Self {
        Self {
            category: None,
            search: None,
            filters: Vec::new(),
            sort: SortOption::default(),
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the text query.
    pub fn with_search(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        if !q.trim().is_empty() {
            self.search = Some(q);
        }
        self
    }

    /// Set the remote category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Add a filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Set pagination.
    pub fn with_pagination(mut self, page: i64, per_page: i64) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.clamp(1, 100);
        self
    }

    /// Zero-based offset of the first item on the page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// Query string parameters for `GET /api/products`.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("limit", self.per_page.to_string()));
        params
    }

    /// Check whether a product passes the text query and all filters.
    pub fn matches(&self, product: &Product) -> bool {
        let text_ok = self
            .search
            .as_ref()
            .map_or(true, |q| Filter::text(q.clone()).matches(product));
        text_ok && self.filters.iter().all(|f| f.matches(product))
    }

    /// Filter, sort and paginate an in-memory product list.
    pub fn apply(&self, products: &[Product]) -> SearchResults<Product> {
        let mut matched: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));

        let total = matched.len() as i64;
        let items = matched
            .into_iter()
            .skip(self.offset().max(0) as usize)
            .take(self.per_page.max(0) as usize)
            .cloned()
            .collect();

        SearchResults::new(items, Pagination::new(self.page, self.per_page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TransactionMode;
    use crate::money::{Currency, Money};
    use chrono::{Duration, Utc};

    fn catalog() -> Vec<Product> {
        let now = Utc::now();
        let names = ["Azul", "Brass", "Catan", "Dixit", "Everdell"];
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut p = Product::new(format!("p{i}"), *name, TransactionMode::Sale)
                    .with_sale_price(Money::from_major(10 * (5 - i as i64), Currency::USD))
                    .with_discount(if i % 2 == 0 { 10 } else { 0 });
                p.created_at = now - Duration::days(i as i64);
                p
            })
            .collect()
    }

    #[test]
    fn test_query_builder() {
        let query = CatalogQuery::new()
            .with_search("catan")
            .with_sort(SortOption::PriceAsc)
            .with_pagination(2, 10);

        assert_eq!(query.page, 2);
        assert_eq!(query.offset(), 10);
        assert_eq!(
            query.to_params(),
            vec![
                ("search", "catan".to_string()),
                ("page", "2".to_string()),
                ("limit", "10".to_string())
            ]
        );
    }

    #[test]
    fn test_apply_sorts_and_paginates() {
        let results = CatalogQuery::new()
            .with_sort(SortOption::PriceAsc)
            .with_pagination(1, 2)
            .apply(&catalog());

        assert_eq!(results.len(), 2);
        assert_eq!(results.items[0].name, "Everdell");
        assert_eq!(results.pagination.total, 5);
        assert_eq!(results.pagination.total_pages, 3);
        assert!(results.pagination.has_next);
    }

    #[test]
    fn test_apply_filters() {
        let results = CatalogQuery::new()
            .with_filter(Filter::Discounted)
            .with_sort(SortOption::NameDesc)
            .apply(&catalog());
        let names: Vec<_> = results.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Everdell", "Catan", "Azul"]);
    }

    #[test]
    fn test_newest_first_by_default() {
        let results = CatalogQuery::new().apply(&catalog());
        assert_eq!(results.items[0].name, "Azul");
    }

    #[test]
    fn test_sort_option_parsing() {
        assert_eq!(SortOption::from_str("price-desc"), Some(SortOption::PriceDesc));
        assert_eq!(SortOption::from_str("rating"), None);
    }
}
