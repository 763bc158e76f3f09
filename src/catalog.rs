//! Product catalog
//!
//! Holds the last fetched collection and derives the page to display from
//! it, the search text and the page number. The displayed rows are always a
//! pure function of those three values.

use std::ops::RangeInclusive;

use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::{api::ApiError, products::Product};

/// Number of products per page.
pub const PAGE_SIZE: usize = 8;

/// Shown while the first fetch is outstanding.
pub const LOADING_MESSAGE: &str = "Chargement...";

/// Shown when a search matches nothing.
pub const NO_RESULTS_MESSAGE: &str = "Aucun produit ne correspond à votre recherche.";

const FETCH_FAILURE_PREFIX: &str = "Impossible de charger les produits.";

/// Body of a product listing response.
///
/// The backend sends either a bare array or an envelope (e.g. a paginator)
/// holding the array in `data`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProductsPayload {
    /// A bare array of products.
    List(Vec<Product>),

    /// An object carrying the products in `data`.
    Envelope {
        /// Products, absent when the envelope is empty
        #[serde(default)]
        data: Option<Vec<Product>>,
    },
}

impl ProductsPayload {
    /// Normalises the payload into products ordered newest first.
    pub fn into_products(self) -> Vec<Product> {
        let mut products = match self {
            ProductsPayload::List(products) => products,
            ProductsPayload::Envelope { data } => data.unwrap_or_default(),
        };

        sort_newest_first(&mut products);

        products
    }
}

/// Sorts products by identifier, numerically descending.
pub fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(|left, right| left.id.cmp_newest_first(&right.id));
}

/// Products matching `query` in title, category or description, ignoring
/// case. An empty query matches every product.
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    if query.is_empty() {
        return products.iter().collect();
    }

    let needle = query.to_lowercase();

    products
        .iter()
        .filter(|product| product.matches(&needle))
        .collect()
}

/// Number of pages needed for `total` products.
pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// Items on the 1-based `page`, empty when the page is out of range.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE);
    let end = start.saturating_add(PAGE_SIZE).min(items.len());

    items.get(start..end).unwrap_or_default()
}

/// Navigation state for the displayed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based current page
    pub current_page: usize,

    /// Total number of pages
    pub page_count: usize,
}

impl Pagination {
    /// Pagination for `total` filtered products.
    pub fn new(total: usize, current_page: usize) -> Self {
        Self {
            current_page,
            page_count: page_count(total),
        }
    }

    /// Whether the previous control is enabled.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Whether the next control is enabled.
    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count
    }

    /// Whether navigation controls are shown at all.
    pub fn is_visible(&self) -> bool {
        self.page_count > 1
    }

    /// Page numbers to offer.
    pub fn pages(&self) -> RangeInclusive<usize> {
        1..=self.page_count
    }
}

/// Identifies the fetch a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// What applying a fetch result did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchApplied {
    /// The collection was replaced.
    Loaded {
        /// Number of products received
        count: usize,
    },

    /// The fetch failed and there is nothing to show.
    Failed {
        /// Message shown in the error panel
        message: String,
    },

    /// The fetch failed but older products stay on screen.
    KeptStale {
        /// Message that was only logged
        message: String,
    },

    /// A newer fetch was started since; the result was dropped.
    Discarded,
}

/// What the catalog should render.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView<'a> {
    /// First load in progress.
    Loading,

    /// Nothing to show because the fetch failed; offer a reload.
    Unavailable {
        /// Human readable failure
        message: &'a str,
    },

    /// The filtered, paginated listing.
    Listing(Listing<'a>),
}

/// A page of the filtered catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<'a> {
    /// Section heading
    pub heading: String,

    /// Number of products matching the search
    pub total: usize,

    /// Products on the current page
    pub rows: Vec<&'a Product>,

    /// Navigation state
    pub pagination: Pagination,

    /// Whether to show the "no results" notice
    pub no_results: bool,
}

impl Listing<'_> {
    /// Result count line.
    pub fn count_label(&self) -> String {
        format!("{} produits trouvés", self.total)
    }
}

/// Catalog state.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    search: String,
    current_page: usize,
    loading: bool,
    error: Option<String>,
    latest_fetch: u64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            search: String::new(),
            current_page: 1,
            loading: false,
            error: None,
            latest_fetch: 0,
        }
    }
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last fetched products, newest first.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Current search text.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// 1-based current page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Whether a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Failure message shown in the error panel, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Products matching the current search.
    pub fn filtered(&self) -> Vec<&Product> {
        filter_products(&self.products, &self.search)
    }

    /// Pagination of the current search.
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.filtered().len(), self.current_page)
    }

    /// Replaces the search text and goes back to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.current_page = 1;
    }

    /// Jumps to `page` if it exists. Returns whether the page changed.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page == 0 || page > self.pagination().page_count || page == self.current_page {
            return false;
        }

        self.current_page = page;

        true
    }

    /// Moves to the next page, if any.
    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page.saturating_add(1))
    }

    /// Moves to the previous page, if any.
    pub fn previous_page(&mut self) -> bool {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    /// Starts a fetch. Only the result of the latest ticket is applied.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_fetch = self.latest_fetch.saturating_add(1);
        self.loading = true;
        self.error = None;

        FetchTicket(self.latest_fetch)
    }

    /// Applies the outcome of the fetch started with `ticket`.
    ///
    /// A successful fetch replaces the collection wholesale. A failed fetch
    /// surfaces an error only when there is no collection to fall back on.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ProductsPayload, ApiError>,
    ) -> FetchApplied {
        if ticket.0 != self.latest_fetch {
            debug!(
                ticket = ticket.0,
                latest = self.latest_fetch,
                "discarding stale catalog response"
            );

            return FetchApplied::Discarded;
        }

        self.loading = false;

        match result {
            Ok(payload) => {
                self.products = payload.into_products();
                self.clamp_page();

                info!(count = self.products.len(), "catalog loaded");

                FetchApplied::Loaded {
                    count: self.products.len(),
                }
            }
            Err(api_error) => {
                let message = fetch_failure_message(&api_error);

                if self.products.is_empty() {
                    error!(error = %api_error, "failed to load catalog");

                    self.error = Some(message.clone());

                    FetchApplied::Failed { message }
                } else {
                    warn!(
                        error = %api_error,
                        stale = self.products.len(),
                        "failed to refresh catalog, keeping previous products"
                    );

                    FetchApplied::KeptStale { message }
                }
            }
        }
    }

    /// What to render for the current state.
    pub fn view(&self) -> CatalogView<'_> {
        if self.loading && self.products.is_empty() {
            return CatalogView::Loading;
        }

        if let Some(message) = self.error.as_deref().filter(|_| self.products.is_empty()) {
            return CatalogView::Unavailable { message };
        }

        let filtered = self.filtered();
        let pagination = Pagination::new(filtered.len(), self.current_page);

        CatalogView::Listing(Listing {
            heading: heading(&self.search),
            total: filtered.len(),
            rows: page_slice(&filtered, self.current_page).to_vec(),
            pagination,
            no_results: !self.loading && filtered.is_empty(),
        })
    }

    fn clamp_page(&mut self) {
        let pages = self.pagination().page_count;

        self.current_page = self.current_page.clamp(1, pages.max(1));
    }
}

/// Section heading for a search.
pub fn heading(search: &str) -> String {
    if search.is_empty() {
        "Nos Produits".to_string()
    } else {
        format!("Résultats pour \"{search}\"")
    }
}

/// User-facing message for a failed catalog fetch.
pub fn fetch_failure_message(error: &ApiError) -> String {
    let detail = match error {
        ApiError::Validation(_) | ApiError::Server { .. } => {
            format!("Status: {}", error.status().unwrap_or_default())
        }
        ApiError::Network(_) => {
            "Pas de réponse du serveur. Vérifiez que l'API est accessible.".to_string()
        }
        ApiError::Request(text) | ApiError::Decode(text) => text.clone(),
    };

    format!("{FETCH_FAILURE_PREFIX} ({detail})")
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn products(count: u64) -> Vec<Product> {
        (1..=count)
            .map(|id| Product::new(id, format!("Produit {id}")))
            .collect()
    }

    fn loaded(count: u64) -> Catalog {
        let mut catalog = Catalog::new();
        let ticket = catalog.begin_fetch();

        catalog.apply_fetch(ticket, Ok(ProductsPayload::List(products(count))));

        catalog
    }

    fn ids(rows: &[&Product]) -> Vec<String> {
        rows.iter().map(|product| product.id.to_string()).collect()
    }

    #[test]
    fn bare_array_is_sorted_by_numeric_id_descending() -> TestResult {
        let payload: ProductsPayload = serde_json::from_value(json!([
            { "id": 2, "titre": "B" },
            { "id": 10, "titre": "J" },
            { "id": 1, "titre": "A" }
        ]))?;

        let products = payload.into_products();
        let ordered: Vec<String> = products.iter().map(|p| p.id.to_string()).collect();

        assert_eq!(ordered, ["10", "2", "1"]);

        Ok(())
    }

    #[test]
    fn envelope_data_is_unwrapped() -> TestResult {
        let payload: ProductsPayload = serde_json::from_value(json!({
            "current_page": 1,
            "data": [{ "id": "3" }, { "id": "11" }]
        }))?;

        let ordered: Vec<String> = payload
            .into_products()
            .iter()
            .map(|p| p.id.to_string())
            .collect();

        assert_eq!(ordered, ["11", "3"]);

        Ok(())
    }

    #[test]
    fn envelope_without_data_is_empty() -> TestResult {
        let payload: ProductsPayload = serde_json::from_value(json!({ "message": "ok" }))?;

        assert!(payload.into_products().is_empty());

        Ok(())
    }

    #[test]
    fn empty_query_matches_everything() {
        let all = products(3);

        assert_eq!(filter_products(&all, "").len(), 3);
    }

    #[test]
    fn filter_matches_any_field_ignoring_case() {
        let mut yoga = Product::new(1, "Tapis");
        yoga.category = Some("Fitness".to_string());
        let mut trail = Product::new(2, "Chaussure");
        trail.description = Some("Pour le TRAIL".to_string());
        let bag = Product::new(3, "Sac");
        let all = vec![yoga, trail, bag];

        assert_eq!(ids(&filter_products(&all, "FIT")), ["1"]);
        assert_eq!(ids(&filter_products(&all, "trail")), ["2"]);
        assert!(filter_products(&all, "natation").is_empty());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(8), 1);
        assert_eq!(page_count(9), 2);
        assert_eq!(page_count(17), 3);
    }

    #[test]
    fn page_slice_is_bounded() {
        let items: Vec<usize> = (0..10).collect();

        assert_eq!(page_slice(&items, 1), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(page_slice(&items, 2), &[8, 9]);
        assert!(page_slice(&items, 3).is_empty());
        assert!(page_slice(&items, 0).len() <= PAGE_SIZE);
    }

    #[test]
    fn navigation_controls_follow_bounds() {
        let first = Pagination::new(20, 1);
        let middle = Pagination::new(20, 2);
        let last = Pagination::new(20, 3);

        assert!(!first.has_previous() && first.has_next());
        assert!(middle.has_previous() && middle.has_next());
        assert!(last.has_previous() && !last.has_next());
        assert!(!Pagination::new(0, 1).is_visible());
        assert!(!Pagination::new(8, 1).is_visible());
        assert_eq!(last.pages(), 1..=3);
    }

    #[test]
    fn search_resets_page() {
        let mut catalog = loaded(20);

        assert!(catalog.go_to_page(3));

        catalog.set_search("Produit");

        assert_eq!(catalog.current_page(), 1);
    }

    #[test]
    fn go_to_page_ignores_out_of_range() {
        let mut catalog = loaded(10);

        assert!(!catalog.go_to_page(0));
        assert!(!catalog.go_to_page(3));
        assert!(catalog.next_page());
        assert!(!catalog.next_page());
        assert_eq!(catalog.current_page(), 2);
        assert!(catalog.previous_page());
        assert!(!catalog.previous_page());
    }

    #[test]
    fn listing_shows_current_page_newest_first() -> TestResult {
        let mut catalog = loaded(10);

        catalog.next_page();

        let CatalogView::Listing(listing) = catalog.view() else {
            return Err("expected a listing".into());
        };

        assert_eq!(listing.heading, "Nos Produits");
        assert_eq!(listing.total, 10);
        assert_eq!(listing.count_label(), "10 produits trouvés");
        assert_eq!(ids(&listing.rows), ["2", "1"]);
        assert!(!listing.no_results);

        Ok(())
    }

    #[test]
    fn listing_flags_empty_search() -> TestResult {
        let mut catalog = loaded(3);

        catalog.set_search("introuvable");

        let CatalogView::Listing(listing) = catalog.view() else {
            return Err("expected a listing".into());
        };

        assert_eq!(listing.heading, "Résultats pour \"introuvable\"");
        assert!(listing.no_results);
        assert!(!listing.pagination.is_visible());

        Ok(())
    }

    #[test]
    fn loading_view_only_while_empty() {
        let mut catalog = Catalog::new();
        catalog.begin_fetch();

        assert_eq!(catalog.view(), CatalogView::Loading);

        let mut refreshed = loaded(2);
        refreshed.begin_fetch();

        assert!(matches!(refreshed.view(), CatalogView::Listing(_)));
    }

    #[test]
    fn failure_without_data_shows_error_panel() {
        let mut catalog = Catalog::new();
        let ticket = catalog.begin_fetch();

        let applied = catalog.apply_fetch(ticket, Err(ApiError::Network("refused".to_string())));

        let message = "Impossible de charger les produits. (Pas de réponse du serveur. Vérifiez que l'API est accessible.)";

        assert_eq!(
            applied,
            FetchApplied::Failed {
                message: message.to_string()
            }
        );
        assert_eq!(catalog.view(), CatalogView::Unavailable { message });
        assert!(!catalog.is_loading());
    }

    #[test]
    fn failure_with_stale_data_keeps_listing() {
        let mut catalog = loaded(4);
        let ticket = catalog.begin_fetch();

        let applied = catalog.apply_fetch(
            ticket,
            Err(ApiError::Server {
                status: 500,
                reason: None,
                message: None,
            }),
        );

        assert!(matches!(applied, FetchApplied::KeptStale { .. }));
        assert_eq!(catalog.error(), None);
        assert_eq!(catalog.products().len(), 4);
        assert!(matches!(catalog.view(), CatalogView::Listing(_)));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut catalog = Catalog::new();
        let slow = catalog.begin_fetch();
        let fast = catalog.begin_fetch();

        catalog.apply_fetch(fast, Ok(ProductsPayload::List(products(2))));
        let applied = catalog.apply_fetch(slow, Ok(ProductsPayload::List(products(9))));

        assert_eq!(applied, FetchApplied::Discarded);
        assert_eq!(catalog.products().len(), 2);
    }

    #[test]
    fn refetch_clamps_page_to_new_bounds() {
        let mut catalog = loaded(20);
        catalog.go_to_page(3);

        let ticket = catalog.begin_fetch();
        catalog.apply_fetch(ticket, Ok(ProductsPayload::List(products(9))));

        assert_eq!(catalog.current_page(), 2);
    }

    #[test]
    fn fetch_failure_messages_by_kind() {
        assert_eq!(
            fetch_failure_message(&ApiError::Server {
                status: 404,
                reason: Some("Not Found".to_string()),
                message: None,
            }),
            "Impossible de charger les produits. (Status: 404)"
        );
        assert_eq!(
            fetch_failure_message(&ApiError::Decode("expected value".to_string())),
            "Impossible de charger les produits. (expected value)"
        );
    }
}
