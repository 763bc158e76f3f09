use leptos::{logging, prelude::*, task};
use storefront::{
    api::ProductsApi,
    catalog::{
        Catalog, CatalogView, FetchApplied, LOADING_MESSAGE, NO_RESULTS_MESSAGE, Pagination,
        heading,
    },
    products::Product,
    refresh::RefreshCounter,
};

use crate::products_api;

/// Owned snapshot of what the catalog renders, so views never hold the
/// signal borrowed.
#[derive(Debug, Clone, PartialEq)]
enum CatalogScreen {
    Loading,
    Unavailable {
        heading: String,
        message: String,
    },
    Listing {
        heading: String,
        count_label: String,
        rows: Vec<Product>,
        pagination: Pagination,
        no_results: bool,
    },
}

impl CatalogScreen {
    fn capture(catalog: &Catalog) -> Self {
        match catalog.view() {
            CatalogView::Loading => Self::Loading,
            CatalogView::Unavailable { message } => Self::Unavailable {
                heading: heading(catalog.search()),
                message: message.to_string(),
            },
            CatalogView::Listing(listing) => Self::Listing {
                count_label: listing.count_label(),
                heading: listing.heading,
                rows: listing.rows.into_iter().cloned().collect(),
                pagination: listing.pagination,
                no_results: listing.no_results,
            },
        }
    }
}

fn load_products(catalog: RwSignal<Catalog>) {
    let Some(ticket) = catalog.try_update(Catalog::begin_fetch) else {
        return;
    };

    task::spawn_local(async move {
        let result = products_api().list_products().await;

        let applied = catalog.try_update(|catalog| catalog.apply_fetch(ticket, result));

        if let Some(FetchApplied::KeptStale { message }) = applied {
            logging::warn!("{message}");
        }
    });
}

fn page_button_class(page: usize, current_page: usize) -> &'static str {
    if page == current_page {
        "btn-primary page-button"
    } else {
        "glass page-button"
    }
}

#[component]
fn SearchBar(catalog: RwSignal<Catalog>) -> impl IntoView {
    view! {
        <header class="navbar glass">
            <div class="navbar-content">
                <div class="logo-text">"EcomSport"</div>
                <input
                    type="text"
                    class="glass search-input"
                    placeholder="Rechercher un produit, une catégorie..."
                    prop:value=move || catalog.with(|catalog| catalog.search().to_string())
                    on:input=move |event| {
                        let search = event_target_value(&event);
                        catalog.update(|catalog| catalog.set_search(search));
                    }
                />
            </div>
        </header>
    }
}

#[component]
fn ProductRow(product: Product) -> impl IntoView {
    let title = product.title().to_string();
    let image_url = product.image_url().to_string();
    let price = product.display_price();

    view! {
        <tr>
            <td>
                <img src=image_url alt=title.clone() class="table-image" />
            </td>
            <td class="product-title">{title}</td>
            <td class="product-description">{product.description().to_string()}</td>
            <td>
                <span class="category-badge">{product.category().to_string()}</span>
            </td>
            <td>
                <span class="price-tag">{price}</span>
            </td>
            <td class="product-actions">
                <button type="button" class="btn-primary btn-small">
                    "Détails"
                </button>
            </td>
        </tr>
    }
}

#[component]
fn PaginationControls(catalog: RwSignal<Catalog>, pagination: Pagination) -> impl IntoView {
    if !pagination.is_visible() {
        return ().into_any();
    }

    let current_page = pagination.current_page;

    view! {
        <nav class="pagination" aria-label="Pagination">
            <button
                type="button"
                class="glass page-step"
                disabled=!pagination.has_previous()
                on:click=move |_| {
                    catalog.update(|catalog| {
                        catalog.previous_page();
                    });
                }
            >
                "Précédent"
            </button>
            {pagination
                .pages()
                .map(|page| {
                    view! {
                        <button
                            type="button"
                            class=page_button_class(page, current_page)
                            aria-current=(page == current_page).then_some("page")
                            on:click=move |_| {
                                catalog.update(|catalog| {
                                    catalog.go_to_page(page);
                                });
                            }
                        >
                            {page}
                        </button>
                    }
                })
                .collect_view()}
            <button
                type="button"
                class="glass page-step"
                disabled=!pagination.has_next()
                on:click=move |_| {
                    catalog.update(|catalog| {
                        catalog.next_page();
                    });
                }
            >
                "Suivant"
            </button>
        </nav>
    }
    .into_any()
}

#[component]
fn ListingHeader(heading: String, count_label: Option<String>) -> impl IntoView {
    view! {
        <div class="listing-header">
            <h2>{heading}</h2>
            {count_label.map_or_else(
                || ().into_any(),
                |label| view! { <span class="listing-count">{label}</span> }.into_any(),
            )}
        </div>
    }
}

/// Searchable, paginated product listing. Refetches whenever `refresh`
/// changes.
#[component]
pub fn ProductCatalog(
    /// Token bumped by the root container after a product is created.
    #[prop(into)]
    refresh: Signal<RefreshCounter>,
) -> impl IntoView {
    let catalog = RwSignal::new(Catalog::new());

    Effect::new(move |_| {
        refresh.track();

        load_products(catalog);
    });

    let screen = move || match catalog.with(CatalogScreen::capture) {
        CatalogScreen::Loading => view! {
            <div class="catalog-loading">
                <div class="loader">{LOADING_MESSAGE}</div>
            </div>
        }
        .into_any(),
        CatalogScreen::Unavailable { heading, message } => view! {
            <ListingHeader heading=heading count_label=None />
            <div class="glass error-panel">
                <p class="error-message">{message}</p>
                <button type="button" class="btn-primary" on:click=move |_| load_products(catalog)>
                    "Réessayer"
                </button>
            </div>
        }
        .into_any(),
        CatalogScreen::Listing {
            heading,
            count_label,
            rows,
            pagination,
            no_results,
        } => view! {
            <ListingHeader heading=heading count_label=Some(count_label) />
            {no_results
                .then(|| {
                    view! {
                        <div class="glass empty-panel">
                            <p>{NO_RESULTS_MESSAGE}</p>
                        </div>
                    }
                })}
            <div class="table-container">
                <table>
                    <thead>
                        <tr>
                            <th>"Image"</th>
                            <th>"Nom"</th>
                            <th>"Description"</th>
                            <th>"Catégorie"</th>
                            <th>"Prix"</th>
                            <th class="product-actions">"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {rows
                            .into_iter()
                            .map(|product| view! { <ProductRow product=product /> })
                            .collect_view()}
                    </tbody>
                </table>
            </div>
            <PaginationControls catalog=catalog pagination=pagination />
        }
        .into_any(),
    };

    view! {
        <div class="container">
            <SearchBar catalog=catalog />
            <main>{screen}</main>
            <footer class="catalog-footer">
                <p>"© 2026 Motiich Shop. Tous droits réservés."</p>
            </footer>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use storefront::{api::ApiError, catalog::ProductsPayload};
    use testresult::TestResult;

    use super::*;

    fn loaded(count: u64) -> Catalog {
        let mut catalog = Catalog::new();
        let ticket = catalog.begin_fetch();

        catalog.apply_fetch(
            ticket,
            Ok(ProductsPayload::List(
                (1..=count)
                    .map(|id| Product::new(id, format!("Produit {id}")))
                    .collect(),
            )),
        );

        catalog
    }

    #[test]
    fn test_capture_loading_before_first_result() {
        let mut catalog = Catalog::new();
        catalog.begin_fetch();

        assert_eq!(CatalogScreen::capture(&catalog), CatalogScreen::Loading);
    }

    #[test]
    fn test_capture_unavailable_keeps_heading() -> TestResult {
        let mut catalog = Catalog::new();
        catalog.set_search("sac");
        let ticket = catalog.begin_fetch();
        catalog.apply_fetch(ticket, Err(ApiError::Network("refused".to_string())));

        let CatalogScreen::Unavailable { heading, message } = CatalogScreen::capture(&catalog)
        else {
            return Err("expected the error panel".into());
        };

        assert_eq!(heading, "Résultats pour \"sac\"");
        assert!(message.starts_with("Impossible de charger les produits."));

        Ok(())
    }

    #[test]
    fn test_capture_listing_owns_current_page() -> TestResult {
        let mut catalog = loaded(10);
        catalog.next_page();

        let CatalogScreen::Listing {
            count_label,
            rows,
            pagination,
            ..
        } = CatalogScreen::capture(&catalog)
        else {
            return Err("expected a listing".into());
        };

        assert_eq!(count_label, "10 produits trouvés");
        assert_eq!(rows.len(), 2);
        assert_eq!(pagination.current_page, 2);

        Ok(())
    }

    #[test]
    fn test_page_button_class_highlights_current() {
        assert_eq!(page_button_class(2, 2), "btn-primary page-button");
        assert_eq!(page_button_class(1, 2), "glass page-button");
    }
}
