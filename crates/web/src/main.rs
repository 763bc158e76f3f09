//! Leptos Storefront Application

use leptos::prelude::*;
use storefront::refresh::RefreshCounter;
use storefront_app::{DEFAULT_API_URL, HttpProductsApi};

mod catalog;
mod form;

/// Products API base URL, fixed at build time.
const API_URL: &str = match option_env!("STOREFRONT_API_URL") {
    Some(url) => url,
    None => DEFAULT_API_URL,
};

fn products_api() -> HttpProductsApi {
    HttpProductsApi::new(API_URL)
}

/// Root container: the catalog above the creation form. A created product
/// bumps the refresh counter, which makes the catalog refetch.
#[component]
fn App() -> impl IntoView {
    let refresh = RwSignal::new(RefreshCounter::new());
    let on_product_added = Callback::new(move |()| bump_refresh(refresh));

    view! {
        <div class="app-wrapper">
            <catalog::ProductCatalog refresh=refresh />
            <form::ProductCreationForm on_product_added=on_product_added />
        </div>
    }
}

/// Main server function
fn main() {
    console_error_panic_hook::set_once();

    leptos::mount::mount_to_body(App);
}

fn bump_refresh(refresh: RwSignal<RefreshCounter>) {
    refresh.update(|counter| {
        counter.bump();
    });
}

#[cfg(target_arch = "wasm32")]
fn js_value_message(error: wasm_bindgen::JsValue, fallback: &str) -> String {
    error.as_string().unwrap_or_else(|| fallback.to_string())
}
