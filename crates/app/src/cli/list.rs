use std::io;

use clap::Args;
use storefront::{api::ProductsApi, container::Storefront};

use crate::{config::ConfigError, render};

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    /// Only show products whose title, category or description contains
    /// this text
    #[arg(long, default_value = "")]
    search: String,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,
}

pub(crate) async fn run<A: ProductsApi>(
    api: A,
    args: ListArgs,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let mut storefront = Storefront::new(api);

    storefront.load_catalog().await;

    if let Some(message) = storefront.catalog().error() {
        return Err(message.to_string());
    }

    let catalog = storefront.catalog_mut();
    catalog.set_search(args.search);

    if args.page != catalog.current_page() && !catalog.go_to_page(args.page) {
        return Err(ConfigError::PageOutOfRange {
            page: args.page,
            page_count: catalog.pagination().page_count,
        }
        .to_string());
    }

    render::write_catalog(out, storefront.catalog())
        .map_err(|error| format!("failed to write output: {error}"))
}
