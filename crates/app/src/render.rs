//! Terminal rendering of the catalog and the form status.

use std::io;

use storefront::{
    catalog::{Catalog, CatalogView, LOADING_MESSAGE, NO_RESULTS_MESSAGE},
    form::{FormField, ProductForm},
    products::Product,
};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style, Width,
        object::{Columns, Rows},
    },
};

const DESCRIPTION_WIDTH: usize = 40;

/// Writes the current catalog page.
pub(crate) fn write_catalog(out: &mut impl io::Write, catalog: &Catalog) -> io::Result<()> {
    let listing = match catalog.view() {
        CatalogView::Loading => return writeln!(out, "{LOADING_MESSAGE}"),
        CatalogView::Unavailable { message } => return writeln!(out, "{message}"),
        CatalogView::Listing(listing) => listing,
    };

    writeln!(out, "{}", listing.heading)?;
    writeln!(out, "{}", listing.count_label())?;

    if listing.no_results {
        return writeln!(out, "\n{NO_RESULTS_MESSAGE}");
    }

    writeln!(out, "\n{}", products_table(&listing.rows))?;

    if listing.pagination.is_visible() {
        writeln!(
            out,
            "Page {} / {}",
            listing.pagination.current_page, listing.pagination.page_count
        )?;
    }

    Ok(())
}

fn products_table(rows: &[&Product]) -> String {
    let mut builder = Builder::default();

    builder.push_record(["#", "Produit", "Description", "Catégorie", "Prix", "Image"]);

    for product in rows {
        builder.push_record([
            product.id.to_string(),
            product.title().to_string(),
            product.description().to_string(),
            product.category().to_string(),
            product.display_price(),
            product.image_url().to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Alignment::center());
    table.modify(
        Columns::new(2..3),
        Width::truncate(DESCRIPTION_WIDTH).suffix("..."),
    );
    table.modify(Columns::new(4..5), Alignment::right());

    table.to_string()
}

/// Writes the form's status message followed by every field error.
pub(crate) fn write_status(out: &mut impl io::Write, form: &ProductForm) -> io::Result<()> {
    if let Some(status) = form.status() {
        writeln!(out, "{} {}", status.icon(), status.text)?;
    }

    for (field, messages) in form.errors().iter() {
        let label = FormField::ALL
            .into_iter()
            .find(|known| known.wire_name() == field)
            .map_or(field, |known| known.label());

        for message in messages {
            writeln!(out, "  - {label}: {message}")?;
        }
    }

    Ok(())
}
