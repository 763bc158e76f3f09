use std::{io, path::PathBuf};

use clap::Args;
use storefront::{api::ProductsApi, container::Storefront, form::SubmitOutcome, products::Category};

use crate::{render, upload};

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Product title
    #[arg(long, default_value = "")]
    title: String,

    /// Product description
    #[arg(long, default_value = "")]
    description: String,

    /// Price, sent as typed
    #[arg(long, default_value = "")]
    price: String,

    /// Category (Fitness, Running or Sport)
    #[arg(long)]
    category: Option<Category>,

    /// Path of the product image
    #[arg(long)]
    image: Option<PathBuf>,
}

pub(crate) async fn run<A: ProductsApi>(
    api: A,
    args: AddArgs,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let image = match args.image.as_deref() {
        Some(path) => Some(
            upload::load_image(path)
                .await
                .map_err(|error| error.to_string())?,
        ),
        None => None,
    };

    let mut storefront = Storefront::new(api);
    let form = storefront.form_mut();

    form.set_title(args.title);
    form.set_description(args.description);
    form.set_price(args.price);
    form.set_category(args.category);
    form.set_image(image);

    let outcome = storefront
        .submit_product()
        .await
        .ok_or("a submission is already in progress")?;

    render::write_status(out, storefront.form())
        .map_err(|error| format!("failed to write output: {error}"))?;

    match outcome {
        SubmitOutcome::Created { .. } => {
            writeln!(out).map_err(|error| format!("failed to write output: {error}"))?;

            render::write_catalog(out, storefront.catalog())
                .map_err(|error| format!("failed to write output: {error}"))
        }
        SubmitOutcome::Rejected | SubmitOutcome::Ignored => {
            Err("product was not created".to_string())
        }
    }
}
