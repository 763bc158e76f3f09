use std::io;

use clap::{Parser, Subcommand};
use storefront_app::HttpProductsApi;

use crate::config::{ApiConfig, LoggingConfig};

mod add;
mod list;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) api: ApiConfig,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the catalog
    List(list::ListArgs),

    /// Create a product
    Add(add::AddArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let api = HttpProductsApi::new(self.api.api_url);
        let mut stdout = io::stdout().lock();

        match self.command {
            Commands::List(args) => list::run(api, args, &mut stdout).await,
            Commands::Add(args) => add::run(api, args, &mut stdout).await,
        }
    }
}
