//! CLI configuration

use std::{io, path::PathBuf};

use clap::Args;
use storefront_app::DEFAULT_API_URL;
use thiserror::Error;

/// Backend settings.
#[derive(Debug, Args)]
pub(crate) struct ApiConfig {
    /// Base URL of the products API
    #[arg(long, global = true, env = "STOREFRONT_API_URL", default_value = DEFAULT_API_URL)]
    pub(crate) api_url: String,
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(long, global = true, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub(crate) log_format: LogFormat,
}

/// Problems with the files and arguments handed to the CLI.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The image path does not end in a usable file name.
    #[error("image path {0} has no file name")]
    ImageFileName(PathBuf),

    /// The image could not be read.
    #[error("failed to read image {path}: {source}")]
    ReadImage {
        /// Path given on the command line
        path: PathBuf,

        /// Underlying I/O failure
        source: io::Error,
    },

    /// The requested page is past the end of the results.
    #[error("page {page} does not exist ({page_count} pages)")]
    PageOutOfRange {
        /// Requested page
        page: usize,

        /// Pages available for the search
        page_count: usize,
    },
}
