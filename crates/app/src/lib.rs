//! Storefront application layer: the HTTP backend behind the products API.

pub mod client;

pub use client::{DEFAULT_API_URL, HttpProductsApi};
