//! Storefront
//!
//! Client-side state for a small product storefront: a searchable, paginated
//! catalog fetched from a REST backend, and a form that creates products
//! through a multipart upload.

pub mod api;
pub mod catalog;
pub mod container;
pub mod form;
pub mod prelude;
pub mod products;
pub mod refresh;
