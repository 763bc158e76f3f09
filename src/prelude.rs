//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    api::{ApiError, ProductsApi},
    catalog::{
        Catalog, CatalogView, FetchApplied, FetchTicket, Listing, PAGE_SIZE, Pagination,
        ProductsPayload,
    },
    container::Storefront,
    form::{
        FLASH_DURATION, FlashTicket, FormDraft, FormField, ImageTicket, ImageUpload, NewProduct,
        ProductForm, StatusKind, StatusMessage, SubmitOutcome, ValidationErrors,
    },
    products::{Category, Product, ProductId},
    refresh::RefreshCounter,
};
