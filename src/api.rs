//! Products API
//!
//! The seam between storefront state and the backend. Implementations only
//! translate transport outcomes into [`ApiError`]; turning those into
//! user-facing messages is the job of the catalog and the form.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::{catalog::ProductsPayload, form::NewProduct, form::ValidationErrors};

/// HTTP status the backend uses for validation rejections.
pub const VALIDATION_STATUS: u16 = 422;

/// Why a request to the backend failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request was sent but no response came back.
    #[error("no response from server: {0}")]
    Network(String),

    /// The backend rejected the submitted fields.
    #[error("validation rejected ({} fields)", .0.len())]
    Validation(ValidationErrors),

    /// The backend answered with any other non-success status.
    #[error("server responded with status {status}")]
    Server {
        /// HTTP status code
        status: u16,

        /// Canonical reason phrase for the status, if known
        reason: Option<String>,

        /// `message` field of the response body, if any
        message: Option<String>,
    },

    /// The request could not be built or sent at all.
    #[error("request could not be sent: {0}")]
    Request(String),

    /// A success response carried a body that could not be read.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status carried by the failure, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation(_) => Some(VALIDATION_STATUS),
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Request(_) | ApiError::Decode(_) => None,
        }
    }
}

/// Backend operations the storefront relies on.
#[automock]
#[async_trait(?Send)]
pub trait ProductsApi {
    /// Fetches the whole product collection.
    async fn list_products(&self) -> Result<ProductsPayload, ApiError>;

    /// Submits a new product as a multipart form.
    async fn create_product(&self, product: NewProduct) -> Result<(), ApiError>;
}
