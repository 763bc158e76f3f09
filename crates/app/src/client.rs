//! HTTP client for the products backend.

use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderValue},
    multipart::{Form, Part},
};
use serde_json::Value;
use storefront::{
    api::{ApiError, ProductsApi, VALIDATION_STATUS},
    catalog::ProductsPayload,
    form::{FormField, NewProduct},
};
use tracing::debug;

/// Backend used when no other base URL is configured.
pub const DEFAULT_API_URL: &str = "https://v1-ecom-ww.vercel.app/api";

/// [`ProductsApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpProductsApi {
    base_url: String,
    http: Client,
}

impl HttpProductsApi {
    /// Create a client for the backend rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client reusing an existing `reqwest` client.
    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self { base_url, http }
    }

    /// Base URL, without trailing slashes.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the products collection.
    pub fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }
}

#[async_trait(?Send)]
impl ProductsApi for HttpProductsApi {
    async fn list_products(&self) -> Result<ProductsPayload, ApiError> {
        let url = self.products_url();

        debug!(%url, "listing products");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(send_error)?;

        let response = check_status(response).await?;

        response.json().await.map_err(send_error)
    }

    async fn create_product(&self, product: NewProduct) -> Result<(), ApiError> {
        let url = self.products_url();

        debug!(%url, title = %product.title, "creating product");

        let form = multipart_form(product).map_err(send_error)?;

        let response = self
            .http
            .post(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .multipart(form)
            .send()
            .await
            .map_err(send_error)?;

        check_status(response).await?;

        Ok(())
    }
}

fn multipart_form(product: NewProduct) -> Result<Form, reqwest::Error> {
    let mut form = product
        .text_fields()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| {
            form.text(name, value.to_string())
        });

    if let Some(image) = product.image {
        let mut part = Part::bytes(image.bytes).file_name(image.file_name);

        if let Some(content_type) = image.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }

        form = form.part(FormField::Image.wire_name(), part);
    }

    Ok(form)
}

/// Passes success responses through and turns every other status into an
/// [`ApiError`], reading `errors` and `message` from the body when present.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body: Value = response.json().await.unwrap_or_default();

    if status.as_u16() == VALIDATION_STATUS {
        let errors = body
            .get("errors")
            .cloned()
            .and_then(|errors| serde_json::from_value(errors).ok())
            .unwrap_or_default();

        return Err(ApiError::Validation(errors));
    }

    Err(ApiError::Server {
        status: status.as_u16(),
        reason: status.canonical_reason().map(str::to_string),
        message: body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn send_error(error: reqwest::Error) -> ApiError {
    if error.is_builder() {
        ApiError::Request(error.to_string())
    } else if error.is_decode() {
        ApiError::Decode(error.to_string())
    } else {
        ApiError::Network(error.to_string())
    }
}
