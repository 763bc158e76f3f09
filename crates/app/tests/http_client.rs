//! `HttpProductsApi` against an in-process backend.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use testresult::TestResult;
use tokio::net::TcpListener;

use storefront::{
    api::{ApiError, ProductsApi},
    catalog::ProductsPayload,
    container::Storefront,
    form::{FormField, ImageUpload, NewProduct, SubmitOutcome, ValidationErrors},
    products::{Category, Product},
};
use storefront_app::HttpProductsApi;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReceivedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

type Received = Arc<Mutex<Vec<ReceivedField>>>;

async fn serve(router: Router) -> TestResult<HttpProductsApi> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;

    let _server = tokio::spawn(async move { axum::serve(listener, router).await });

    Ok(HttpProductsApi::new(format!("http://{address}/api/")))
}

fn listing(body: Value) -> Router {
    Router::new().route(
        "/api/products",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    )
}

fn responding(status: StatusCode, body: Option<Value>) -> Router {
    let reply = move || {
        let body = body.clone();
        async move {
            match body {
                Some(body) => (status, Json(body)).into_response(),
                None => status.into_response(),
            }
        }
    };

    Router::new().route("/api/products", get(reply.clone()).post(reply))
}

async fn record(
    State(received): State<Received>,
    mut multipart: Multipart,
) -> Result<StatusCode, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?.to_vec();

        if let Ok(mut fields) = received.lock() {
            fields.push(ReceivedField {
                name,
                file_name,
                content_type,
                bytes,
            });
        }
    }

    Ok(StatusCode::CREATED)
}

fn recording(received: Received) -> Router {
    Router::new()
        .route(
            "/api/products",
            get(|| async { Json(json!([{ "id": 1, "titre": "Sac 40L" }])) }).post(record),
        )
        .with_state(received)
}

fn new_product() -> NewProduct {
    NewProduct {
        title: "Sac 40L".to_string(),
        description: "Poche chaussures".to_string(),
        price: "39.90".to_string(),
        category: Category::SportBag.wire_value().to_string(),
        image: Some(ImageUpload {
            file_name: "sac.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }),
    }
}

#[tokio::test]
async fn lists_bare_array() -> TestResult {
    let api = serve(listing(json!([
        { "id": 2, "titre": "Gourde", "prix": 15 },
        { "id": 10, "titre": "Tapis", "prix": "24.90" }
    ])))
    .await?;

    let products = api.list_products().await?.into_products();

    assert_eq!(products.len(), 2);
    assert_eq!(products.first().map(Product::title), Some("Tapis"));
    assert_eq!(
        products.first().map(Product::display_price),
        Some("24.90 €".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn lists_enveloped_array() -> TestResult {
    let api = serve(listing(json!({
        "current_page": 1,
        "data": [{ "id": "5", "titre": "Kettlebell" }]
    })))
    .await?;

    let payload = api.list_products().await?;

    assert!(matches!(payload, ProductsPayload::Envelope { .. }));
    assert_eq!(payload.into_products().len(), 1);

    Ok(())
}

#[tokio::test]
async fn create_sends_multipart_fields_and_image() -> TestResult {
    let received = Received::default();
    let api = serve(recording(received.clone())).await?;

    api.create_product(new_product()).await?;

    let fields = received.lock().map_err(|error| error.to_string())?;
    let text: Vec<(&str, &[u8])> = fields
        .iter()
        .filter(|field| field.file_name.is_none())
        .map(|field| (field.name.as_str(), field.bytes.as_slice()))
        .collect();

    assert_eq!(
        text,
        [
            ("titre", b"Sac 40L".as_slice()),
            ("contenu", b"Poche chaussures".as_slice()),
            ("prix", b"39.90".as_slice()),
            ("categorie", b"Sport".as_slice()),
            ("solde", b"0".as_slice()),
        ]
    );

    let image = fields
        .iter()
        .find(|field| field.name == FormField::Image.wire_name())
        .ok_or("image part missing")?;

    assert_eq!(image.file_name.as_deref(), Some("sac.png"));
    assert_eq!(image.content_type.as_deref(), Some("image/png"));
    assert_eq!(image.bytes, [0x89, b'P', b'N', b'G']);

    Ok(())
}

#[tokio::test]
async fn validation_errors_are_decoded() -> TestResult {
    let api = serve(responding(
        StatusCode::UNPROCESSABLE_ENTITY,
        Some(json!({
            "message": "The given data was invalid.",
            "errors": { "titre": ["Le champ titre est requis."], "prix": ["Le prix doit être un nombre."] }
        })),
    ))
    .await?;

    let Err(ApiError::Validation(errors)) = api.create_product(new_product()).await else {
        return Err("expected a validation error".into());
    };

    assert_eq!(errors.first(FormField::Title), Some("Le champ titre est requis."));
    assert_eq!(errors.first(FormField::Price), Some("Le prix doit être un nombre."));

    Ok(())
}

#[tokio::test]
async fn validation_without_errors_map_is_empty() -> TestResult {
    let api = serve(responding(
        StatusCode::UNPROCESSABLE_ENTITY,
        Some(json!({ "errors": "invalid" })),
    ))
    .await?;

    let result = api.create_product(new_product()).await;

    assert_eq!(result, Err(ApiError::Validation(ValidationErrors::default())));

    Ok(())
}

#[tokio::test]
async fn server_error_keeps_message_and_reason() -> TestResult {
    let api = serve(responding(
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(json!({ "message": "Disque plein" })),
    ))
    .await?;

    let result = api.create_product(new_product()).await;

    assert_eq!(
        result,
        Err(ApiError::Server {
            status: 500,
            reason: Some("Internal Server Error".to_string()),
            message: Some("Disque plein".to_string()),
        })
    );

    Ok(())
}

#[tokio::test]
async fn server_error_without_body() -> TestResult {
    let api = serve(responding(StatusCode::SERVICE_UNAVAILABLE, None)).await?;

    let result = api.list_products().await;

    assert_eq!(
        result,
        Err(ApiError::Server {
            status: 503,
            reason: Some("Service Unavailable".to_string()),
            message: None,
        })
    );

    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() -> TestResult {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    drop(listener);

    let api = HttpProductsApi::new(format!("http://{address}/api"));

    assert!(matches!(
        api.list_products().await,
        Err(ApiError::Network(_))
    ));

    Ok(())
}

#[tokio::test]
async fn invalid_base_url_is_a_request_error() {
    let api = HttpProductsApi::new("not a url");

    assert!(matches!(
        api.list_products().await,
        Err(ApiError::Request(_))
    ));
}

#[tokio::test]
async fn non_json_listing_is_a_decode_error() -> TestResult {
    let api = serve(Router::new().route(
        "/api/products",
        get(|| async { "<html>maintenance</html>" }),
    ))
    .await?;

    assert!(matches!(
        api.list_products().await,
        Err(ApiError::Decode(_))
    ));

    Ok(())
}

#[tokio::test]
async fn storefront_refreshes_catalog_after_create() -> TestResult {
    let received = Received::default();
    let api = serve(recording(received.clone())).await?;
    let mut storefront = Storefront::new(api);

    storefront.form_mut().set_title("Sac 40L");
    storefront.form_mut().set_category(Some(Category::SportBag));

    let outcome = storefront
        .submit_product()
        .await
        .ok_or("submission refused")?;

    assert!(matches!(outcome, SubmitOutcome::Created { .. }));
    assert_eq!(storefront.refresh_token().value(), 1);
    assert_eq!(storefront.catalog().products().len(), 1);
    assert!(!received.lock().map_err(|error| error.to_string())?.is_empty());

    Ok(())
}
