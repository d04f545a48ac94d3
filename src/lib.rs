use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

pub mod extract;
pub mod models;

use extract::ExtractionError;
use models::{ExtractRequest, ExtractResponse};

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/extract", post(extract_endpoint).fallback(method_not_allowed))
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({"error": "Method not allowed"})),
    )
        .into_response()
}

async fn extract_endpoint(body: Bytes) -> Response {
    // A missing or unparsable body behaves like an empty `url` and is
    // rejected by URL validation.
    let req: ExtractRequest = serde_json::from_slice(&body).unwrap_or_default();

    match extract::extract_article(&req.url).await {
        Ok(result) => {
            let response = ExtractResponse {
                title: result.title,
                byline: result.byline,
                excerpt: result.excerpt,
                text: result.text,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::warn!(url = %req.url, error = %e, "extraction failed");
            let status = match &e {
                ExtractionError::InvalidUrl
                | ExtractionError::PolicyExcluded
                | ExtractionError::FetchFailed(_) => StatusCode::BAD_REQUEST,
                ExtractionError::ContentTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
                ExtractionError::ExtractionFailed => StatusCode::UNPROCESSABLE_ENTITY,
                ExtractionError::FetchTimeout | ExtractionError::Unexpected(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, Json(json!({"error": e.to_string()}))).into_response()
        }
    }
}
