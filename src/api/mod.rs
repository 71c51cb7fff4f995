use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::{
    error::WeatherWiseError,
    models::{TipsRequest, TipsRequestBody, TipsResponse},
    tips::TipsService,
};

pub fn router(service: TipsService) -> Router {
    Router::new()
        .route("/tips", post(post_tips))
        .route("/health", get(health))
        .with_state(service)
}

async fn post_tips(
    State(service): State<TipsService>,
    payload: Result<Json<TipsRequestBody>, JsonRejection>,
) -> Result<Json<TipsResponse>, WeatherWiseError> {
    let Json(body) = payload.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            WeatherWiseError::PayloadTooLarge {
                message: "Request body too large".to_string(),
            }
        } else {
            WeatherWiseError::validation(format!("Invalid request body: {}", e.body_text()))
        }
    })?;

    let request = TipsRequest::try_from(body)?;
    let response = service.handle(request).await?;
    Ok(Json(response))
}

async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
