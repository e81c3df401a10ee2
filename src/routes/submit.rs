use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{parser, pipeline};

pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let raw = parser::parse_body(content_type, &body).map_err(AppError::BadRequest)?;

    let outcome = pipeline::run(&state, Some(addr.ip()), raw).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "created",
            "submission_id": outcome.reception.id,
            "category": outcome.reception.category,
            "received_at": outcome.reception.received_at,
            "enrichment": outcome.reception.enrichment,
            "enrichment_missing": outcome.reception.enrichment_missing,
            "warnings": outcome.warnings,
        })),
    )
        .into_response())
}
