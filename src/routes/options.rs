use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::locations::STORAGE_LOCATIONS;
use crate::models::Category;
use crate::state::SharedState;

/// Metadata options for a category, straight from the task board. An empty
/// list is a valid answer; only an unreachable upstream is an error.
pub async fn list_options(
    State(state): State<SharedState>,
    Path(category): Path<String>,
) -> Result<Response, AppError> {
    let category = Category::parse(&category)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown category: {category}")))?;

    let options = state
        .metadata
        .fetch_options(category)
        .await
        .map_err(|e| AppError::Upstream(e.message))?;

    Ok(Json(json!({
        "category": category,
        "options": options,
    }))
    .into_response())
}

pub async fn storage_locations() -> Response {
    let mut map = serde_json::Map::new();
    for (zone, subs) in STORAGE_LOCATIONS {
        map.insert(
            zone.to_string(),
            json!(subs.iter().copied().collect::<Vec<_>>()),
        );
    }

    Json(json!({ "storage_locations": map })).into_response()
}
