use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ListQuery>,
) -> Result<Response, AppError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 500);
    let offset = params.offset.unwrap_or(0).max(0);

    let receptions = db::receptions::list(&state.pool, limit, offset).await?;
    let total = db::receptions::count(&state.pool).await?;

    Ok(Json(json!({
        "receptions": receptions,
        "total": total,
        "limit": limit,
        "offset": offset,
    }))
    .into_response())
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let reception = db::receptions::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reception {id} not found")))?;

    Ok(Json(reception).into_response())
}
