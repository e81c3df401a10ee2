pub mod options;
pub mod receptions;
pub mod submit;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/submit", post(submit::submit))
        .route("/api/options/{category}", get(options::list_options))
        .route("/api/storage_locations", get(options::storage_locations))
        .route("/api/receptions", get(receptions::list))
        .route("/api/receptions/{id}", get(receptions::get))
}
