pub mod config;
pub mod db;
pub mod error;
pub mod integrations;
pub mod locations;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod submission;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::integrations::clickup::ClickUpClient;
use crate::integrations::webhook::WebhookNotifier;
use crate::integrations::{MetadataLookup, NoopLookup, NoopNotifier, Notifier};
use crate::rate_limit::SubmissionRateLimiter;
use crate::state::{AppState, SharedState};

pub fn build_app(pool: SqlitePool, config: Config) -> Router {
    // Pick the integration strategies once; everything downstream just
    // calls the trait objects.
    let metadata: Arc<dyn MetadataLookup> = match config.clickup.clone() {
        Some(clickup) => {
            tracing::info!("ClickUp lookup enabled (list {})", clickup.list_id);
            Arc::new(ClickUpClient::new(clickup))
        }
        None => {
            tracing::info!("ClickUp lookup disabled; metadata options will be empty");
            Arc::new(NoopLookup)
        }
    };

    let notifier: Arc<dyn Notifier> = match config.webhook.clone() {
        Some(webhook) => {
            tracing::info!("Automation webhook enabled");
            Arc::new(WebhookNotifier::new(webhook))
        }
        None => {
            tracing::info!("Automation webhook disabled; notifications are a no-op");
            Arc::new(NoopNotifier)
        }
    };

    let cors = cors_layer(&config.cors_origins);
    let static_dir = config.static_dir.clone();
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        metadata,
        notifier,
        submission_limiter: SubmissionRateLimiter::new(),
    });

    Router::new()
        .merge(routes::api_routes())
        .route("/healthz", axum::routing::get(healthz))
        .route_service("/", ServeFile::new(format!("{static_dir}/index.html")))
        .nest_service("/static", ServeDir::new(&static_dir))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring unparseable CORS origin: {o}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

async fn healthz() -> &'static str {
    "ok"
}
