use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Client;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use labintake::config::{ClickUpConfig, Config, WebhookConfig};

static APP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A running test server instance with a throwaway SQLite database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: SqlitePool,
    pub client: Client,
    pub db_path: PathBuf,
}

/// Knobs a test can turn before spawning. Defaults leave both
/// integrations disabled (no-op stand-ins).
#[derive(Default)]
pub struct TestOptions {
    pub clickup_base: Option<String>,
    pub webhook_url: Option<String>,
    pub rate_limit: Option<u32>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit data as JSON, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/submit"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit form-urlencoded data, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/submit"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make a GET request, return (body, status).
    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn count(&self) -> i64 {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM receptions")
            .fetch_one(&self.pool)
            .await
            .expect("count query failed");
        row.0
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(TestOptions::default()).await
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app_with(opts: TestOptions) -> TestApp {
    let db_path = std::env::temp_dir().join(format!(
        "labintake_test_{}_{}.db",
        std::process::id(),
        APP_COUNTER.fetch_add(1, Ordering::SeqCst),
    ));
    let _ = std::fs::remove_file(&db_path);

    let pool = labintake::db::connect(&db_path)
        .await
        .expect("Failed to open test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_path: db_path.clone(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to a random port
        max_body_size: 1_048_576,
        static_dir: "static".to_string(),
        cors_origins: vec![],
        rate_limit: opts.rate_limit.unwrap_or(1000),
        rate_limit_window_secs: 60,
        log_level: "warn".to_string(),
        clickup: opts.clickup_base.map(|api_base| ClickUpConfig {
            api_token: "test-token".to_string(),
            list_id: "901100200300".to_string(),
            api_base,
            status_filter: vec![],
            cf_project_manager_id: Some("pm-field-id".to_string()),
            cf_bsl2_checkbox_id: "bsl2-field-id".to_string(),
            timeout_secs: 2,
        }),
        webhook: opts.webhook_url.map(|url| WebhookConfig {
            url,
            timeout_secs: 2,
            wait_before_return_secs: 5,
        }),
    };

    let app = labintake::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_path,
    }
}

/// Drop the test database files after a test completes.
pub async fn cleanup(app: TestApp) {
    app.pool.close().await;
    let _ = std::fs::remove_file(&app.db_path);
    let _ = std::fs::remove_file(app.db_path.with_extension("db-wal"));
    let _ = std::fs::remove_file(app.db_path.with_extension("db-shm"));
}

/// Spawn a stub automation webhook that records every received body and
/// answers with the given status. Returns its URL and the recorded bodies.
pub async fn spawn_webhook_stub(status: u16) -> (String, Arc<Mutex<Vec<Value>>>) {
    let received: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();

    let app = Router::new().route(
        "/hook",
        post(move |Json(body): Json<Value>| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push(body);
                StatusCode::from_u16(status).unwrap()
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Webhook stub failed");
    });

    (format!("http://{addr}/hook"), received)
}

/// Spawn a stub task board with a fixed list of two tasks. Task detail is
/// served for the known ids and 404s otherwise.
pub async fn spawn_clickup_stub() -> String {
    let app = Router::new()
        .route(
            "/list/{list_id}/task",
            get(|| async {
                Json(json!({
                    "tasks": [
                        stub_task("861m1", "Sequencing batch 42", "received pending storage"),
                        stub_task("861m2", "Plasma aliquots", "in transit"),
                    ]
                }))
            }),
        )
        .route(
            "/task/{task_id}",
            get(|Path(task_id): Path<String>| async move {
                match task_id.as_str() {
                    "861m1" => {
                        Json(stub_task("861m1", "Sequencing batch 42", "received pending storage"))
                            .into_response()
                    }
                    "861m2" => {
                        Json(stub_task("861m2", "Plasma aliquots", "in transit")).into_response()
                    }
                    _ => StatusCode::NOT_FOUND.into_response(),
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("ClickUp stub failed");
    });

    format!("http://{addr}")
}

fn stub_task(id: &str, name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": { "status": status },
        "custom_fields": [
            {
                "id": "pm-field-id",
                "name": "Project Manager",
                "value": { "id": 4200, "username": "Dana Whitfield" }
            },
            {
                "id": "bsl2-field-id",
                "name": "BSL-2",
                "value": id == "861m1"
            }
        ]
    })
}

/// A base URL nothing is listening on, for simulating an upstream outage.
pub async fn dead_upstream_base() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
