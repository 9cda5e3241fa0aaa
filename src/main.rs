//! Secure Check - Traffic-Stop Analysis Dashboard Backend
//!
//! Serves the police check post ledger: logs overview, key metrics, charts,
//! a catalog of analytical SQL questions and a stop outcome predictor.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SECURE CHECK                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌─────────────────────┐ │
//! │  │  API      │  │  Query        │  │  Outcome            │ │
//! │  │  (Axum)   │  │  Catalog      │  │  Predictor          │ │
//! │  └─────┬─────┘  └───────┬───────┘  └──────────┬──────────┘ │
//! │        └────────────────┼─────────────────────┘            │
//! │                         ▼                                   │
//! │                  ┌─────────────┐                            │
//! │                  │  StopStore  │── PostgreSQL police_logs   │
//! │                  └─────────────┘                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod models;
mod handlers;
mod error;
mod catalog;
mod predictor;
mod stats;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

use store::{PgStore, StopStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    init_tracing(&config);

    tracing::info!("Secure Check server starting...");
    tracing::info!("Database: {}", config.redacted_database_url());
    if config.is_production() && config.database_url == config::Config::default().database_url {
        tracing::warn!("Running in production with the default DATABASE_URL");
    }

    // Initialize database pool
    let pool = db::create_pool(&config.database_url, config.max_connections)
        .await
        .context("Failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    // Build application state
    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚓 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down gracefully");
    Ok(())
}

fn init_tracing(config: &config::Config) {
    let json = config.json_logs();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "secure_check=debug,tower_http=debug".into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StopStore>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Police logs
        .route("/api/v1/stops", get(handlers::stops::list))
        .route("/api/v1/stops/durations", get(handlers::stops::durations))

        // Key metrics and charts
        .route("/api/v1/dashboard", get(handlers::dashboard::summary))

        // Query catalog
        .route("/api/v1/queries", get(handlers::queries::list))
        .route("/api/v1/queries/:group/:id", get(handlers::queries::get))
        .route("/api/v1/queries/:group/:id/run", post(handlers::queries::run))

        // Prediction
        .route("/api/v1/predict", post(handlers::predict::predict));

    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::models::{Cell, StopRecord};
    use crate::store::memory::MemoryStore;

    fn app(store: MemoryStore) -> Router {
        create_router(AppState {
            store: Arc::new(store),
            config: config::Config::default(),
        })
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn history() -> Vec<StopRecord> {
        vec![
            StopRecord::fixture(1, "male", 27, "Speeding", "Citation"),
            StopRecord::fixture(2, "male", 27, "Speeding", "Citation"),
            StopRecord::fixture(3, "male", 27, "Equipment", "Warning"),
            StopRecord::fixture(4, "female", 27, "Moving violation", "Warning"),
            StopRecord {
                stop_duration: Some("16-30 Min".to_string()),
                ..StopRecord::fixture(5, "male", 45, "Seat belt", "Arrest Driver")
            },
        ]
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(MemoryStore::default()), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["environment"], "development");
    }

    #[tokio::test]
    async fn test_predict_majority() {
        let form = json!({
            "stop_date": "2024-05-01",
            "stop_time": "14:30:00",
            "country_name": "Canada",
            "driver_gender": "male",
            "driver_age": 27,
            "search_conducted": 0,
            "drug_related_stop": 0,
            "stop_duration": "0-15 Min",
            "vehicle_number": "AB1234"
        });
        let (status, body) = send(
            app(MemoryStore::with_stops(history())),
            post_json("/api/v1/predict", form),
        ).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_violation"], "Speeding");
        assert_eq!(body["predicted_outcome"], "Citation");
        assert_eq!(body["matched_records"], 3);
        assert_eq!(body["input"]["vehicle_number"], "AB1234");
        let summary = body["summary"].as_str().unwrap();
        assert!(summary.contains("stopped at 02:30 PM on 2024-05-01"), "{summary}");
    }

    #[tokio::test]
    async fn test_predict_without_match_uses_fallback() {
        let form = json!({ "driver_gender": "female", "driver_age": 17 });
        let (status, body) = send(
            app(MemoryStore::with_stops(history())),
            post_json("/api/v1/predict", form),
        ).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_violation"], "Speeding");
        assert_eq!(body["predicted_outcome"], "Warning");
        assert_eq!(body["matched_records"], 0);
    }

    #[tokio::test]
    async fn test_predict_with_broken_store_degrades() {
        let form = json!({ "driver_gender": "male", "driver_age": 27 });
        let (status, body) = send(app(MemoryStore::broken()), post_json("/api/v1/predict", form)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_violation"], "Speeding");
        assert_eq!(body["predicted_outcome"], "Warning");
        assert_eq!(body["notices"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_predict_rejects_out_of_range_input() {
        let (status, body) = send(
            app(MemoryStore::with_stops(history())),
            post_json("/api/v1/predict", json!({ "driver_age": 12 })),
        ).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);

        let (status, _) = send(
            app(MemoryStore::with_stops(history())),
            post_json("/api/v1/predict", json!({ "search_conducted": 2 })),
        ).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predict_rejects_undecodable_input_as_json_400() {
        let bodies = [
            json!({ "search_conducted": -1 }),
            json!({ "drug_related_stop": 300 }),
            json!({ "driver_gender": "any" }),
            json!({ "driver_age": "twenty" }),
        ];
        for form in bodies {
            let (status, body) = send(
                app(MemoryStore::with_stops(history())),
                post_json("/api/v1/predict", form.clone()),
            ).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{form}");
            assert_eq!(body["status"], 400, "{form}");
            assert!(body["error"].is_string(), "{form}");
        }
    }

    #[tokio::test]
    async fn test_durations() {
        let (status, body) = send(
            app(MemoryStore::with_stops(history())),
            get_req("/api/v1/stops/durations"),
        ).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["durations"], json!(["0-15 Min", "16-30 Min"]));
    }

    #[tokio::test]
    async fn test_stops_overview_limit() {
        let (_, body) = send(app(MemoryStore::with_stops(history())), get_req("/api/v1/stops?limit=2")).await;
        assert_eq!(body["stops"].as_array().unwrap().len(), 2);
        assert!(body["message"].is_null());

        let (_, body) = send(app(MemoryStore::default()), get_req("/api/v1/stops")).await;
        assert!(body["stops"].as_array().unwrap().is_empty());
        assert!(body["message"].as_str().unwrap().contains("No rows returned"));
    }

    #[tokio::test]
    async fn test_dashboard_metrics_and_charts() {
        let store = MemoryStore::default()
            .table(catalog::AVG_DRIVER_AGE, &["avg_driver_age"], vec![vec![Cell::Float(34.5)]])
            .table(catalog::PEAK_HOUR, &["peak_hour", "cnt"], vec![vec![Cell::Int(22), Cell::Int(40)]])
            .table(catalog::TOP_VIOLATION, &["violation", "cnt"], vec![vec![Cell::from("Speeding"), Cell::Int(90)]])
            .table(
                catalog::VIOLATION_COUNTS,
                &["violation", "total_stops"],
                vec![
                    vec![Cell::from("Speeding"), Cell::Int(90)],
                    vec![Cell::from("Equipment"), Cell::Int(12)],
                ],
            );

        let (status, body) = send(app(store), get_req("/api/v1/dashboard")).await;
        assert_eq!(status, StatusCode::OK);

        let metrics = body["metrics"].as_array().unwrap();
        let display = |key: &str| {
            metrics.iter().find(|m| m["key"] == key).unwrap()["display"].as_str().unwrap().to_string()
        };
        assert_eq!(display("avg_driver_age"), "34.5 yrs");
        assert_eq!(display("peak_hour"), "22:00");
        assert_eq!(display("top_violation"), "Speeding");
        // No canned result: placeholder, not zero
        assert_eq!(display("avg_stop_duration"), "N/A");
        assert!(metrics.iter().find(|m| m["key"] == "arrest_rate").unwrap()["value"].is_null());

        assert_eq!(body["charts"][0]["kind"], "bar");
        assert_eq!(body["charts"][0]["points"].as_array().unwrap().len(), 2);
        assert_eq!(body["charts"][1]["kind"], "donut");
        assert!(body["charts"][1]["points"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_survives_broken_store() {
        let (status, body) = send(app(MemoryStore::broken()), get_req("/api/v1/dashboard")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["notices"].as_array().unwrap().len(), 7);
        assert!(body["metrics"].as_array().unwrap().iter().all(|m| m["display"] == "N/A"));
    }

    #[tokio::test]
    async fn test_query_catalog_listing() {
        let (status, body) = send(app(MemoryStore::default()), get_req("/api/v1/queries")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["simple"].as_array().unwrap().len(), 14);
        assert_eq!(body["advanced"].as_array().unwrap().len(), 6);
        assert!(body["simple"][0].get("sql").is_none());

        let (status, body) = send(
            app(MemoryStore::default()),
            get_req("/api/v1/queries/simple/stops-by-hour"),
        ).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["sql"].as_str().unwrap().contains("EXTRACT(HOUR FROM stop_time)"));
    }

    #[tokio::test]
    async fn test_run_query() {
        let entry = catalog::find(catalog::QueryGroup::Simple, "country-most-searches").unwrap();
        let store = MemoryStore::default().table(
            entry.sql,
            &["country_name", "total_searches"],
            vec![vec![Cell::from("Canada"), Cell::Int(12)]],
        );

        let req = Request::post("/api/v1/queries/simple/country-most-searches/run")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(store), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["columns"], json!(["country_name", "total_searches"]));
        assert_eq!(body["result"]["rows"], json!([["Canada", 12]]));
        assert!(body["warning"].is_null());
    }

    #[tokio::test]
    async fn test_run_query_empty_and_unknown() {
        let req = Request::post("/api/v1/queries/advanced/time-period-analysis/run")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(MemoryStore::default()), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["warning"], "No results found for this query.");

        let req = Request::post("/api/v1/queries/advanced/nope/run")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(MemoryStore::default()), req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Query 'nope' not found");
    }

    #[tokio::test]
    async fn test_empty_result_keeps_columns() {
        let entry = catalog::find(catalog::QueryGroup::Simple, "country-most-searches").unwrap();
        let store = MemoryStore::default().table(entry.sql, &["country_name", "total_searches"], vec![]);

        let req = Request::post("/api/v1/queries/simple/country-most-searches/run")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(store), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["columns"], json!(["country_name", "total_searches"]));
        assert_eq!(body["result"]["rows"], json!([]));
        assert_eq!(body["warning"], "No results found for this query.");
    }

    #[tokio::test]
    async fn test_unknown_group_is_not_found() {
        let req = Request::post("/api/v1/queries/bogus/x/run")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(MemoryStore::default()), req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);

        let (status, body) = send(app(MemoryStore::default()), get_req("/api/v1/queries/bogus/x")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }
}
