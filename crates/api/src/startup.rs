use crate::{
    climate::{ClimateService, ErrorBody},
    db::{ObservationStore, SqliteStore},
    health, index_handler, precipitation, routes, stations, temperature_summary_between,
    temperature_summary_from, tobs,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use climate_api_core::require_file;
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::{sync::Arc, time::Duration};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub request_timeout: Duration,
    pub store: Arc<dyn ObservationStore>,
    pub climate: Arc<ClimateService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::temperature_summary_from,
        routes::climate::climate_routes::temperature_summary_between,
        routes::home::health,
    ),
    components(
        schemas(
                routes::climate::climate_routes::TemperatureSummaryResponse,
                routes::home::Health,
                ErrorBody
            )
    ),
    tags(
        (name = "hawaii climate api", description = "a read-only RESTful api over historical Hawaii precipitation and temperature observations")
    )
)]
struct ApiDoc;

/// Open the dataset file as a pool of read-only connections
pub async fn build_store(
    database: &str,
    max_connections: u32,
) -> Result<Arc<SqliteStore>, anyhow::Error> {
    let path = require_file(database).map_err(|e| anyhow!("dataset not available: {}", e))?;
    let store = SqliteStore::connect(&path, max_connections)
        .await
        .map_err(|e| anyhow!("error opening SQLite dataset: {}", e))?;
    Ok(Arc::new(store))
}

pub fn build_app_state(
    store: Arc<dyn ObservationStore>,
    remote_url: String,
    request_timeout: Duration,
) -> AppState {
    let climate = Arc::new(ClimateService::new(store.clone()));

    AppState {
        remote_url,
        request_timeout,
        store,
        climate,
    }
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health))
        // Static segments take priority over the {start} capture
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperature_summary_from))
        .route("/api/v1.0/{start}/{end}", get(temperature_summary_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, {} code: {}, time: {}", path, response.status().as_str(), response_time);

    response
}
