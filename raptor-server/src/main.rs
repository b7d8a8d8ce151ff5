mod api;
mod dto;
mod fixture;
mod state;

use std::{sync::Arc, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    routing::{get, post},
    BoxError,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use state::AppState;

const PORT: u32 = 3000;
const MAX_CONCURRENT_SEARCHES: usize = 64;
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app_state = Arc::new(AppState { timetable: fixture::demo_timetable() });

    let middleware = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(TraceLayer::new_for_http())
        .concurrency_limit(MAX_CONCURRENT_SEARCHES)
        .timeout(SEARCH_TIMEOUT)
        .layer(CorsLayer::permissive());

    let app = axum::Router::new()
        .route("/search", post(api::search::search_handler))
        .route("/health", get(api::health::health))
        .layer(middleware)
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{PORT}"))
        .await
        .expect("failed to bind listener");
    info!("listening on port {PORT}");
    axum::serve(listener, app).await.expect("server error");
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "search timed out".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("unhandled middleware error: {err}"))
    }
}
