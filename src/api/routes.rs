use axum::{
    routing::get,
    Router,
    extract::State,
    response::{IntoResponse, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tracing::{error, info, warn};

use crate::api::response;
use crate::error::AppError;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/top-news", get(top_news_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn health_handler() -> &'static str {
    "News digest service is running"
}

/// Runs one pipeline and reports the outcome.
async fn top_news_handler(State(state): State<AppState>) -> Response {
    info!("Starting news run");
    let start_time = std::time::Instant::now();

    let result = state.pipeline.run().await;
    let elapsed = start_time.elapsed();

    match result {
        Ok(report) => {
            info!(?elapsed, count = report.summarized.len(), storage_key = %report.storage_key, "News run succeeded");
            response::success(report).into_response()
        }
        Err(err @ AppError::NoNewsFound) => {
            warn!(?elapsed, "News run found no articles");
            err.into_response()
        }
        Err(err) => {
            error!(?elapsed, error = %err, "News run failed");
            err.into_response()
        }
    }
}
