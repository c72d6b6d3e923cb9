use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use news_digest::{
    config::Config,
    api::routes::create_router,
    pipeline::Pipeline,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt().with_env_filter(filter).with_target(true).init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!(
        feed_url = %config.feed_url,
        bucket = %config.storage.bucket,
        model = %config.gemini.model,
        timeout = ?config.request_timeout,
        "Configuration loaded"
    );

    let pipeline = Pipeline::from_config(&config).await?;
    let app_state = AppState {
        pipeline: Arc::new(pipeline),
    };

    // Build the router with routes
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!(%server_addr, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
