pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod scraper;
pub mod storage;
pub mod summarizer;

use std::sync::Arc;
use pipeline::Pipeline;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}
