use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use std::fmt;

use crate::api::models::ErrorResponse;
use crate::api::response;

/// Pipeline stage whose output came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scrape,
    Summarize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Scrape => f.write_str("scrape"),
            Stage::Summarize => f.write_str("summarize"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("Feed malformed: {0}")]
    FeedMalformed(String),

    #[error("No news data found")]
    NoNewsFound,

    #[error("No articles survived the {0} stage")]
    EmptyBatch(Stage),

    #[error("No news data provided")]
    EmptyPayload,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("LLM processing error: {0}")]
    Llm(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoNewsFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            AppError::NoNewsFound => ErrorResponse::new("No news data found"),
            AppError::EmptyBatch(Stage::Scrape) => {
                ErrorResponse::new("Failed to extract content from news articles")
            }
            AppError::EmptyBatch(Stage::Summarize) => {
                ErrorResponse::new("Failed to summarize news articles")
            }
            other => ErrorResponse::new("Failed to process news").with_error(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        response::error(self.status_code(), self.body()).into_response()
    }
}

/// Why a single article was left out of a stage's output.
///
/// These never reach the caller; the stage logs them and filters the item out.
#[derive(Debug, thiserror::Error)]
pub enum DropReason {
    #[error("request failed: {0}")]
    Fetch(String),

    #[error("unreadable response: {0}")]
    Parse(String),

    #[error("no paragraph text inside the article container")]
    NoContent,

    #[error("article content is empty")]
    EmptyContent,

    #[error("summary generation failed: {0}")]
    Generation(String),

    #[error("generator returned no text")]
    EmptySummary,
}

pub type Result<T> = std::result::Result<T, AppError>;
