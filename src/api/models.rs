use serde::Serialize;

use crate::models::SummarizedArticle;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopNewsResponse {
    pub message: String,
    pub timestamp: String,
    pub storage_key: String,
    pub count: usize,
    pub summarized_news: Vec<SummarizedArticle>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
