use axum::Json;
use axum::http::StatusCode;

use crate::api::models::{ErrorResponse, TopNewsResponse};
use crate::pipeline::RunReport;

pub fn success(report: RunReport) -> (StatusCode, Json<TopNewsResponse>) {
    (
        StatusCode::OK,
        Json(TopNewsResponse {
            message: "News fetched, summarized and archived successfully".to_string(),
            timestamp: report.timestamp,
            storage_key: report.storage_key,
            count: report.summarized.len(),
            summarized_news: report.summarized,
        }),
    )
}

pub fn error(status: StatusCode, body: ErrorResponse) -> (StatusCode, Json<ErrorResponse>) {
    (status, Json(body))
}
