//! Admin API endpoints
//!
//! - POST /api/admin/build - Run the content pipeline (import then export)
//!
//! Requests must carry `Authorization: Bearer <admin.token>`.

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::AppState;
use crate::pipeline::BuildReport;

/// Response for a build request
#[derive(Debug, Serialize)]
pub struct BuildResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<BuildReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/build", post(trigger_build))
}

/// POST /api/admin/build
///
/// Builds run one at a time; a second request waits for the first.
async fn trigger_build(State(state): State<AppState>) -> (StatusCode, Json<BuildResponse>) {
    let _guard = state.build_lock.lock().await;
    tracing::info!("Build triggered from admin API");

    match state.pipeline.build().await {
        Ok(report) => {
            let failures = report.failure_count();
            let message = if failures == 0 {
                "Content imported and exported successfully".to_string()
            } else {
                format!(
                    "Content imported and exported with {} failed item(s)",
                    failures
                )
            };
            (
                StatusCode::OK,
                Json(BuildResponse {
                    success: true,
                    message: Some(message),
                    report: Some(report),
                    error: None,
                }),
            )
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(BuildResponse {
                success: false,
                message: None,
                report: None,
                error: Some(err.to_string()),
            }),
        ),
    }
}
