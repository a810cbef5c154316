//! API middleware
//!
//! Contains the shared application state, the JSON error envelope and the
//! admin token guard.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::repositories::{
    AnnouncementRepository, BlogPostRepository, CarouselRepository, CategoryRepository,
    EventRepository, GalleryRepository, NewsletterArchiveRepository, SqlxAnnouncementRepository,
    SqlxBlogPostRepository, SqlxCarouselRepository, SqlxCategoryRepository, SqlxEventRepository,
    SqlxGalleryRepository, SqlxNewsletterArchiveRepository, SqlxSubmissionRepository,
    SqlxTagRepository, SqlxTeamRepository, TagRepository, TeamRepository,
};
use crate::db::DynDatabasePool;
use crate::pipeline::Pipeline;
use crate::services::{FormError, FormService};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub blogs: Arc<dyn BlogPostRepository>,
    pub events: Arc<dyn EventRepository>,
    pub galleries: Arc<dyn GalleryRepository>,
    pub team: Arc<dyn TeamRepository>,
    pub announcements: Arc<dyn AnnouncementRepository>,
    pub carousel: Arc<dyn CarouselRepository>,
    pub newsletters: Arc<dyn NewsletterArchiveRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub forms: Arc<FormService>,
    pub pipeline: Pipeline,
    /// Held for the duration of an HTTP-triggered build
    pub build_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pool: DynDatabasePool, config: Config) -> Self {
        Self {
            blogs: SqlxBlogPostRepository::boxed(pool.clone()),
            events: SqlxEventRepository::boxed(pool.clone()),
            galleries: SqlxGalleryRepository::boxed(pool.clone()),
            team: SqlxTeamRepository::boxed(pool.clone()),
            announcements: SqlxAnnouncementRepository::boxed(pool.clone()),
            carousel: SqlxCarouselRepository::boxed(pool.clone()),
            newsletters: SqlxNewsletterArchiveRepository::boxed(pool.clone()),
            categories: SqlxCategoryRepository::boxed(pool.clone()),
            tags: SqlxTagRepository::boxed(pool.clone()),
            forms: Arc::new(FormService::new(SqlxSubmissionRepository::boxed(pool.clone()))),
            pipeline: Pipeline::new(pool, config.clone()),
            build_lock: Arc::new(Mutex::new(())),
            config: Arc::new(config),
        }
    }

    pub fn media_prefix(&self) -> &str {
        &self.config.content.media_url_prefix
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Request failed: {:#}", err);
        Self::internal_error("Internal server error")
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(fields) => Self::with_details(
                "VALIDATION_ERROR",
                "Invalid form data",
                serde_json::json!(fields),
            ),
            FormError::InternalError(e) => e.into(),
        }
    }
}

/// Extract a bearer token from the request
fn extract_bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Admin token middleware
///
/// Rejects every request when no admin token is configured.
pub async fn require_admin_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let expected = state
        .config
        .admin
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Admin access is disabled"))?;

    let token = extract_bearer_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    if token != expected {
        tracing::warn!("Rejected admin request with an invalid token");
        return Err(ApiError::unauthorized("Invalid authentication token"));
    }

    Ok(next.run(request).await)
}
