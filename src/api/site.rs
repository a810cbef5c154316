//! Site content API endpoints
//!
//! - GET /api/galleries, /api/galleries/{slug}
//! - GET /api/team, /api/leadership
//! - GET /api/announcements (`?type`, `?featured=true`, `?limit`)
//! - GET /api/carousel
//! - GET /api/newsletter-archives

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{
    AnnouncementResponse, CarouselImageResponse, GalleryResponse, LeadershipResponse,
    ListResponse, NewsletterArchiveResponse, TeamMemberResponse,
};
use crate::db::repositories::AnnouncementFilter;
use crate::models::AnnouncementType;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/galleries", get(list_galleries))
        .route("/galleries/{slug}", get(get_gallery))
        .route("/team", get(list_team))
        .route("/leadership", get(list_leadership))
        .route("/announcements", get(list_announcements))
        .route("/carousel", get(list_carousel))
        .route("/newsletter-archives", get(list_newsletter_archives))
}

async fn list_galleries(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<GalleryResponse>>, ApiError> {
    let galleries = state.galleries.list(true).await?;
    Ok(Json(ListResponse::from(
        galleries
            .into_iter()
            .map(|g| GalleryResponse::new(g, state.media_prefix()))
            .collect::<Vec<_>>(),
    )))
}

async fn get_gallery(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<GalleryResponse>, ApiError> {
    let gallery = state
        .galleries
        .get_by_slug(&slug)
        .await?
        .filter(|g| g.published)
        .ok_or_else(|| ApiError::not_found("Gallery not found"))?;

    Ok(Json(GalleryResponse::new(gallery, state.media_prefix())))
}

async fn list_team(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<TeamMemberResponse>>, ApiError> {
    let members = state.team.list_members(true).await?;
    Ok(Json(ListResponse::from(
        members
            .into_iter()
            .map(|m| TeamMemberResponse::new(m, state.media_prefix()))
            .collect::<Vec<_>>(),
    )))
}

async fn list_leadership(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<LeadershipResponse>>, ApiError> {
    let leaders = state.team.list_leadership().await?;
    Ok(Json(ListResponse::from(
        leaders
            .into_iter()
            .map(|l| LeadershipResponse::new(l, state.media_prefix()))
            .collect::<Vec<_>>(),
    )))
}

/// Query parameters for announcements
#[derive(Debug, Default, Deserialize)]
pub struct ListAnnouncementsQuery {
    #[serde(rename = "type")]
    pub announcement_type: Option<String>,
    pub featured: Option<String>,
    pub limit: Option<String>,
}

async fn list_announcements(
    State(state): State<AppState>,
    Query(query): Query<ListAnnouncementsQuery>,
) -> Result<Json<ListResponse<AnnouncementResponse>>, ApiError> {
    let announcement_type = match query.announcement_type.as_deref().filter(|t| !t.is_empty()) {
        None => None,
        Some(raw) => match AnnouncementType::from_str(raw) {
            Some(t) => Some(t),
            None => return Ok(Json(ListResponse::from(Vec::new()))),
        },
    };

    let filter = AnnouncementFilter {
        active_only: true,
        featured_only: query
            .featured
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("true")),
        announcement_type,
        // A limit that is not a number is ignored
        limit: query
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l >= 0),
    };

    let announcements = state.announcements.list(&filter).await?;
    Ok(Json(ListResponse::from(
        announcements
            .into_iter()
            .map(AnnouncementResponse::from)
            .collect::<Vec<_>>(),
    )))
}

async fn list_carousel(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<CarouselImageResponse>>, ApiError> {
    let slides = state.carousel.list(true).await?;
    Ok(Json(ListResponse::from(
        slides
            .into_iter()
            .map(|s| CarouselImageResponse::new(s, state.media_prefix()))
            .collect::<Vec<_>>(),
    )))
}

async fn list_newsletter_archives(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<NewsletterArchiveResponse>>, ApiError> {
    let archives = state.newsletters.list().await?;
    Ok(Json(ListResponse::from(
        archives
            .into_iter()
            .map(|a| NewsletterArchiveResponse::new(a, state.media_prefix()))
            .collect::<Vec<_>>(),
    )))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::test_app;
    use crate::models::{Announcement, AnnouncementInput, AnnouncementType};
    use crate::pipeline::Reconciler;
    use serde_json::Value;

    fn announcement(title: &str, kind: AnnouncementType, featured: bool, active: bool) -> AnnouncementInput {
        AnnouncementInput {
            title: title.to_string(),
            content: String::new(),
            announcement_type: kind,
            is_featured: featured,
            is_active: active,
            published_date: None,
            expiry_date: None,
            sort_order: 0,
        }
    }

    #[tokio::test]
    async fn test_announcement_filters() {
        let (server, pool, _temp) = test_app(None).await;
        let reconciler = Reconciler::new(pool);
        for (id, input) in [
            ("1", announcement("Deadline", AnnouncementType::Deadline, true, true)),
            ("2", announcement("News", AnnouncementType::News, false, true)),
            ("3", announcement("Old", AnnouncementType::News, false, false)),
        ] {
            reconciler
                .upsert::<Announcement>(Some(id), input)
                .await
                .unwrap();
        }

        let all: Value = server.get("/api/announcements").await.json();
        assert_eq!(all["count"], 2);
        assert_eq!(all["results"][0]["title"], "Deadline");

        let news: Value = server
            .get("/api/announcements")
            .add_query_param("type", "news")
            .await
            .json();
        assert_eq!(news["count"], 1);

        let featured: Value = server
            .get("/api/announcements")
            .add_query_param("featured", "TRUE")
            .await
            .json();
        assert_eq!(featured["count"], 1);

        let limited: Value = server
            .get("/api/announcements")
            .add_query_param("limit", "1")
            .await
            .json();
        assert_eq!(limited["count"], 1);

        let bad_limit: Value = server
            .get("/api/announcements")
            .add_query_param("limit", "many")
            .await
            .json();
        assert_eq!(bad_limit["count"], 2);
    }

    #[tokio::test]
    async fn test_empty_collections() {
        let (server, _pool, _temp) = test_app(None).await;
        for path in [
            "/api/team",
            "/api/leadership",
            "/api/carousel",
            "/api/galleries",
            "/api/newsletter-archives",
        ] {
            let body: Value = server.get(path).await.json();
            assert_eq!(body["count"], 0, "{}", path);
        }
    }
}
