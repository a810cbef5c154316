//! Homepage helpers
//!
//! - GET /api/featured - Up to three featured posts and events
//! - GET /api/search?q= - Title search over published posts and events

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{
    BlogPostResponse, EventResponse, FeaturedResponse, SearchResponse,
};
use crate::db::repositories::{BlogPostFilter, EventFilter};

const FEATURED_LIMIT: i64 = 3;
const SEARCH_LIMIT: i64 = 5;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/featured", get(featured))
        .route("/search", get(search))
}

async fn featured(State(state): State<AppState>) -> Result<Json<FeaturedResponse>, ApiError> {
    let blogs = state
        .blogs
        .list(&BlogPostFilter {
            featured_only: true,
            limit: Some(FEATURED_LIMIT),
            ..BlogPostFilter::published()
        })
        .await?;
    let events = state
        .events
        .list(&EventFilter {
            featured_only: true,
            limit: Some(FEATURED_LIMIT),
            ..EventFilter::published()
        })
        .await?;

    let prefix = state.media_prefix();
    Ok(Json(FeaturedResponse {
        featured_blogs: blogs
            .into_iter()
            .map(|p| BlogPostResponse::summary(p, prefix))
            .collect(),
        featured_events: events
            .into_iter()
            .map(|e| EventResponse::summary(e, prefix))
            .collect(),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    if query.q.is_empty() {
        return Ok(Json(serde_json::json!({ "results": [] })).into_response());
    }

    let blogs = state
        .blogs
        .list(&BlogPostFilter {
            title_contains: Some(query.q.clone()),
            limit: Some(SEARCH_LIMIT),
            ..BlogPostFilter::published()
        })
        .await?;
    let events = state
        .events
        .list(&EventFilter {
            title_contains: Some(query.q),
            limit: Some(SEARCH_LIMIT),
            ..EventFilter::published()
        })
        .await?;

    let prefix = state.media_prefix();
    Ok(Json(SearchResponse {
        blogs: blogs
            .into_iter()
            .map(|p| BlogPostResponse::summary(p, prefix))
            .collect(),
        events: events
            .into_iter()
            .map(|e| EventResponse::summary(e, prefix))
            .collect(),
    })
    .into_response())
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{guest_post, test_app};
    use crate::db::repositories::event::tests::event_input;
    use crate::db::repositories::{EventRepository, SqlxEventRepository};
    use crate::models::BlogPost;
    use crate::pipeline::Reconciler;
    use chrono::Utc;
    use serde_json::Value;

    #[tokio::test]
    async fn test_featured_caps_at_three() {
        let (server, pool, _temp) = test_app(None).await;
        let reconciler = Reconciler::new(pool.clone());
        for slug in ["a", "b", "c", "d"] {
            reconciler
                .upsert::<BlogPost>(Some(slug), guest_post(slug, true, true))
                .await
                .unwrap();
        }
        let mut event = event_input("summit", Utc::now());
        event.featured = true;
        SqlxEventRepository::new(pool).create(&event).await.unwrap();

        let body: Value = server.get("/api/featured").await.json();
        assert_eq!(body["featured_blogs"].as_array().unwrap().len(), 3);
        assert_eq!(body["featured_events"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search() {
        let (server, pool, _temp) = test_app(None).await;
        let reconciler = Reconciler::new(pool.clone());
        reconciler
            .upsert::<BlogPost>(Some("mediation-today"), guest_post("mediation-today", true, false))
            .await
            .unwrap();
        reconciler
            .upsert::<BlogPost>(Some("mediation-draft"), guest_post("mediation-draft", false, false))
            .await
            .unwrap();
        SqlxEventRepository::new(pool)
            .create(&event_input("mediation-week", Utc::now()))
            .await
            .unwrap();

        let empty: Value = server.get("/api/search").await.json();
        assert_eq!(empty["results"].as_array().unwrap().len(), 0);

        let body: Value = server
            .get("/api/search")
            .add_query_param("q", "MEDIATION")
            .await
            .json();
        assert_eq!(body["blogs"].as_array().unwrap().len(), 1);
        assert_eq!(body["blogs"][0]["slug"], "mediation-today");
        assert_eq!(body["events"].as_array().unwrap().len(), 1);
    }
}
