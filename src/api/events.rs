//! Event API endpoints
//!
//! - GET /api/events - Published events (`?featured`, `?type`, `?upcoming`)
//! - GET /api/events/{slug} - Published event detail

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{EventResponse, ListResponse};
use crate::db::repositories::EventFilter;
use crate::models::EventType;

/// Query parameters for the event list. Flags filter on presence.
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsQuery {
    pub featured: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub upcoming: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/{slug}", get(get_event))
}

/// GET /api/events
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ListResponse<EventResponse>>, ApiError> {
    let event_type = match query.event_type.as_deref() {
        None => None,
        Some(raw) => match EventType::from_str(raw) {
            Some(t) => Some(t),
            // No event can match an unknown type
            None => return Ok(Json(ListResponse::from(Vec::new()))),
        },
    };

    let filter = EventFilter {
        featured_only: query.featured.is_some(),
        event_type,
        upcoming: query.upcoming.is_some(),
        ..EventFilter::published()
    };

    let events = state.events.list(&filter).await?;
    Ok(Json(ListResponse::from(
        events
            .into_iter()
            .map(|e| EventResponse::summary(e, state.media_prefix()))
            .collect::<Vec<_>>(),
    )))
}

/// GET /api/events/{slug}
async fn get_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state
        .events
        .get_by_slug(&slug)
        .await?
        .filter(|e| e.published)
        .ok_or_else(|| ApiError::not_found("Event not found"))?;

    Ok(Json(EventResponse::detail(event, state.media_prefix())))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::test_app;
    use crate::db::repositories::event::tests::event_input;
    use crate::db::repositories::{EventRepository, SqlxEventRepository};
    use crate::models::EventType;
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use serde_json::Value;

    #[tokio::test]
    async fn test_event_filters() {
        let (server, pool, _temp) = test_app(None).await;
        let repo = SqlxEventRepository::new(pool);

        let mut past = event_input("past", Utc::now() - Duration::days(30));
        past.event_type = EventType::Conference;
        repo.create(&past).await.unwrap();

        let mut next = event_input("next", Utc::now() + Duration::days(7));
        next.featured = true;
        repo.create(&next).await.unwrap();

        let mut hidden = event_input("hidden", Utc::now() + Duration::days(1));
        hidden.published = false;
        repo.create(&hidden).await.unwrap();

        let all: Value = server.get("/api/events").await.json();
        assert_eq!(all["count"], 2);

        let upcoming: Value = server
            .get("/api/events")
            .add_query_param("upcoming", "1")
            .await
            .json();
        assert_eq!(upcoming["count"], 1);
        assert_eq!(upcoming["results"][0]["slug"], "next");

        let conferences: Value = server
            .get("/api/events")
            .add_query_param("type", "conference")
            .await
            .json();
        assert_eq!(conferences["count"], 1);
        assert_eq!(conferences["results"][0]["event_type"], "conference");

        let unknown: Value = server
            .get("/api/events")
            .add_query_param("type", "party")
            .await
            .json();
        assert_eq!(unknown["count"], 0);

        server
            .get("/api/events/hidden")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        let detail: Value = server.get("/api/events/next").await.json();
        assert_eq!(detail["author_display_name"], "GCADR");
    }
}
