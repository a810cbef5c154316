//! Blog API endpoints
//!
//! - GET /api/blogs - Published posts (`?featured`, `?category=<slug>`)
//! - GET /api/blogs/{slug} - Published post detail
//! - GET /api/categories - All categories
//! - GET /api/tags - All tags

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{BlogPostResponse, CategoryInfo, ListResponse, TagInfo};
use crate::db::repositories::BlogPostFilter;

/// Query parameters for the blog list. `featured` filters on presence.
#[derive(Debug, Default, Deserialize)]
pub struct ListBlogsQuery {
    pub featured: Option<String>,
    pub category: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_blogs))
        .route("/blogs/{slug}", get(get_blog))
        .route("/categories", get(list_categories))
        .route("/tags", get(list_tags))
}

/// GET /api/blogs
async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<ListBlogsQuery>,
) -> Result<Json<ListResponse<BlogPostResponse>>, ApiError> {
    let filter = BlogPostFilter {
        featured_only: query.featured.is_some(),
        category_slug: query.category,
        ..BlogPostFilter::published()
    };

    let posts = state.blogs.list(&filter).await?;
    Ok(Json(ListResponse::from(
        posts
            .into_iter()
            .map(|p| BlogPostResponse::summary(p, state.media_prefix()))
            .collect::<Vec<_>>(),
    )))
}

/// GET /api/blogs/{slug}
async fn get_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    let post = state
        .blogs
        .get_by_slug(&slug)
        .await?
        .filter(|p| p.published)
        .ok_or_else(|| ApiError::not_found("Blog post not found"))?;

    Ok(Json(BlogPostResponse::detail(post, state.media_prefix())))
}

/// GET /api/categories
async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<CategoryInfo>>, ApiError> {
    let categories = state.categories.list().await?;
    Ok(Json(ListResponse::from(
        categories
            .into_iter()
            .map(CategoryInfo::from)
            .collect::<Vec<_>>(),
    )))
}

/// GET /api/tags
async fn list_tags(State(state): State<AppState>) -> Result<Json<ListResponse<TagInfo>>, ApiError> {
    let tags = state.tags.list().await?;
    Ok(Json(ListResponse::from(
        tags.into_iter().map(TagInfo::from).collect::<Vec<_>>(),
    )))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{guest_post, test_app};
    use crate::db::repositories::{category, blog_post};
    use crate::pipeline::Reconciler;
    use crate::models::BlogPost;
    use axum::http::StatusCode;
    use serde_json::Value;

    #[tokio::test]
    async fn test_list_hides_drafts_and_filters() {
        let (server, pool, _temp) = test_app(None).await;
        let reconciler = Reconciler::new(pool.clone());
        reconciler
            .upsert::<BlogPost>(Some("live"), guest_post("live", true, true))
            .await
            .unwrap();
        reconciler
            .upsert::<BlogPost>(Some("plain"), guest_post("plain", true, false))
            .await
            .unwrap();
        reconciler
            .upsert::<BlogPost>(Some("draft"), guest_post("draft", false, true))
            .await
            .unwrap();

        {
            let mut tx = pool.as_sqlite().begin().await.unwrap();
            let cat = category::get_or_create_category(&mut tx, "Insights", "insights")
                .await
                .unwrap();
            let post = blog_post::find_post_by_slug(&mut tx, "plain")
                .await
                .unwrap()
                .unwrap();
            blog_post::set_post_category(&mut tx, &post.id, Some(cat.id.as_str()))
                .await
                .unwrap();
            tx.commit().await.unwrap();
        }

        let body: Value = server.get("/api/blogs").await.json();
        assert_eq!(body["count"], 2);

        let featured: Value = server
            .get("/api/blogs")
            .add_query_param("featured", "")
            .await
            .json();
        assert_eq!(featured["count"], 1);
        assert_eq!(featured["results"][0]["slug"], "live");

        let by_category: Value = server
            .get("/api/blogs")
            .add_query_param("category", "insights")
            .await
            .json();
        assert_eq!(by_category["count"], 1);
        assert_eq!(by_category["results"][0]["category_name"], "Insights");

        let categories: Value = server.get("/api/categories").await.json();
        assert_eq!(categories["results"][0]["slug"], "insights");
    }

    #[tokio::test]
    async fn test_detail_returns_404_for_drafts() {
        let (server, pool, _temp) = test_app(None).await;
        let reconciler = Reconciler::new(pool);
        reconciler
            .upsert::<BlogPost>(Some("draft"), guest_post("draft", false, false))
            .await
            .unwrap();
        reconciler
            .upsert::<BlogPost>(Some("live"), guest_post("live", true, false))
            .await
            .unwrap();

        let response = server.get("/api/blogs/draft").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let detail: Value = server.get("/api/blogs/live").await.json();
        assert_eq!(detail["content"], "Body of live");
    }
}
