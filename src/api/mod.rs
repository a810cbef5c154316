//! API layer - HTTP handlers and routing
//!
//! Public reads for every content family, the public forms and the
//! token-protected build trigger, all under `/api`.

pub mod admin;
pub mod blogs;
pub mod events;
pub mod forms;
pub mod middleware;
pub mod responses;
pub mod search;
pub mod site;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState};

/// Build the `/api` routes
pub fn build_api_router(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .nest("/admin", admin::router())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_admin_token,
        ));

    Router::new()
        .merge(blogs::router())
        .merge(events::router())
        .merge(site::router())
        .merge(search::router())
        .merge(forms::router())
        .merge(admin_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .nest("/api", build_api_router(state.clone()))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origin.trim() == "*" {
        return cors.allow_origin(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => cors.allow_origin(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid CORS origin: {}", origin);
            cors
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::Config;
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::models::{Author, BlogPostInput};
    use axum_test::TestServer;

    /// Test server over a migrated in-memory store. Content and export
    /// paths point into the returned temp dir.
    pub(crate) async fn test_app(
        admin_token: Option<&str>,
    ) -> (TestServer, DynDatabasePool, tempfile::TempDir) {
        let temp = tempfile::tempdir().unwrap();
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();

        let mut config = Config::default();
        config.content.blog_dir = temp.path().join("content/blogs");
        config.content.team_dir = temp.path().join("content/team");
        config.content.config_dir = temp.path().join("content/config");
        config.content.media_root = temp.path().join("media");
        config.export.output_dir = temp.path().join("public/api");
        config.export.media_dir = temp.path().join("public/media");
        config.admin.token = admin_token.map(str::to_string);

        let cors_origin = config.server.cors_origin.clone();
        let app = build_router(AppState::new(pool.clone(), config), &cors_origin);
        (TestServer::new(app).unwrap(), pool, temp)
    }

    pub(crate) fn guest_post(slug: &str, published: bool, featured: bool) -> BlogPostInput {
        BlogPostInput {
            title: slug.replace('-', " "),
            slug: slug.to_string(),
            content: format!("Body of {}", slug),
            excerpt: format!("Body of {}", slug),
            published,
            featured,
            author: Author::external("Guest"),
            published_date: None,
            featured_image: None,
        }
    }
}
