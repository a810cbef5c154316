//! Blog post repository
//!
//! Reads join the author user and category so a post comes back complete,
//! with its tag set loaded in a second query. Writes only touch the post's
//! own columns; category and tags are attached with [`set_post_category`]
//! and `tag::replace_post_tags` inside the importer's transaction.

use crate::db::repositories::tag::tags_for_post;
use crate::db::repositories::user::author_ref_from_row;
use crate::db::DynDatabasePool;
use crate::models::{Author, BlogPost, Category};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use std::sync::Arc;

/// Filters for listing posts. The default lists everything.
#[derive(Debug, Clone, Default)]
pub struct BlogPostFilter {
    pub published_only: bool,
    pub featured_only: bool,
    pub category_slug: Option<String>,
    /// Case-insensitive substring of the title
    pub title_contains: Option<String>,
    pub limit: Option<i64>,
}

impl BlogPostFilter {
    /// What the public site may see
    pub fn published() -> Self {
        Self {
            published_only: true,
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    /// List posts newest first
    async fn list(&self, filter: &BlogPostFilter) -> Result<Vec<BlogPost>>;

    /// Get a post by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;
}

pub struct SqlxBlogPostRepository {
    pool: DynDatabasePool,
}

impl SqlxBlogPostRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn BlogPostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BlogPostRepository for SqlxBlogPostRepository {
    async fn list(&self, filter: &BlogPostFilter) -> Result<Vec<BlogPost>> {
        let mut conn = self.pool.as_sqlite().acquire().await?;
        list_posts(&mut conn, filter).await
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let mut conn = self.pool.as_sqlite().acquire().await?;
        find_post_by_slug(&mut conn, slug).await
    }
}

const SELECT_POST: &str = r#"
    SELECT b.id, b.title, b.slug, b.content, b.excerpt, b.published, b.featured,
           b.author_user_id, u.username AS author_username, u.full_name AS author_full_name,
           b.author_name, b.author_bio, b.author_email,
           b.category_id, c.name AS category_name, c.slug AS category_slug,
           c.description AS category_description, c.created_at AS category_created_at,
           b.featured_image, b.published_date, b.created_at, b.updated_at
    FROM blog_posts b
    LEFT JOIN users u ON u.id = b.author_user_id
    LEFT JOIN categories c ON c.id = b.category_id
"#;

async fn list_posts(conn: &mut SqliteConnection, filter: &BlogPostFilter) -> Result<Vec<BlogPost>> {
    let sql = format!(
        r#"{}
        WHERE (? = 0 OR b.published = 1)
          AND (? = 0 OR b.featured = 1)
          AND (? IS NULL OR c.slug = ?)
          AND (? IS NULL OR instr(lower(b.title), lower(?)) > 0)
        ORDER BY b.created_at DESC
        LIMIT ?
        "#,
        SELECT_POST
    );

    let rows = sqlx::query(&sql)
        .bind(filter.published_only)
        .bind(filter.featured_only)
        .bind(&filter.category_slug)
        .bind(&filter.category_slug)
        .bind(&filter.title_contains)
        .bind(&filter.title_contains)
        .bind(filter.limit.unwrap_or(-1))
        .fetch_all(&mut *conn)
        .await
        .context("Failed to list blog posts")?;

    let mut posts = Vec::with_capacity(rows.len());
    for row in rows {
        let mut post = row_to_post(&row)?;
        post.tags = tags_for_post(conn, &post.id).await?;
        posts.push(post);
    }

    Ok(posts)
}

pub async fn find_post_by_slug(conn: &mut SqliteConnection, slug: &str) -> Result<Option<BlogPost>> {
    let sql = format!("{} WHERE b.slug = ?", SELECT_POST);

    let row = sqlx::query(&sql)
        .bind(slug)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to get blog post by slug")?;

    match row {
        Some(row) => {
            let mut post = row_to_post(&row)?;
            post.tags = tags_for_post(conn, &post.id).await?;
            Ok(Some(post))
        }
        None => Ok(None),
    }
}

pub async fn insert_post(conn: &mut SqliteConnection, post: &BlogPost) -> Result<()> {
    let author = post.author.columns();

    sqlx::query(
        r#"
        INSERT INTO blog_posts (
            id, title, slug, content, excerpt, published, featured,
            author_user_id, author_name, author_bio, author_email,
            category_id, featured_image, published_date, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&post.id)
    .bind(&post.title)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.excerpt)
    .bind(post.published)
    .bind(post.featured)
    .bind(author.user_id)
    .bind(author.name)
    .bind(author.bio)
    .bind(author.email)
    .bind(post.category.as_ref().map(|c| c.id.as_str()))
    .bind(&post.featured_image)
    .bind(post.published_date)
    .bind(post.created_at)
    .bind(post.updated_at)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to create blog post '{}'", post.slug))?;

    Ok(())
}

/// Write back every column of an existing post except its relations
pub async fn update_post(conn: &mut SqliteConnection, post: &BlogPost) -> Result<()> {
    let author = post.author.columns();

    sqlx::query(
        r#"
        UPDATE blog_posts
        SET title = ?, slug = ?, content = ?, excerpt = ?, published = ?, featured = ?,
            author_user_id = ?, author_name = ?, author_bio = ?, author_email = ?,
            featured_image = ?, published_date = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&post.title)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.excerpt)
    .bind(post.published)
    .bind(post.featured)
    .bind(author.user_id)
    .bind(author.name)
    .bind(author.bio)
    .bind(author.email)
    .bind(&post.featured_image)
    .bind(post.published_date)
    .bind(post.updated_at)
    .bind(&post.id)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to update blog post '{}'", post.slug))?;

    Ok(())
}

pub async fn set_post_category(
    conn: &mut SqliteConnection,
    post_id: &str,
    category_id: Option<&str>,
) -> Result<()> {
    sqlx::query("UPDATE blog_posts SET category_id = ? WHERE id = ?")
        .bind(category_id)
        .bind(post_id)
        .execute(&mut *conn)
        .await
        .context("Failed to set post category")?;
    Ok(())
}

fn row_to_post(row: &SqliteRow) -> Result<BlogPost> {
    let category_id: Option<String> = row.get("category_id");
    let category = match category_id {
        Some(id) => Some(Category {
            id,
            name: row.get("category_name"),
            slug: row.get("category_slug"),
            description: row.get("category_description"),
            created_at: row.get("category_created_at"),
        }),
        None => None,
    };

    Ok(BlogPost {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        content: row.get("content"),
        excerpt: row.get("excerpt"),
        published: row.get("published"),
        featured: row.get("featured"),
        author: Author::from_columns(
            author_ref_from_row(row),
            row.get("author_name"),
            row.get("author_bio"),
            row.get("author_email"),
        ),
        category,
        tags: Vec::new(),
        featured_image: row.get("featured_image"),
        published_date: row.get("published_date"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::category::get_or_create_category;
    use crate::db::repositories::tag::{get_or_create_tag, replace_post_tags};
    use crate::db::repositories::user::get_or_create_user;
    use crate::db::{create_test_pool, migrations};
    use chrono::{Duration, Utc};

    fn sample_post(slug: &str, published: bool, featured: bool, author: Author) -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: uuid::Uuid::new_v4().to_string(),
            title: format!("Post {}", slug),
            slug: slug.to_string(),
            content: "Body".to_string(),
            excerpt: "Body".to_string(),
            published,
            featured,
            author,
            category: None,
            tags: Vec::new(),
            featured_image: None,
            published_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    async fn setup() -> (DynDatabasePool, SqlxBlogPostRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        (pool.clone(), SqlxBlogPostRepository::new(pool))
    }

    #[tokio::test]
    async fn test_insert_and_get_with_relations() {
        let (pool, repo) = setup().await;
        let mut conn = pool.as_sqlite().acquire().await.unwrap();

        let admin = get_or_create_user(&mut conn, "admin", "").await.unwrap();
        let post = sample_post("hello", true, false, Author::Internal(admin.to_ref()));
        insert_post(&mut conn, &post).await.unwrap();

        let category = get_or_create_category(&mut conn, "News", "news").await.unwrap();
        set_post_category(&mut conn, &post.id, Some(category.id.as_str())).await.unwrap();
        let tag = get_or_create_tag(&mut conn, "ADR", "adr").await.unwrap();
        replace_post_tags(&mut conn, &post.id, &[tag]).await.unwrap();
        drop(conn);

        let loaded = repo.get_by_slug("hello").await.unwrap().expect("post exists");
        assert_eq!(loaded.author_display_name(), "admin");
        assert_eq!(loaded.category_name(), Some("News"));
        assert_eq!(loaded.tags.len(), 1);
        assert_eq!(loaded.tags[0].slug, "adr");
    }

    #[tokio::test]
    async fn test_update_switches_author_side() {
        let (pool, repo) = setup().await;
        let mut conn = pool.as_sqlite().acquire().await.unwrap();

        let admin = get_or_create_user(&mut conn, "admin", "").await.unwrap();
        let mut post = sample_post("switch", true, false, Author::Internal(admin.to_ref()));
        insert_post(&mut conn, &post).await.unwrap();

        post.author = Author::external("Guest Writer");
        update_post(&mut conn, &post).await.unwrap();

        let row = sqlx::query("SELECT author_user_id, author_name FROM blog_posts WHERE id = ?")
            .bind(&post.id)
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        let user_id: Option<String> = row.get("author_user_id");
        let name: String = row.get("author_name");
        assert!(user_id.is_none());
        assert_eq!(name, "Guest Writer");
        drop(conn);

        let loaded = repo.get_by_slug("switch").await.unwrap().unwrap();
        assert_eq!(loaded.author, Author::external("Guest Writer"));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (pool, repo) = setup().await;
        let mut conn = pool.as_sqlite().acquire().await.unwrap();

        let mut older = sample_post("older", true, true, Author::external("A"));
        older.created_at = Utc::now() - Duration::days(1);
        insert_post(&mut conn, &older).await.unwrap();
        insert_post(&mut conn, &sample_post("draft", false, false, Author::external("B")))
            .await
            .unwrap();
        insert_post(&mut conn, &sample_post("newer", true, false, Author::external("C")))
            .await
            .unwrap();
        drop(conn);

        let all = repo.list(&BlogPostFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let published = repo.list(&BlogPostFilter::published()).await.unwrap();
        let slugs: Vec<_> = published.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);

        let featured = repo
            .list(&BlogPostFilter {
                featured_only: true,
                ..BlogPostFilter::published()
            })
            .await
            .unwrap();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].slug, "older");

        let search = repo
            .list(&BlogPostFilter {
                title_contains: Some("NEW".to_string()),
                ..BlogPostFilter::published()
            })
            .await
            .unwrap();
        assert_eq!(search.len(), 1);
    }
}
