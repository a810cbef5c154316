//! Tag repository
//!
//! Tags are shared by name across posts. A post's tag set is always replaced
//! as a whole.

use crate::db::DynDatabasePool;
use crate::models::Tag;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use std::sync::Arc;

#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List all tags ordered by name
    async fn list(&self) -> Result<Vec<Tag>>;
}

pub struct SqlxTagRepository {
    pool: DynDatabasePool,
}

impl SqlxTagRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn list(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, slug FROM tags ORDER BY name")
            .fetch_all(self.pool.as_sqlite())
            .await
            .context("Failed to list tags")?;

        rows.iter().map(row_to_tag).collect()
    }
}

/// Look up a tag by exact name, creating it with `slug` when missing.
pub async fn get_or_create_tag(conn: &mut SqliteConnection, name: &str, slug: &str) -> Result<Tag> {
    let row = sqlx::query("SELECT id, name, slug FROM tags WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to get tag by name")?;

    if let Some(row) = row {
        return row_to_tag(&row);
    }

    let tag = Tag {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
    };

    sqlx::query("INSERT INTO tags (id, name, slug, created_at) VALUES (?, ?, ?, ?)")
        .bind(&tag.id)
        .bind(&tag.name)
        .bind(&tag.slug)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to create tag '{}'", name))?;

    Ok(tag)
}

/// Replace the full tag set of a post
pub async fn replace_post_tags(
    conn: &mut SqliteConnection,
    post_id: &str,
    tags: &[Tag],
) -> Result<()> {
    sqlx::query("DELETE FROM blog_post_tags WHERE blog_post_id = ?")
        .bind(post_id)
        .execute(&mut *conn)
        .await
        .context("Failed to clear post tags")?;

    for tag in tags {
        sqlx::query("INSERT OR IGNORE INTO blog_post_tags (blog_post_id, tag_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(&tag.id)
            .execute(&mut *conn)
            .await
            .context("Failed to attach tag to post")?;
    }

    Ok(())
}

/// Tags of a post ordered by name
pub async fn tags_for_post(conn: &mut SqliteConnection, post_id: &str) -> Result<Vec<Tag>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name, t.slug
        FROM tags t
        INNER JOIN blog_post_tags bt ON bt.tag_id = t.id
        WHERE bt.blog_post_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(post_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to get tags for post")?;

    rows.iter().map(row_to_tag).collect()
}

fn row_to_tag(row: &SqliteRow) -> Result<Tag> {
    Ok(Tag {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
    })
}
