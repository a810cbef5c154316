//! Category repository

use crate::db::DynDatabasePool;
use crate::models::Category;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use std::sync::Arc;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List all categories ordered by name
    async fn list(&self) -> Result<Vec<Category>>;
}

pub struct SqlxCategoryRepository {
    pool: DynDatabasePool,
}

impl SqlxCategoryRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, slug, description, created_at
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(self.pool.as_sqlite())
        .await
        .context("Failed to list categories")?;

        rows.iter().map(row_to_category).collect()
    }
}

pub async fn find_category_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<Category>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, slug, description, created_at
        FROM categories
        WHERE name = ?
        "#,
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await
    .context("Failed to get category by name")?;

    row.map(|row| row_to_category(&row)).transpose()
}

/// Look up a category by exact name, creating it with `slug` when missing.
pub async fn get_or_create_category(
    conn: &mut SqliteConnection,
    name: &str,
    slug: &str,
) -> Result<Category> {
    if let Some(category) = find_category_by_name(conn, name).await? {
        return Ok(category);
    }

    let category = Category {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
        description: String::new(),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO categories (id, name, slug, description, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&category.id)
    .bind(&category.name)
    .bind(&category.slug)
    .bind(&category.description)
    .bind(category.created_at)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to create category '{}'", name))?;

    tracing::info!("Created category: {}", category.name);
    Ok(category)
}

pub(crate) fn row_to_category(row: &SqliteRow) -> Result<Category> {
    Ok(Category {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    #[tokio::test]
    async fn test_get_or_create_reuses_by_name() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.unwrap();

        let mut conn = pool.as_sqlite().acquire().await.unwrap();
        let first = get_or_create_category(&mut conn, "Arbitration", "arbitration")
            .await
            .unwrap();
        let again = get_or_create_category(&mut conn, "Arbitration", "arbitration")
            .await
            .unwrap();
        assert_eq!(first.id, again.id);
        drop(conn);

        let repo = SqlxCategoryRepository::new(pool);
        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].slug, "arbitration");
    }
}
