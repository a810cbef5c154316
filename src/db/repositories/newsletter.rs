//! Newsletter archive repository

use crate::db::DynDatabasePool;
use crate::models::NewsletterArchive;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

#[async_trait]
pub trait NewsletterArchiveRepository: Send + Sync {
    /// Newest issue first
    async fn list(&self) -> Result<Vec<NewsletterArchive>>;

    async fn create(&self, archive: &NewsletterArchive) -> Result<()>;
}

pub struct SqlxNewsletterArchiveRepository {
    pool: DynDatabasePool,
}

impl SqlxNewsletterArchiveRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn NewsletterArchiveRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NewsletterArchiveRepository for SqlxNewsletterArchiveRepository {
    async fn list(&self) -> Result<Vec<NewsletterArchive>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, issue_number, pdf_file, published_date,
                   is_featured, sort_order, created_at
            FROM newsletter_archives
            ORDER BY published_date DESC, sort_order
            "#,
        )
        .fetch_all(self.pool.as_sqlite())
        .await
        .context("Failed to list newsletter archives")?;

        rows.iter().map(row_to_archive).collect()
    }

    async fn create(&self, archive: &NewsletterArchive) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO newsletter_archives (id, title, description, issue_number, pdf_file,
                                             published_date, is_featured, sort_order, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&archive.id)
        .bind(&archive.title)
        .bind(&archive.description)
        .bind(&archive.issue_number)
        .bind(&archive.pdf_file)
        .bind(archive.published_date)
        .bind(archive.is_featured)
        .bind(archive.sort_order)
        .bind(archive.created_at)
        .execute(self.pool.as_sqlite())
        .await
        .with_context(|| format!("Failed to create newsletter archive '{}'", archive.title))?;

        Ok(())
    }
}

fn row_to_archive(row: &SqliteRow) -> Result<NewsletterArchive> {
    Ok(NewsletterArchive {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        issue_number: row.get("issue_number"),
        pdf_file: row.get("pdf_file"),
        published_date: row.get("published_date"),
        is_featured: row.get("is_featured"),
        sort_order: row.get("sort_order"),
        created_at: row.get("created_at"),
    })
}
