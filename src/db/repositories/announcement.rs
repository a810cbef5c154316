//! Announcement repository

use crate::db::DynDatabasePool;
use crate::models::{Announcement, AnnouncementType};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct AnnouncementFilter {
    pub active_only: bool,
    pub featured_only: bool,
    pub announcement_type: Option<AnnouncementType>,
    pub limit: Option<i64>,
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    /// Featured first, then newest, then display order
    async fn list(&self, filter: &AnnouncementFilter) -> Result<Vec<Announcement>>;
}

pub struct SqlxAnnouncementRepository {
    pool: DynDatabasePool,
}

impl SqlxAnnouncementRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn AnnouncementRepository> {
        Arc::new(Self::new(pool))
    }
}

const COLUMNS: &str = "id, title, content, announcement_type, is_featured, is_active, published_date, expiry_date, sort_order, created_at, updated_at";

#[async_trait]
impl AnnouncementRepository for SqlxAnnouncementRepository {
    async fn list(&self, filter: &AnnouncementFilter) -> Result<Vec<Announcement>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM announcements
            WHERE (? = 0 OR is_active = 1)
              AND (? = 0 OR is_featured = 1)
              AND (? IS NULL OR announcement_type = ?)
            ORDER BY is_featured DESC, published_date DESC, sort_order
            LIMIT ?
            "#,
            COLUMNS
        );
        let announcement_type = filter.announcement_type.map(|t| t.as_str());

        let rows = sqlx::query(&sql)
            .bind(filter.active_only)
            .bind(filter.featured_only)
            .bind(announcement_type)
            .bind(announcement_type)
            .bind(filter.limit.unwrap_or(-1))
            .fetch_all(self.pool.as_sqlite())
            .await
            .context("Failed to list announcements")?;

        rows.iter().map(row_to_announcement).collect()
    }
}

pub async fn find_announcement(conn: &mut SqliteConnection, id: &str) -> Result<Option<Announcement>> {
    let sql = format!("SELECT {} FROM announcements WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to get announcement")?;

    row.map(|row| row_to_announcement(&row)).transpose()
}

pub async fn insert_announcement(conn: &mut SqliteConnection, a: &Announcement) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO announcements (id, title, content, announcement_type, is_featured, is_active,
                                   published_date, expiry_date, sort_order, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&a.id)
    .bind(&a.title)
    .bind(&a.content)
    .bind(a.announcement_type.as_str())
    .bind(a.is_featured)
    .bind(a.is_active)
    .bind(a.published_date)
    .bind(a.expiry_date)
    .bind(a.sort_order)
    .bind(a.created_at)
    .bind(a.updated_at)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to create announcement '{}'", a.title))?;

    Ok(())
}

pub async fn update_announcement(conn: &mut SqliteConnection, a: &Announcement) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE announcements
        SET title = ?, content = ?, announcement_type = ?, is_featured = ?, is_active = ?,
            published_date = ?, expiry_date = ?, sort_order = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&a.title)
    .bind(&a.content)
    .bind(a.announcement_type.as_str())
    .bind(a.is_featured)
    .bind(a.is_active)
    .bind(a.published_date)
    .bind(a.expiry_date)
    .bind(a.sort_order)
    .bind(a.updated_at)
    .bind(&a.id)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to update announcement '{}'", a.title))?;

    Ok(())
}

fn row_to_announcement(row: &SqliteRow) -> Result<Announcement> {
    let kind: String = row.get("announcement_type");

    Ok(Announcement {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        announcement_type: AnnouncementType::from_str(&kind).unwrap_or_default(),
        is_featured: row.get("is_featured"),
        is_active: row.get("is_active"),
        published_date: row.get("published_date"),
        expiry_date: row.get("expiry_date"),
        sort_order: row.get("sort_order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::{Duration, Utc};

    fn announcement(id: &str, featured: bool, age_days: i64, kind: AnnouncementType) -> Announcement {
        let now = Utc::now();
        Announcement {
            id: id.to_string(),
            title: id.to_string(),
            content: String::new(),
            announcement_type: kind,
            is_featured: featured,
            is_active: true,
            published_date: now - Duration::days(age_days),
            expiry_date: None,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_list_order_and_filters() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let mut conn = pool.as_sqlite().acquire().await.unwrap();

        insert_announcement(&mut conn, &announcement("old", false, 5, AnnouncementType::News))
            .await
            .unwrap();
        insert_announcement(&mut conn, &announcement("new", false, 1, AnnouncementType::General))
            .await
            .unwrap();
        insert_announcement(&mut conn, &announcement("pinned", true, 9, AnnouncementType::Deadline))
            .await
            .unwrap();
        let mut inactive = announcement("gone", false, 0, AnnouncementType::News);
        inactive.is_active = false;
        insert_announcement(&mut conn, &inactive).await.unwrap();
        drop(conn);

        let repo = SqlxAnnouncementRepository::new(pool);
        let active = repo
            .list(&AnnouncementFilter {
                active_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<_> = active.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["pinned", "new", "old"]);

        let news = repo
            .list(&AnnouncementFilter {
                active_only: true,
                announcement_type: Some(AnnouncementType::News),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(news.len(), 1);

        let limited = repo
            .list(&AnnouncementFilter {
                active_only: true,
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }
}
