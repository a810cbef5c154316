//! Carousel repository

use crate::db::DynDatabasePool;
use crate::models::{CarouselImage, TitleColor};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use std::sync::Arc;

#[async_trait]
pub trait CarouselRepository: Send + Sync {
    /// Slides by display order, newest first within the same position
    async fn list(&self, active_only: bool) -> Result<Vec<CarouselImage>>;
}

pub struct SqlxCarouselRepository {
    pool: DynDatabasePool,
}

impl SqlxCarouselRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CarouselRepository> {
        Arc::new(Self::new(pool))
    }
}

const COLUMNS: &str = "id, title, description, image, link_url, title_color, show_title, is_active, sort_order, created_at, updated_at";

#[async_trait]
impl CarouselRepository for SqlxCarouselRepository {
    async fn list(&self, active_only: bool) -> Result<Vec<CarouselImage>> {
        let sql = format!(
            "SELECT {} FROM carousel_images WHERE (? = 0 OR is_active = 1) ORDER BY sort_order, created_at DESC",
            COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(active_only)
            .fetch_all(self.pool.as_sqlite())
            .await
            .context("Failed to list carousel images")?;

        rows.iter().map(row_to_slide).collect()
    }
}

pub async fn find_slide(conn: &mut SqliteConnection, id: &str) -> Result<Option<CarouselImage>> {
    let sql = format!("SELECT {} FROM carousel_images WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to get carousel image")?;

    row.map(|row| row_to_slide(&row)).transpose()
}

pub async fn insert_slide(conn: &mut SqliteConnection, slide: &CarouselImage) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO carousel_images (id, title, description, image, link_url, title_color,
                                     show_title, is_active, sort_order, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&slide.id)
    .bind(&slide.title)
    .bind(&slide.description)
    .bind(&slide.image)
    .bind(&slide.link_url)
    .bind(slide.title_color.as_str())
    .bind(slide.show_title)
    .bind(slide.is_active)
    .bind(slide.sort_order)
    .bind(slide.created_at)
    .bind(slide.updated_at)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to create carousel image '{}'", slide.title))?;

    Ok(())
}

pub async fn update_slide(conn: &mut SqliteConnection, slide: &CarouselImage) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE carousel_images
        SET title = ?, description = ?, image = ?, link_url = ?, title_color = ?,
            show_title = ?, is_active = ?, sort_order = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&slide.title)
    .bind(&slide.description)
    .bind(&slide.image)
    .bind(&slide.link_url)
    .bind(slide.title_color.as_str())
    .bind(slide.show_title)
    .bind(slide.is_active)
    .bind(slide.sort_order)
    .bind(slide.updated_at)
    .bind(&slide.id)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to update carousel image '{}'", slide.title))?;

    Ok(())
}

fn row_to_slide(row: &SqliteRow) -> Result<CarouselImage> {
    let color: String = row.get("title_color");

    Ok(CarouselImage {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        image: row.get("image"),
        link_url: row.get("link_url"),
        title_color: TitleColor::from_str(&color).unwrap_or_default(),
        show_title: row.get("show_title"),
        is_active: row.get("is_active"),
        sort_order: row.get("sort_order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
