//! Gallery repository

use crate::db::DynDatabasePool;
use crate::models::{Gallery, GalleryInput, Image, ImageInput, UserRef};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait GalleryRepository: Send + Sync {
    /// List galleries newest first, each with its images
    async fn list(&self, published_only: bool) -> Result<Vec<Gallery>>;

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Gallery>>;

    async fn create(&self, input: &GalleryInput) -> Result<Gallery>;

    /// Add an image to a gallery
    async fn add_image(&self, gallery_id: &str, input: &ImageInput) -> Result<Image>;
}

pub struct SqlxGalleryRepository {
    pool: DynDatabasePool,
}

impl SqlxGalleryRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn GalleryRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_GALLERY: &str = r#"
    SELECT g.id, g.title, g.slug, g.description, g.published, g.cover_image, g.created_at,
           g.author_user_id, u.username AS author_username, u.full_name AS author_full_name
    FROM galleries g
    INNER JOIN users u ON u.id = g.author_user_id
"#;

#[async_trait]
impl GalleryRepository for SqlxGalleryRepository {
    async fn list(&self, published_only: bool) -> Result<Vec<Gallery>> {
        let pool = self.pool.as_sqlite();
        let sql = format!(
            "{} WHERE (? = 0 OR g.published = 1) ORDER BY g.created_at DESC",
            SELECT_GALLERY
        );

        let rows = sqlx::query(&sql)
            .bind(published_only)
            .fetch_all(pool)
            .await
            .context("Failed to list galleries")?;

        let mut galleries = Vec::with_capacity(rows.len());
        for row in rows {
            let mut gallery = row_to_gallery(&row)?;
            gallery.images = images_for_gallery(pool, &gallery.id).await?;
            galleries.push(gallery);
        }
        Ok(galleries)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Gallery>> {
        let pool = self.pool.as_sqlite();
        let sql = format!("{} WHERE g.slug = ?", SELECT_GALLERY);

        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(pool)
            .await
            .context("Failed to get gallery by slug")?;

        match row {
            Some(row) => {
                let mut gallery = row_to_gallery(&row)?;
                gallery.images = images_for_gallery(pool, &gallery.id).await?;
                Ok(Some(gallery))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, input: &GalleryInput) -> Result<Gallery> {
        let gallery = Gallery {
            id: uuid::Uuid::new_v4().to_string(),
            title: input.title.clone(),
            slug: input.slug.clone(),
            description: input.description.clone(),
            published: input.published,
            author: input.author.clone(),
            cover_image: input.cover_image.clone(),
            created_at: Utc::now(),
            images: Vec::new(),
        };

        sqlx::query(
            r#"
            INSERT INTO galleries (id, title, slug, description, published, author_user_id, cover_image, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&gallery.id)
        .bind(&gallery.title)
        .bind(&gallery.slug)
        .bind(&gallery.description)
        .bind(gallery.published)
        .bind(&gallery.author.id)
        .bind(&gallery.cover_image)
        .bind(gallery.created_at)
        .execute(self.pool.as_sqlite())
        .await
        .with_context(|| format!("Failed to create gallery '{}'", gallery.slug))?;

        Ok(gallery)
    }

    async fn add_image(&self, gallery_id: &str, input: &ImageInput) -> Result<Image> {
        let image = Image {
            id: uuid::Uuid::new_v4().to_string(),
            title: input.title.clone(),
            image: input.image.clone(),
            alt_text: input.alt_text.clone(),
            caption: input.caption.clone(),
            gallery_id: Some(gallery_id.to_string()),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO images (id, title, image, alt_text, caption, gallery_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&image.id)
        .bind(&image.title)
        .bind(&image.image)
        .bind(&image.alt_text)
        .bind(&image.caption)
        .bind(&image.gallery_id)
        .bind(image.created_at)
        .execute(self.pool.as_sqlite())
        .await
        .context("Failed to add image to gallery")?;

        Ok(image)
    }
}

async fn images_for_gallery(pool: &SqlitePool, gallery_id: &str) -> Result<Vec<Image>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, image, alt_text, caption, gallery_id, created_at
        FROM images
        WHERE gallery_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(gallery_id)
    .fetch_all(pool)
    .await
    .context("Failed to list gallery images")?;

    let mut images = Vec::with_capacity(rows.len());
    for row in rows {
        images.push(Image {
            id: row.get("id"),
            title: row.get("title"),
            image: row.get("image"),
            alt_text: row.get("alt_text"),
            caption: row.get("caption"),
            gallery_id: row.get("gallery_id"),
            created_at: row.get("created_at"),
        });
    }
    Ok(images)
}

fn row_to_gallery(row: &SqliteRow) -> Result<Gallery> {
    let username: String = row.get("author_username");
    let full_name: String = row.get("author_full_name");
    let display_name = if full_name.trim().is_empty() {
        username
    } else {
        full_name
    };

    Ok(Gallery {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        description: row.get("description"),
        published: row.get("published"),
        author: UserRef {
            id: row.get("author_user_id"),
            display_name,
        },
        cover_image: row.get("cover_image"),
        created_at: row.get("created_at"),
        images: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::user::{SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};

    #[tokio::test]
    async fn test_gallery_with_images() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let admin = SqlxUserRepository::new(pool.clone())
            .get_or_create("admin", "")
            .await
            .unwrap();
        let repo = SqlxGalleryRepository::new(pool);

        let gallery = repo
            .create(&GalleryInput {
                title: "Moot 2024".to_string(),
                slug: "moot-2024".to_string(),
                description: String::new(),
                published: true,
                author: admin.to_ref(),
                cover_image: Some("gallery_covers/moot.jpg".to_string()),
            })
            .await
            .unwrap();
        repo.add_image(
            &gallery.id,
            &ImageInput {
                title: "Finals".to_string(),
                image: "gallery_images/finals.jpg".to_string(),
                alt_text: "Finals bench".to_string(),
                caption: String::new(),
            },
        )
        .await
        .unwrap();

        let hidden = repo
            .create(&GalleryInput {
                title: "Draft".to_string(),
                slug: "draft".to_string(),
                description: String::new(),
                published: false,
                author: admin.to_ref(),
                cover_image: None,
            })
            .await
            .unwrap();

        let published = repo.list(true).await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].images.len(), 1);
        assert_eq!(published[0].author.display_name, "admin");

        assert_eq!(repo.list(false).await.unwrap().len(), 2);
        assert!(repo.get_by_slug(&hidden.slug).await.unwrap().is_some());
    }
}
