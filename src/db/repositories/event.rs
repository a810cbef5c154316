//! Event repository

use crate::db::repositories::user::author_ref_from_row;
use crate::db::DynDatabasePool;
use crate::models::{Author, Event, EventInput, EventType};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub published_only: bool,
    pub featured_only: bool,
    pub event_type: Option<EventType>,
    /// Only events starting now or later
    pub upcoming: bool,
    /// Case-insensitive substring of the title
    pub title_contains: Option<String>,
    pub limit: Option<i64>,
}

impl EventFilter {
    pub fn published() -> Self {
        Self {
            published_only: true,
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// List events by start date, earliest first
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>>;

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Event>>;

    async fn create(&self, input: &EventInput) -> Result<Event>;
}

pub struct SqlxEventRepository {
    pool: DynDatabasePool,
}

impl SqlxEventRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn EventRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_EVENT: &str = r#"
    SELECT e.id, e.title, e.slug, e.description, e.content, e.start_date, e.end_date,
           e.location, e.event_type, e.published, e.featured,
           e.author_user_id, u.username AS author_username, u.full_name AS author_full_name,
           e.author_name, e.author_bio, e.author_email,
           e.featured_image, e.registration_link, e.created_at, e.updated_at
    FROM events e
    LEFT JOIN users u ON u.id = e.author_user_id
"#;

#[async_trait]
impl EventRepository for SqlxEventRepository {
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let sql = format!(
            r#"{}
            WHERE (? = 0 OR e.published = 1)
              AND (? = 0 OR e.featured = 1)
              AND (? IS NULL OR e.event_type = ?)
              AND (? = 0 OR e.start_date >= ?)
              AND (? IS NULL OR instr(lower(e.title), lower(?)) > 0)
            ORDER BY e.start_date ASC
            LIMIT ?
            "#,
            SELECT_EVENT
        );
        let event_type = filter.event_type.map(|t| t.as_str());

        let rows = sqlx::query(&sql)
            .bind(filter.published_only)
            .bind(filter.featured_only)
            .bind(event_type)
            .bind(event_type)
            .bind(filter.upcoming)
            .bind(Utc::now())
            .bind(&filter.title_contains)
            .bind(&filter.title_contains)
            .bind(filter.limit.unwrap_or(-1))
            .fetch_all(self.pool.as_sqlite())
            .await
            .context("Failed to list events")?;

        rows.iter().map(row_to_event).collect()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        let sql = format!("{} WHERE e.slug = ?", SELECT_EVENT);
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(self.pool.as_sqlite())
            .await
            .context("Failed to get event by slug")?;

        row.map(|row| row_to_event(&row)).transpose()
    }

    async fn create(&self, input: &EventInput) -> Result<Event> {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        let author = input.author.columns();

        sqlx::query(
            r#"
            INSERT INTO events (
                id, title, slug, description, content, start_date, end_date, location,
                event_type, published, featured, author_user_id, author_name, author_bio,
                author_email, featured_image, registration_link, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(&input.content)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.location)
        .bind(input.event_type.as_str())
        .bind(input.published)
        .bind(input.featured)
        .bind(author.user_id)
        .bind(author.name)
        .bind(author.bio)
        .bind(author.email)
        .bind(&input.featured_image)
        .bind(&input.registration_link)
        .bind(now)
        .bind(now)
        .execute(self.pool.as_sqlite())
        .await
        .with_context(|| format!("Failed to create event '{}'", input.slug))?;

        Ok(Event {
            id,
            title: input.title.clone(),
            slug: input.slug.clone(),
            description: input.description.clone(),
            content: input.content.clone(),
            start_date: input.start_date,
            end_date: input.end_date,
            location: input.location.clone(),
            event_type: input.event_type,
            published: input.published,
            featured: input.featured,
            author: input.author.clone(),
            featured_image: input.featured_image.clone(),
            registration_link: input.registration_link.clone(),
            created_at: now,
            updated_at: now,
        })
    }
}

fn row_to_event(row: &SqliteRow) -> Result<Event> {
    let event_type: String = row.get("event_type");
    let event_type = EventType::from_str(&event_type)
        .ok_or_else(|| anyhow::anyhow!("Unknown event type: {}", event_type))?;

    Ok(Event {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        description: row.get("description"),
        content: row.get("content"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        location: row.get("location"),
        event_type,
        published: row.get("published"),
        featured: row.get("featured"),
        author: Author::from_columns(
            author_ref_from_row(row),
            row.get("author_name"),
            row.get("author_bio"),
            row.get("author_email"),
        ),
        featured_image: row.get("featured_image"),
        registration_link: row.get("registration_link"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::{DateTime, Duration};

    pub(crate) fn event_input(slug: &str, start: DateTime<Utc>) -> EventInput {
        EventInput {
            title: format!("Event {}", slug),
            slug: slug.to_string(),
            description: "About".to_string(),
            content: String::new(),
            start_date: start,
            end_date: None,
            location: "GNLU".to_string(),
            event_type: EventType::Workshop,
            published: true,
            featured: false,
            author: Author::external(""),
            featured_image: None,
            registration_link: String::new(),
        }
    }

    #[tokio::test]
    async fn test_list_orders_and_filters() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let repo = SqlxEventRepository::new(pool);

        let now = Utc::now();
        repo.create(&event_input("later", now + Duration::days(10))).await.unwrap();
        repo.create(&event_input("past", now - Duration::days(10))).await.unwrap();
        let mut hidden = event_input("hidden", now + Duration::days(1));
        hidden.published = false;
        repo.create(&hidden).await.unwrap();
        let mut seminar = event_input("seminar", now + Duration::days(5));
        seminar.event_type = EventType::Seminar;
        repo.create(&seminar).await.unwrap();

        let published = repo.list(&EventFilter::published()).await.unwrap();
        let slugs: Vec<_> = published.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["past", "seminar", "later"]);

        let upcoming = repo
            .list(&EventFilter {
                upcoming: true,
                ..EventFilter::published()
            })
            .await
            .unwrap();
        assert_eq!(upcoming.len(), 2);

        let seminars = repo
            .list(&EventFilter {
                event_type: Some(EventType::Seminar),
                ..EventFilter::published()
            })
            .await
            .unwrap();
        assert_eq!(seminars.len(), 1);
        assert_eq!(seminars[0].author_display_name(), "GCADR");
    }
}
