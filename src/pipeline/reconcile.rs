//! Upsert-by-identifier over persisted content records
//!
//! Importers describe a record as an input value plus an optional key. The
//! reconciler finds the stored record for that key, then either creates it or
//! overwrites the supplied fields. Media fields are the exception: a stored
//! media path is never replaced, only filled in when empty.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqliteConnection;

use crate::db::repositories::{announcement, blog_post, carousel, team};
use crate::db::DynDatabasePool;
use crate::models::{
    Announcement, AnnouncementInput, BlogPost, BlogPostInput, CarouselImage, CarouselImageInput,
    Leadership, LeadershipInput, TeamMember, TeamMemberInput,
};

/// A content record that can be created or updated from an import input
#[async_trait]
pub trait Reconcile: Sized + Send + Sync {
    type Input: Send;

    /// Used in log lines and failure reports
    const KIND: &'static str;

    async fn lookup(conn: &mut SqliteConnection, key: &str) -> Result<Option<Self>>;

    async fn insert(conn: &mut SqliteConnection, record: &Self) -> Result<()>;

    async fn save(conn: &mut SqliteConnection, record: &Self) -> Result<()>;

    /// Build a new record with the given identity
    fn create(id: String, input: Self::Input) -> Self;

    /// Apply an input to a stored record. Returns whether anything changed.
    fn merge(&mut self, input: Self::Input) -> bool;

    /// Identity of a record created under `key`. Records keyed by id keep the
    /// supplied id; without one they get a fresh UUID.
    fn identity(key: Option<&str>) -> String {
        match key {
            Some(key) => key.to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Result of one upsert
#[derive(Debug, Clone)]
pub struct Upserted<T> {
    pub record: T,
    pub created: bool,
    /// False when an existing record already matched the input
    pub changed: bool,
}

/// Runs each upsert in its own transaction
#[derive(Clone)]
pub struct Reconciler {
    pool: DynDatabasePool,
}

impl Reconciler {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub async fn upsert<T: Reconcile>(&self, key: Option<&str>, input: T::Input) -> Result<Upserted<T>> {
        let mut tx = self.pool.as_sqlite().begin().await?;
        let upserted = upsert_in::<T>(&mut tx, key, input).await?;
        tx.commit().await?;
        Ok(upserted)
    }
}

/// Upsert inside a caller-owned transaction
pub async fn upsert_in<T: Reconcile>(
    conn: &mut SqliteConnection,
    key: Option<&str>,
    input: T::Input,
) -> Result<Upserted<T>> {
    let existing = match key {
        Some(key) => T::lookup(conn, key).await?,
        None => None,
    };

    match existing {
        Some(mut record) => {
            let changed = record.merge(input);
            if changed {
                T::save(conn, &record).await?;
            }
            Ok(Upserted {
                record,
                created: false,
                changed,
            })
        }
        None => {
            let record = T::create(T::identity(key), input);
            T::insert(conn, &record).await?;
            Ok(Upserted {
                record,
                created: true,
                changed: true,
            })
        }
    }
}

fn assign<T: PartialEq>(slot: &mut T, value: T, changed: &mut bool) {
    if *slot != value {
        *slot = value;
        *changed = true;
    }
}

/// Fill an empty media slot; a stored path always wins
fn fill_media(slot: &mut Option<String>, incoming: Option<String>, changed: &mut bool) {
    let empty = slot.as_deref().map_or(true, |s| s.trim().is_empty());
    if let Some(path) = incoming.filter(|p| !p.trim().is_empty()) {
        if empty {
            *slot = Some(path);
            *changed = true;
        }
    }
}

#[async_trait]
impl Reconcile for BlogPost {
    type Input = BlogPostInput;
    const KIND: &'static str = "blog post";

    async fn lookup(conn: &mut SqliteConnection, slug: &str) -> Result<Option<Self>> {
        blog_post::find_post_by_slug(conn, slug).await
    }

    async fn insert(conn: &mut SqliteConnection, record: &Self) -> Result<()> {
        blog_post::insert_post(conn, record).await
    }

    async fn save(conn: &mut SqliteConnection, record: &Self) -> Result<()> {
        blog_post::update_post(conn, record).await
    }

    fn create(id: String, input: BlogPostInput) -> Self {
        let now = Utc::now();
        BlogPost {
            id,
            title: input.title,
            slug: input.slug,
            content: input.content,
            excerpt: input.excerpt,
            published: input.published,
            featured: input.featured,
            author: input.author,
            category: None,
            tags: Vec::new(),
            featured_image: input.featured_image.filter(|p| !p.trim().is_empty()),
            published_date: input.published_date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }

    fn merge(&mut self, input: BlogPostInput) -> bool {
        let mut changed = false;
        assign(&mut self.title, input.title, &mut changed);
        assign(&mut self.slug, input.slug, &mut changed);
        assign(&mut self.content, input.content, &mut changed);
        assign(&mut self.excerpt, input.excerpt, &mut changed);
        assign(&mut self.published, input.published, &mut changed);
        assign(&mut self.featured, input.featured, &mut changed);
        assign(&mut self.author, input.author, &mut changed);
        if let Some(date) = input.published_date {
            assign(&mut self.published_date, date, &mut changed);
        }
        fill_media(&mut self.featured_image, input.featured_image, &mut changed);
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }

    /// Posts are keyed by slug, so their id is always generated
    fn identity(_key: Option<&str>) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl Reconcile for TeamMember {
    type Input = TeamMemberInput;
    const KIND: &'static str = "team member";

    async fn lookup(conn: &mut SqliteConnection, id: &str) -> Result<Option<Self>> {
        team::find_member(conn, id).await
    }

    async fn insert(conn: &mut SqliteConnection, record: &Self) -> Result<()> {
        team::insert_member(conn, record).await
    }

    async fn save(conn: &mut SqliteConnection, record: &Self) -> Result<()> {
        team::update_member(conn, record).await
    }

    fn create(id: String, input: TeamMemberInput) -> Self {
        let now = Utc::now();
        TeamMember {
            id,
            name: input.name,
            role: input.role,
            batch: input.batch,
            email: input.email,
            linkedin_url: input.linkedin_url,
            bio: input.bio,
            image: input.image.filter(|p| !p.trim().is_empty()),
            active: input.active,
            sort_order: input.sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    fn merge(&mut self, input: TeamMemberInput) -> bool {
        let mut changed = false;
        assign(&mut self.name, input.name, &mut changed);
        assign(&mut self.role, input.role, &mut changed);
        assign(&mut self.batch, input.batch, &mut changed);
        assign(&mut self.email, input.email, &mut changed);
        assign(&mut self.linkedin_url, input.linkedin_url, &mut changed);
        assign(&mut self.bio, input.bio, &mut changed);
        assign(&mut self.active, input.active, &mut changed);
        assign(&mut self.sort_order, input.sort_order, &mut changed);
        fill_media(&mut self.image, input.image, &mut changed);
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}

#[async_trait]
impl Reconcile for Leadership {
    type Input = LeadershipInput;
    const KIND: &'static str = "leadership entry";

    async fn lookup(conn: &mut SqliteConnection, id: &str) -> Result<Option<Self>> {
        team::find_leader(conn, id).await
    }

    async fn insert(conn: &mut SqliteConnection, record: &Self) -> Result<()> {
        team::insert_leader(conn, record).await
    }

    async fn save(conn: &mut SqliteConnection, record: &Self) -> Result<()> {
        team::update_leader(conn, record).await
    }

    fn create(id: String, input: LeadershipInput) -> Self {
        let now = Utc::now();
        Leadership {
            id,
            name: input.name,
            position: input.position,
            bio: input.bio,
            email: input.email,
            image: input.image.filter(|p| !p.trim().is_empty()),
            sort_order: input.sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    fn merge(&mut self, input: LeadershipInput) -> bool {
        let mut changed = false;
        assign(&mut self.name, input.name, &mut changed);
        assign(&mut self.position, input.position, &mut changed);
        assign(&mut self.bio, input.bio, &mut changed);
        assign(&mut self.email, input.email, &mut changed);
        assign(&mut self.sort_order, input.sort_order, &mut changed);
        fill_media(&mut self.image, input.image, &mut changed);
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}

#[async_trait]
impl Reconcile for CarouselImage {
    type Input = CarouselImageInput;
    const KIND: &'static str = "carousel image";

    async fn lookup(conn: &mut SqliteConnection, id: &str) -> Result<Option<Self>> {
        carousel::find_slide(conn, id).await
    }

    async fn insert(conn: &mut SqliteConnection, record: &Self) -> Result<()> {
        carousel::insert_slide(conn, record).await
    }

    async fn save(conn: &mut SqliteConnection, record: &Self) -> Result<()> {
        carousel::update_slide(conn, record).await
    }

    fn create(id: String, input: CarouselImageInput) -> Self {
        let now = Utc::now();
        CarouselImage {
            id,
            title: input.title,
            description: input.description,
            image: input.image.filter(|p| !p.trim().is_empty()),
            link_url: input.link_url,
            title_color: input.title_color,
            show_title: input.show_title,
            is_active: input.is_active,
            sort_order: input.sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    fn merge(&mut self, input: CarouselImageInput) -> bool {
        let mut changed = false;
        assign(&mut self.title, input.title, &mut changed);
        assign(&mut self.description, input.description, &mut changed);
        assign(&mut self.link_url, input.link_url, &mut changed);
        assign(&mut self.title_color, input.title_color, &mut changed);
        assign(&mut self.show_title, input.show_title, &mut changed);
        assign(&mut self.is_active, input.is_active, &mut changed);
        assign(&mut self.sort_order, input.sort_order, &mut changed);
        fill_media(&mut self.image, input.image, &mut changed);
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}

#[async_trait]
impl Reconcile for Announcement {
    type Input = AnnouncementInput;
    const KIND: &'static str = "announcement";

    async fn lookup(conn: &mut SqliteConnection, id: &str) -> Result<Option<Self>> {
        announcement::find_announcement(conn, id).await
    }

    async fn insert(conn: &mut SqliteConnection, record: &Self) -> Result<()> {
        announcement::insert_announcement(conn, record).await
    }

    async fn save(conn: &mut SqliteConnection, record: &Self) -> Result<()> {
        announcement::update_announcement(conn, record).await
    }

    fn create(id: String, input: AnnouncementInput) -> Self {
        let now = Utc::now();
        Announcement {
            id,
            title: input.title,
            content: input.content,
            announcement_type: input.announcement_type,
            is_featured: input.is_featured,
            is_active: input.is_active,
            published_date: input.published_date.unwrap_or(now),
            expiry_date: input.expiry_date,
            sort_order: input.sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    fn merge(&mut self, input: AnnouncementInput) -> bool {
        let mut changed = false;
        assign(&mut self.title, input.title, &mut changed);
        assign(&mut self.content, input.content, &mut changed);
        assign(&mut self.announcement_type, input.announcement_type, &mut changed);
        assign(&mut self.is_featured, input.is_featured, &mut changed);
        assign(&mut self.is_active, input.is_active, &mut changed);
        if let Some(date) = input.published_date {
            assign(&mut self.published_date, date, &mut changed);
        }
        assign(&mut self.expiry_date, input.expiry_date, &mut changed);
        assign(&mut self.sort_order, input.sort_order, &mut changed);
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}
