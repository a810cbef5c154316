//! User repository
//!
//! Users are only ever looked up or created on demand as content authors.

use crate::db::DynDatabasePool;
use crate::models::{User, UserRef};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use std::sync::Arc;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get user by username
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Return the user with `username`, creating it when missing
    async fn get_or_create(&self, username: &str, email: &str) -> Result<User>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: DynDatabasePool,
}

impl SqlxUserRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let mut conn = self.pool.as_sqlite().acquire().await?;
        find_user_by_username(&mut conn, username).await
    }

    async fn get_or_create(&self, username: &str, email: &str) -> Result<User> {
        let mut tx = self.pool.as_sqlite().begin().await?;
        let user = get_or_create_user(&mut tx, username, email).await?;
        tx.commit().await?;
        Ok(user)
    }
}

pub async fn find_user_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT id, username, email, full_name, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(&mut *conn)
    .await
    .context("Failed to get user by username")?;

    row.map(|row| row_to_user(&row)).transpose()
}

pub async fn get_or_create_user(
    conn: &mut SqliteConnection,
    username: &str,
    email: &str,
) -> Result<User> {
    if let Some(user) = find_user_by_username(conn, username).await? {
        return Ok(user);
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: username.to_string(),
        email: email.to_string(),
        full_name: String::new(),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, full_name, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.full_name)
    .bind(user.created_at)
    .execute(&mut *conn)
    .await
    .context("Failed to create user")?;

    tracing::info!("Created user '{}'", user.username);
    Ok(user)
}

fn row_to_user(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        created_at: row.get("created_at"),
    })
}

/// Read the joined author user columns (`author_user_id`,
/// `author_username`, `author_full_name`) of a content row.
pub(crate) fn author_ref_from_row(row: &SqliteRow) -> Option<UserRef> {
    let id: Option<String> = row.get("author_user_id");
    let username: Option<String> = row.get("author_username");
    let full_name: Option<String> = row.get("author_full_name");

    match (id, username) {
        (Some(id), Some(username)) => {
            let full_name = full_name.unwrap_or_default();
            let display_name = if full_name.trim().is_empty() {
                username
            } else {
                full_name
            };
            Some(UserRef { id, display_name })
        }
        _ => None,
    }
}
