//! Database migrations module
//!
//! Code-based migrations for the content store. All migrations are embedded
//! directly in Rust code as SQL strings so the binary carries its own schema.
//!
//! # Usage
//!
//! ```ignore
//! use gcadr_cms::db::{create_pool, migrations};
//!
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```
//!
//! Each migration is a `Migration` with a unique `version`, a `name` and the
//! SQL to apply. Applied versions are recorded in `_migrations`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use super::DynDatabasePool;

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements to apply
    pub up: &'static str,
}

/// Migration record stored in the database
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    /// Migration version number
    pub version: i64,
    /// Migration name/description
    pub name: String,
    /// When the migration was applied
    pub applied_at: DateTime<Utc>,
}

/// All migrations for the content store.
pub const MIGRATIONS: &[Migration] = &[
    // Migration 1: internal users (targets of internal authorship)
    Migration {
        version: 1,
        name: "create_users",
        up: r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username VARCHAR(150) NOT NULL UNIQUE,
                email VARCHAR(255) NOT NULL DEFAULT '',
                full_name VARCHAR(255) NOT NULL DEFAULT '',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);
        "#,
    },
    // Migration 2: categories and tags
    Migration {
        version: 2,
        name: "create_taxonomy",
        up: r#"
            CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name VARCHAR(100) NOT NULL UNIQUE,
                slug VARCHAR(100) NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS tags (
                id TEXT PRIMARY KEY,
                name VARCHAR(50) NOT NULL UNIQUE,
                slug VARCHAR(50) NOT NULL UNIQUE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
    },
    // Migration 3: blog posts and their tag set
    Migration {
        version: 3,
        name: "create_blog_posts",
        up: r#"
            CREATE TABLE IF NOT EXISTS blog_posts (
                id TEXT PRIMARY KEY,
                title VARCHAR(200) NOT NULL,
                slug VARCHAR(200) NOT NULL UNIQUE,
                content TEXT NOT NULL DEFAULT '',
                excerpt TEXT NOT NULL DEFAULT '',
                published BOOLEAN NOT NULL DEFAULT FALSE,
                featured BOOLEAN NOT NULL DEFAULT FALSE,
                author_user_id TEXT,
                author_name VARCHAR(200) NOT NULL DEFAULT '',
                author_bio TEXT NOT NULL DEFAULT '',
                author_email VARCHAR(255) NOT NULL DEFAULT '',
                category_id TEXT,
                featured_image VARCHAR(255),
                published_date TIMESTAMP NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (author_user_id) REFERENCES users(id) ON DELETE SET NULL,
                FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE SET NULL
            );
            CREATE INDEX IF NOT EXISTS idx_blog_posts_slug ON blog_posts(slug);
            CREATE INDEX IF NOT EXISTS idx_blog_posts_published ON blog_posts(published);
            CREATE TABLE IF NOT EXISTS blog_post_tags (
                blog_post_id TEXT NOT NULL,
                tag_id TEXT NOT NULL,
                PRIMARY KEY (blog_post_id, tag_id),
                FOREIGN KEY (blog_post_id) REFERENCES blog_posts(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            );
        "#,
    },
    // Migration 4: events
    Migration {
        version: 4,
        name: "create_events",
        up: r#"
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                title VARCHAR(200) NOT NULL,
                slug VARCHAR(200) NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL DEFAULT '',
                start_date TIMESTAMP NOT NULL,
                end_date TIMESTAMP,
                location VARCHAR(200) NOT NULL DEFAULT '',
                event_type VARCHAR(20) NOT NULL,
                published BOOLEAN NOT NULL DEFAULT FALSE,
                featured BOOLEAN NOT NULL DEFAULT FALSE,
                author_user_id TEXT,
                author_name VARCHAR(200) NOT NULL DEFAULT '',
                author_bio TEXT NOT NULL DEFAULT '',
                author_email VARCHAR(255) NOT NULL DEFAULT '',
                featured_image VARCHAR(255),
                registration_link VARCHAR(255) NOT NULL DEFAULT '',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (author_user_id) REFERENCES users(id) ON DELETE SET NULL
            );
            CREATE INDEX IF NOT EXISTS idx_events_start_date ON events(start_date);
        "#,
    },
    // Migration 5: galleries and their images
    Migration {
        version: 5,
        name: "create_galleries",
        up: r#"
            CREATE TABLE IF NOT EXISTS galleries (
                id TEXT PRIMARY KEY,
                title VARCHAR(200) NOT NULL,
                slug VARCHAR(200) NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                published BOOLEAN NOT NULL DEFAULT FALSE,
                author_user_id TEXT NOT NULL,
                cover_image VARCHAR(255),
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (author_user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE TABLE IF NOT EXISTS images (
                id TEXT PRIMARY KEY,
                title VARCHAR(200) NOT NULL,
                image VARCHAR(255) NOT NULL,
                alt_text VARCHAR(200) NOT NULL DEFAULT '',
                caption TEXT NOT NULL DEFAULT '',
                gallery_id TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (gallery_id) REFERENCES galleries(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_images_gallery_id ON images(gallery_id);
        "#,
    },
    // Migration 6: team roster and leadership
    Migration {
        version: 6,
        name: "create_team",
        up: r#"
            CREATE TABLE IF NOT EXISTS team_members (
                id TEXT PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                role VARCHAR(30) NOT NULL,
                batch VARCHAR(20) NOT NULL DEFAULT '',
                email VARCHAR(255) NOT NULL DEFAULT '',
                linkedin_url VARCHAR(255) NOT NULL DEFAULT '',
                bio TEXT NOT NULL DEFAULT '',
                image VARCHAR(255),
                active BOOLEAN NOT NULL DEFAULT TRUE,
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS leadership (
                id TEXT PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                position VARCHAR(100) NOT NULL DEFAULT '',
                bio TEXT NOT NULL DEFAULT '',
                email VARCHAR(255) NOT NULL DEFAULT '',
                image VARCHAR(255),
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
    },
    // Migration 7: announcements
    Migration {
        version: 7,
        name: "create_announcements",
        up: r#"
            CREATE TABLE IF NOT EXISTS announcements (
                id TEXT PRIMARY KEY,
                title VARCHAR(200) NOT NULL,
                content TEXT NOT NULL DEFAULT '',
                announcement_type VARCHAR(20) NOT NULL DEFAULT 'general',
                is_featured BOOLEAN NOT NULL DEFAULT FALSE,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                published_date TIMESTAMP NOT NULL,
                expiry_date TIMESTAMP,
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
    },
    // Migration 8: homepage carousel
    Migration {
        version: 8,
        name: "create_carousel_images",
        up: r#"
            CREATE TABLE IF NOT EXISTS carousel_images (
                id TEXT PRIMARY KEY,
                title VARCHAR(200) NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                image VARCHAR(255),
                link_url VARCHAR(255) NOT NULL DEFAULT '',
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
    },
    // Migration 9: newsletter issue archive
    Migration {
        version: 9,
        name: "create_newsletter_archives",
        up: r#"
            CREATE TABLE IF NOT EXISTS newsletter_archives (
                id TEXT PRIMARY KEY,
                title VARCHAR(200) NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                issue_number VARCHAR(50) NOT NULL DEFAULT '',
                pdf_file VARCHAR(255),
                published_date DATE NOT NULL,
                is_featured BOOLEAN NOT NULL DEFAULT FALSE,
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
    },
    // Migration 10: public form submissions (append-only)
    Migration {
        version: 10,
        name: "create_form_submissions",
        up: r#"
            CREATE TABLE IF NOT EXISTS newsletter_subscriptions (
                id TEXT PRIMARY KEY,
                email VARCHAR(255) NOT NULL UNIQUE,
                name VARCHAR(100) NOT NULL DEFAULT '',
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS contact_messages (
                id TEXT PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                email VARCHAR(255) NOT NULL,
                subject VARCHAR(200) NOT NULL DEFAULT '',
                message TEXT NOT NULL,
                attachment VARCHAR(255),
                replied BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS article_submissions (
                id TEXT PRIMARY KEY,
                submission_type VARCHAR(20) NOT NULL,
                title VARCHAR(200) NOT NULL,
                author_name VARCHAR(100) NOT NULL,
                author_email VARCHAR(255) NOT NULL,
                author_bio TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL,
                keywords VARCHAR(500) NOT NULL DEFAULT '',
                status VARCHAR(20) NOT NULL DEFAULT 'pending',
                submitted_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS internship_applications (
                id TEXT PRIMARY KEY,
                applicant_name VARCHAR(100) NOT NULL,
                applicant_email VARCHAR(255) NOT NULL,
                phone VARCHAR(20) NOT NULL DEFAULT '',
                university VARCHAR(200) NOT NULL,
                course VARCHAR(100) NOT NULL,
                year VARCHAR(20) NOT NULL,
                proposed_start_date DATE NOT NULL,
                proposed_end_date DATE NOT NULL,
                interest_letter TEXT NOT NULL,
                cv VARCHAR(255) NOT NULL,
                writing_sample VARCHAR(255) NOT NULL,
                status VARCHAR(20) NOT NULL DEFAULT 'pending',
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
    },
    // Migration 11: carousel title overlay options
    Migration {
        version: 11,
        name: "carousel_title_customization",
        up: r#"
            ALTER TABLE carousel_images ADD COLUMN title_color VARCHAR(20) NOT NULL DEFAULT 'white';
            ALTER TABLE carousel_images ADD COLUMN show_title BOOLEAN NOT NULL DEFAULT TRUE;
        "#,
    },
];

/// Run all pending migrations
///
/// Creates the `_migrations` tracking table if needed, then applies every
/// migration whose version has not been recorded yet, in order.
///
/// Returns the number of migrations applied.
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_migrations(pool.as_sqlite()).await?;
    let applied_versions: Vec<i32> = applied.iter().map(|m| m.version as i32).collect();

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool.as_sqlite(), migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .await?;
    Ok(())
}

async fn get_applied_migrations(pool: &SqlitePool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        });
    }

    Ok(records)
}

/// Apply a single migration and record it, atomically
async fn apply_migration(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    let mut tx = pool.begin().await?;

    for statement in split_sql_statements(migration.up) {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    match sql.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &sql[..idx]),
        None => sql.to_string(),
    }
}

/// Split SQL into individual statements, handling comments properly
fn split_sql_statements(sql: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut current_start = 0;
    let mut in_statement = false;

    for (i, c) in sql.char_indices() {
        match c {
            ';' => {
                if in_statement {
                    let stmt = sql[current_start..i].trim();
                    if !stmt.is_empty() && !is_comment_only(stmt) {
                        statements.push(stmt);
                    }
                    in_statement = false;
                }
                current_start = i + 1;
            }
            _ if !c.is_whitespace() && !in_statement => {
                current_start = i;
                in_statement = true;
            }
            _ => {}
        }
    }

    if in_statement {
        let stmt = sql[current_start..].trim();
        if !stmt.is_empty() && !is_comment_only(stmt) {
            statements.push(stmt);
        }
    }

    statements
}

/// Check if a string contains only SQL comments
fn is_comment_only(s: &str) -> bool {
    s.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with("--")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[tokio::test]
    async fn test_run_migrations() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, MIGRATIONS.len());

        // Running again should apply 0 migrations
        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_carousel_defaults_after_alter() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite();
        sqlx::query("INSERT INTO carousel_images (id, title) VALUES (?, ?)")
            .bind("slide-1")
            .bind("Welcome")
            .execute(sqlite_pool)
            .await
            .expect("Failed to insert carousel image");

        let row = sqlx::query("SELECT title_color, show_title FROM carousel_images WHERE id = ?")
            .bind("slide-1")
            .fetch_one(sqlite_pool)
            .await
            .expect("Failed to read carousel image");

        let color: String = row.get("title_color");
        let show_title: bool = row.get("show_title");
        assert_eq!(color, "white");
        assert!(show_title);
    }

    #[tokio::test]
    async fn test_blog_post_slug_unique() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite();
        let insert = "INSERT INTO blog_posts (id, title, slug, published_date) VALUES (?, ?, ?, ?)";

        sqlx::query(insert)
            .bind("a")
            .bind("First")
            .bind("same-slug")
            .bind(Utc::now())
            .execute(sqlite_pool)
            .await
            .expect("Failed to insert first post");

        let result = sqlx::query(insert)
            .bind("b")
            .bind("Second")
            .bind("same-slug")
            .bind(Utc::now())
            .execute(sqlite_pool)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_foreign_key_constraints() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        // Image pointing at a gallery that doesn't exist
        let result = sqlx::query("INSERT INTO images (id, title, image, gallery_id) VALUES (?, ?, ?, ?)")
            .bind("img-1")
            .bind("Orphan")
            .bind("gallery_images/orphan.jpg")
            .bind("missing-gallery")
            .execute(pool.as_sqlite())
            .await;

        assert!(result.is_err());
    }

    #[test]
    fn test_split_sql_statements() {
        let sql = "CREATE TABLE a (id INT); CREATE TABLE b (id INT);";
        let statements = split_sql_statements(sql);
        assert_eq!(statements.len(), 2);

        let sql_with_comments = "-- Comment\nCREATE TABLE a (id INT);";
        let statements = split_sql_statements(sql_with_comments);
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_is_comment_only() {
        assert!(is_comment_only("-- This is a comment"));
        assert!(is_comment_only("-- Line 1\n-- Line 2"));
        assert!(!is_comment_only("CREATE TABLE test"));
        assert!(!is_comment_only("-- Comment\nCREATE TABLE test"));
    }
}
