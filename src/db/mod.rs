//! Database layer
//!
//! SQLite content store for the CMS.
//!
//! # Architecture
//!
//! The rest of the crate holds a `DynDatabasePool` and never opens
//! connections itself. Schema changes live in [`migrations`] and each
//! content family has a repository in [`repositories`].
//!
//! # Usage
//!
//! ```ignore
//! use gcadr_cms::config::DatabaseConfig;
//! use gcadr_cms::db::{create_pool, DatabasePool, migrations};
//!
//! let config = DatabaseConfig::default();
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, DatabasePool, DynDatabasePool, SqliteDatabase};
