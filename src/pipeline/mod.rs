//! Content pipeline
//!
//! Authoring files (Markdown posts, YAML rosters and site config) are
//! imported into the content store, then the store is exported as static
//! JSON next to a mirrored media tree.
//!
//! # Failure model
//!
//! Anything that goes wrong with a single file or YAML row is recorded as an
//! [`ImportFailure`] and the stage moves on. Failures that make the whole
//! stage meaningless (unreadable source directory, database unavailable,
//! unwritable output) abort with a [`PipelineError`]. Stages commit as they
//! go, so an abort leaves earlier work in place.

pub mod blog;
pub mod config_data;
pub mod export;
pub mod frontmatter;
pub mod reconcile;
mod rows;
pub mod team;
pub mod text;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::db::repositories::{SqlxUserRepository, UserRepository};
use crate::db::DynDatabasePool;
use crate::models::UserRef;

pub use blog::{BlogImportOptions, BlogImporter};
pub use config_data::ConfigImporter;
pub use export::{ExportReport, Exporter};
pub use reconcile::{Reconcile, Reconciler, Upserted};
pub use team::TeamImporter;

/// Stage-level pipeline failure
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to read {}: {source}", .path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

/// One file or row that could not be imported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportFailure {
    pub item: String,
    pub error: String,
}

/// Outcome of one import stage
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    /// Rows written or confirmed unchanged
    pub imported: usize,
    pub created: usize,
    /// Existing rows whose stored values changed
    pub updated: usize,
    pub failures: Vec<ImportFailure>,
    /// The stage's source was missing and nothing was read
    pub skipped: bool,
}

impl ImportReport {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    /// Count a successful row
    pub fn record(&mut self, created: bool, changed: bool) {
        self.imported += 1;
        if created {
            self.created += 1;
        } else if changed {
            self.updated += 1;
        }
    }

    /// Collect a row failure
    pub fn fail(&mut self, item: impl Into<String>, error: impl std::fmt::Display) {
        let item = item.into();
        let error = format!("{:#}", error);
        tracing::warn!("Failed to import {}: {}", item, error);
        self.failures.push(ImportFailure { item, error });
    }

    /// Fold another report for the same stage into this one
    pub fn absorb(&mut self, other: ImportReport) {
        self.imported += other.imported;
        self.created += other.created;
        self.updated += other.updated;
        self.failures.extend(other.failures);
        self.skipped = self.skipped && other.skipped;
    }
}

/// Everything a full build did
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub blogs: ImportReport,
    pub team: ImportReport,
    pub config: ImportReport,
    pub export: ExportReport,
}

impl BuildReport {
    pub fn failure_count(&self) -> usize {
        self.blogs.failures.len() + self.team.failures.len() + self.config.failures.len()
    }
}

/// Runs the import and export stages against one content store
#[derive(Clone)]
pub struct Pipeline {
    pool: DynDatabasePool,
    config: Config,
}

impl Pipeline {
    pub fn new(pool: DynDatabasePool, config: Config) -> Self {
        Self { pool, config }
    }

    /// The configured admin user, created on first use
    pub async fn default_author(&self) -> Result<UserRef, PipelineError> {
        let users = SqlxUserRepository::new(self.pool.clone());
        let admin = users
            .get_or_create(&self.config.admin.username, &self.config.admin.email)
            .await?;
        Ok(admin.to_ref())
    }

    pub async fn import_blogs(&self) -> Result<ImportReport, PipelineError> {
        let options = BlogImportOptions {
            dir: self.config.content.blog_dir.clone(),
            default_author: self.default_author().await?,
        };
        BlogImporter::new(self.pool.clone(), options).run().await
    }

    pub async fn import_team(&self) -> Result<ImportReport, PipelineError> {
        TeamImporter::new(self.pool.clone(), &self.config.content).run().await
    }

    pub async fn import_config(&self) -> Result<ImportReport, PipelineError> {
        ConfigImporter::new(self.pool.clone(), &self.config.content).run().await
    }

    pub async fn export(&self) -> Result<ExportReport, PipelineError> {
        Exporter::new(self.pool.clone(), &self.config).run().await
    }

    /// Import everything, then export. Stops at the first stage-level error.
    pub async fn build(&self) -> Result<BuildReport, PipelineError> {
        tracing::info!("Starting content build");

        let blogs = self.import_blogs().await.map_err(|e| stage_failed("blog import", e))?;
        let team = self.import_team().await.map_err(|e| stage_failed("team import", e))?;
        let config = self
            .import_config()
            .await
            .map_err(|e| stage_failed("config import", e))?;
        let export = self.export().await.map_err(|e| stage_failed("export", e))?;

        let report = BuildReport {
            blogs,
            team,
            config,
            export,
        };
        tracing::info!(
            "Content build finished with {} row failure(s)",
            report.failure_count()
        );
        Ok(report)
    }
}

/// Whether `path` is an existing directory
pub(crate) async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

fn stage_failed(stage: &str, error: PipelineError) -> PipelineError {
    tracing::error!("Build aborted during {}: {}", stage, error);
    error
}
