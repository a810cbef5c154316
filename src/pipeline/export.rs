//! Static exporter
//!
//! Writes every publicly visible collection as `{results, count}` JSON and
//! mirrors the media tree next to it.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::text::is_valid_slug;
use super::{is_dir, PipelineError};
use crate::api::responses::{
    AnnouncementResponse, BlogPostResponse, CarouselImageResponse, EventResponse,
    GalleryResponse, LeadershipResponse, ListResponse, NewsletterArchiveResponse,
    TeamMemberResponse,
};
use crate::config::Config;
use crate::db::repositories::{
    AnnouncementFilter, AnnouncementRepository, BlogPostFilter, BlogPostRepository,
    CarouselRepository, EventFilter, EventRepository, GalleryRepository,
    NewsletterArchiveRepository, SqlxAnnouncementRepository, SqlxBlogPostRepository,
    SqlxCarouselRepository, SqlxEventRepository, SqlxGalleryRepository,
    SqlxNewsletterArchiveRepository, SqlxTeamRepository, TeamRepository,
};
use crate::db::DynDatabasePool;

/// What one export run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    pub output_dir: PathBuf,
    pub files_written: usize,
    /// Rows exported per collection file
    pub counts: BTreeMap<String, usize>,
    pub media_copied: bool,
}

pub struct Exporter {
    blogs: Arc<dyn BlogPostRepository>,
    events: Arc<dyn EventRepository>,
    team: Arc<dyn TeamRepository>,
    announcements: Arc<dyn AnnouncementRepository>,
    carousel: Arc<dyn CarouselRepository>,
    galleries: Arc<dyn GalleryRepository>,
    newsletters: Arc<dyn NewsletterArchiveRepository>,
    output_dir: PathBuf,
    media_root: PathBuf,
    media_dir: PathBuf,
    media_prefix: String,
}

impl Exporter {
    pub fn new(pool: DynDatabasePool, config: &Config) -> Self {
        Self {
            blogs: SqlxBlogPostRepository::boxed(pool.clone()),
            events: SqlxEventRepository::boxed(pool.clone()),
            team: SqlxTeamRepository::boxed(pool.clone()),
            announcements: SqlxAnnouncementRepository::boxed(pool.clone()),
            carousel: SqlxCarouselRepository::boxed(pool.clone()),
            galleries: SqlxGalleryRepository::boxed(pool.clone()),
            newsletters: SqlxNewsletterArchiveRepository::boxed(pool),
            output_dir: config.export.output_dir.clone(),
            media_root: config.content.media_root.clone(),
            media_dir: config.export.media_dir.clone(),
            media_prefix: config.content.media_url_prefix.clone(),
        }
    }

    pub async fn run(&self) -> Result<ExportReport, PipelineError> {
        tracing::info!("Exporting content to {}", self.output_dir.display());
        let mut report = ExportReport {
            output_dir: self.output_dir.clone(),
            ..ExportReport::default()
        };

        self.export_blogs(&mut report).await?;

        let events = self.events.list(&EventFilter::published()).await?;
        self.write_collection(
            &mut report,
            "events.json",
            events
                .into_iter()
                .map(|e| EventResponse::summary(e, &self.media_prefix))
                .collect(),
        )
        .await?;

        let members = self.team.list_members(true).await?;
        self.write_collection(
            &mut report,
            "team.json",
            members
                .into_iter()
                .map(|m| TeamMemberResponse::new(m, &self.media_prefix))
                .collect(),
        )
        .await?;

        let leaders = self.team.list_leadership().await?;
        self.write_collection(
            &mut report,
            "leadership.json",
            leaders
                .into_iter()
                .map(|l| LeadershipResponse::new(l, &self.media_prefix))
                .collect(),
        )
        .await?;

        let announcements = self
            .announcements
            .list(&AnnouncementFilter {
                active_only: true,
                ..AnnouncementFilter::default()
            })
            .await?;
        self.write_collection(
            &mut report,
            "announcements.json",
            announcements
                .into_iter()
                .map(AnnouncementResponse::from)
                .collect(),
        )
        .await?;

        let slides = self.carousel.list(true).await?;
        self.write_collection(
            &mut report,
            "carousel.json",
            slides
                .into_iter()
                .map(|s| CarouselImageResponse::new(s, &self.media_prefix))
                .collect(),
        )
        .await?;

        let galleries = self.galleries.list(true).await?;
        self.write_collection(
            &mut report,
            "galleries.json",
            galleries
                .into_iter()
                .map(|g| GalleryResponse::new(g, &self.media_prefix))
                .collect(),
        )
        .await?;

        let archives = self.newsletters.list().await?;
        self.write_collection(
            &mut report,
            "newsletters.json",
            archives
                .into_iter()
                .map(|a| NewsletterArchiveResponse::new(a, &self.media_prefix))
                .collect(),
        )
        .await?;

        report.media_copied = self.copy_media().await?;

        tracing::info!(
            "Export finished: {} file(s) written to {}",
            report.files_written,
            self.output_dir.display()
        );
        Ok(report)
    }

    /// `blogs.json` plus one detail file per post under `blogs/`
    async fn export_blogs(&self, report: &mut ExportReport) -> Result<(), PipelineError> {
        let posts = self.blogs.list(&BlogPostFilter::published()).await?;

        let posts_dir = self.output_dir.join("blogs");
        for post in &posts {
            if !is_valid_slug(&post.slug) {
                tracing::warn!("Skipping detail file for post with unsafe slug '{}'", post.slug);
                continue;
            }
            let path = posts_dir.join(format!("{}.json", post.slug));
            write_json(&path, &BlogPostResponse::detail(post.clone(), &self.media_prefix)).await?;
            report.files_written += 1;
        }

        self.write_collection(
            report,
            "blogs.json",
            posts
                .into_iter()
                .map(|p| BlogPostResponse::summary(p, &self.media_prefix))
                .collect(),
        )
        .await
    }

    async fn write_collection<T: Serialize>(
        &self,
        report: &mut ExportReport,
        name: &str,
        results: Vec<T>,
    ) -> Result<(), PipelineError> {
        let list = ListResponse::from(results);
        write_json(&self.output_dir.join(name), &list).await?;

        tracing::info!("Exported {} row(s) to {}", list.count, name);
        report.counts.insert(name.to_string(), list.count);
        report.files_written += 1;
        Ok(())
    }

    /// Replace the exported media tree with a fresh copy of `media_root`.
    /// Returns false when there is no media to copy.
    async fn copy_media(&self) -> Result<bool, PipelineError> {
        if !is_dir(&self.media_root).await {
            tracing::info!(
                "Media directory {} not found, skipping media copy",
                self.media_root.display()
            );
            return Ok(false);
        }

        let src = self.media_root.clone();
        let dst = self.media_dir.clone();
        tokio::task::spawn_blocking(move || replace_dir(&src, &dst))
            .await
            .map_err(|e| PipelineError::WriteOutput {
                path: self.media_dir.clone(),
                source: io::Error::other(e),
            })?
            .map_err(|source| PipelineError::WriteOutput {
                path: self.media_dir.clone(),
                source,
            })?;

        tracing::info!("Copied media files to {}", self.media_dir.display());
        Ok(true)
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let body = serde_json::to_vec_pretty(value).map_err(|source| PipelineError::Encode {
        name: path.display().to_string(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| PipelineError::WriteOutput {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(path, body)
        .await
        .map_err(|source| PipelineError::WriteOutput {
            path: path.to_path_buf(),
            source,
        })
}

fn replace_dir(src: &Path, dst: &Path) -> io::Result<()> {
    if dst.exists() {
        fs::remove_dir_all(dst)?;
    }
    copy_dir_all(src, dst)
}

fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}
