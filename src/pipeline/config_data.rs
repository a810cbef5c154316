//! Site configuration importer: homepage carousel and announcements

use std::path::PathBuf;

use serde::Deserialize;

use super::frontmatter::lenient_string;
use super::reconcile::Reconciler;
use super::rows::{default_true, import_yaml_rows, ImportRow};
use super::text::{parse_timestamp, strip_media_prefix};
use super::{is_dir, ImportReport, PipelineError};
use crate::config::ContentConfig;
use crate::db::DynDatabasePool;
use crate::models::{
    Announcement, AnnouncementInput, AnnouncementType, CarouselImage, CarouselImageInput,
    TitleColor,
};

pub const CAROUSEL_FILE: &str = "carousel.yaml";
pub const ANNOUNCEMENTS_FILE: &str = "announcements.yaml";

#[derive(Debug, Deserialize)]
struct CarouselRow {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    link_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    title_color: Option<String>,
    #[serde(default = "default_true")]
    show_title: bool,
    #[serde(default = "default_true")]
    active: bool,
    #[serde(default)]
    order: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnnouncementRow {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    content: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    announcement_type: Option<String>,
    #[serde(default)]
    featured: bool,
    #[serde(default = "default_true")]
    active: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    published_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    expiry_date: Option<String>,
    #[serde(default)]
    order: i64,
}

impl ImportRow for CarouselRow {
    type Record = CarouselImage;

    fn key(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn into_input(self, media_prefix: &str) -> CarouselImageInput {
        CarouselImageInput {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            image: self
                .image
                .and_then(|path| strip_media_prefix(&path, media_prefix)),
            link_url: self.link_url.unwrap_or_default(),
            title_color: self
                .title_color
                .as_deref()
                .and_then(TitleColor::from_str)
                .unwrap_or_default(),
            show_title: self.show_title,
            is_active: self.active,
            sort_order: self.order,
        }
    }
}

impl ImportRow for AnnouncementRow {
    type Record = Announcement;

    fn key(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn into_input(self, _media_prefix: &str) -> AnnouncementInput {
        AnnouncementInput {
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            announcement_type: self
                .announcement_type
                .as_deref()
                .and_then(AnnouncementType::from_str)
                .unwrap_or_default(),
            is_featured: self.featured,
            is_active: self.active,
            published_date: self.published_date.as_deref().and_then(parse_timestamp),
            expiry_date: self.expiry_date.as_deref().and_then(parse_timestamp),
            sort_order: self.order,
        }
    }
}

pub struct ConfigImporter {
    reconciler: Reconciler,
    dir: PathBuf,
    media_prefix: String,
}

impl ConfigImporter {
    pub fn new(pool: DynDatabasePool, content: &ContentConfig) -> Self {
        Self {
            reconciler: Reconciler::new(pool),
            dir: content.config_dir.clone(),
            media_prefix: content.media_url_prefix.clone(),
        }
    }

    pub async fn run(&self) -> Result<ImportReport, PipelineError> {
        if !is_dir(&self.dir).await {
            tracing::info!("Config directory {} not found, skipping", self.dir.display());
            return Ok(ImportReport::skipped());
        }

        let mut report = import_yaml_rows::<CarouselRow>(
            &self.reconciler,
            &self.dir.join(CAROUSEL_FILE),
            "carousel_images",
            &self.media_prefix,
        )
        .await;
        report.absorb(
            import_yaml_rows::<AnnouncementRow>(
                &self.reconciler,
                &self.dir.join(ANNOUNCEMENTS_FILE),
                "announcements",
                &self.media_prefix,
            )
            .await,
        );

        Ok(report)
    }
}
