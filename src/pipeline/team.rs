//! Team roster and leadership importer
//!
//! Reads `team-members.yaml` and `leadership.yaml` from the team directory.
//! Rows are keyed by their `id` so re-running the import updates in place.

use std::path::PathBuf;

use serde::Deserialize;

use super::frontmatter::lenient_string;
use super::reconcile::Reconciler;
use super::rows::{default_true, import_yaml_rows, ImportRow};
use super::text::strip_media_prefix;
use super::{is_dir, ImportReport, PipelineError};
use crate::config::ContentConfig;
use crate::db::DynDatabasePool;
use crate::models::{Leadership, LeadershipInput, TeamMember, TeamMemberInput, TeamRole};

pub const TEAM_FILE: &str = "team-members.yaml";
pub const LEADERSHIP_FILE: &str = "leadership.yaml";

#[derive(Debug, Deserialize)]
struct TeamMemberRow {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    position: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    linkedin_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    bio: Option<String>,
    #[serde(default)]
    order: i64,
    #[serde(default = "default_true")]
    active: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LeadershipRow {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    position: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    bio: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    email: Option<String>,
    #[serde(default)]
    order: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    image: Option<String>,
}

impl ImportRow for TeamMemberRow {
    type Record = TeamMember;

    fn key(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn into_input(self, media_prefix: &str) -> TeamMemberInput {
        TeamMemberInput {
            name: self.name.unwrap_or_default(),
            role: TeamRole::from_position(self.position.as_deref().unwrap_or_default()),
            batch: self.year.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            linkedin_url: self.linkedin_url.unwrap_or_default(),
            bio: self.bio.unwrap_or_default(),
            image: self
                .image
                .and_then(|path| strip_media_prefix(&path, media_prefix)),
            active: self.active,
            sort_order: self.order,
        }
    }
}

impl ImportRow for LeadershipRow {
    type Record = Leadership;

    fn key(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn into_input(self, media_prefix: &str) -> LeadershipInput {
        LeadershipInput {
            name: self.name.unwrap_or_default(),
            position: self.position.unwrap_or_default(),
            bio: self.bio.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            image: self
                .image
                .and_then(|path| strip_media_prefix(&path, media_prefix)),
            sort_order: self.order,
        }
    }
}

pub struct TeamImporter {
    reconciler: Reconciler,
    dir: PathBuf,
    media_prefix: String,
}

impl TeamImporter {
    pub fn new(pool: DynDatabasePool, content: &ContentConfig) -> Self {
        Self {
            reconciler: Reconciler::new(pool),
            dir: content.team_dir.clone(),
            media_prefix: content.media_url_prefix.clone(),
        }
    }

    pub async fn run(&self) -> Result<ImportReport, PipelineError> {
        if !is_dir(&self.dir).await {
            tracing::info!("Team directory {} not found, skipping", self.dir.display());
            return Ok(ImportReport::skipped());
        }

        let mut report = import_yaml_rows::<TeamMemberRow>(
            &self.reconciler,
            &self.dir.join(TEAM_FILE),
            "team_members",
            &self.media_prefix,
        )
        .await;
        report.absorb(
            import_yaml_rows::<LeadershipRow>(
                &self.reconciler,
                &self.dir.join(LEADERSHIP_FILE),
                "leadership",
                &self.media_prefix,
            )
            .await,
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxTeamRepository, TeamRepository};
    use crate::db::{create_test_pool, migrations};
    use std::fs;

    async fn setup() -> (tempfile::TempDir, DynDatabasePool, TeamImporter) {
        let temp = tempfile::tempdir().unwrap();
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();

        let content = ContentConfig {
            team_dir: temp.path().to_path_buf(),
            ..ContentConfig::default()
        };
        let importer = TeamImporter::new(pool.clone(), &content);
        (temp, pool, importer)
    }

    #[tokio::test]
    async fn test_import_members_and_leadership() {
        let (temp, pool, importer) = setup().await;
        fs::write(
            temp.path().join(TEAM_FILE),
            r#"
team_members:
  - id: 1
    name: Asha Rao
    position: IT and Blog Head
    year: "2025"
    email: asha@example.com
    order: 2
    image: /media/team_images/asha.jpg
  - id: "b"
    name: Dev
    position: Wizard
    active: false
"#,
        )
        .unwrap();
        fs::write(
            temp.path().join(LEADERSHIP_FILE),
            "leadership:\n  - id: 10\n    name: Prof. Shah\n    position: Director\n    bio: Leads the centre\n",
        )
        .unwrap();

        let report = importer.run().await.unwrap();
        assert_eq!(report.created, 3);
        assert!(report.failures.is_empty());

        let repo = SqlxTeamRepository::new(pool);
        let members = repo.list_members(false).await.unwrap();
        let asha = members.iter().find(|m| m.id == "1").unwrap();
        assert_eq!(asha.role, TeamRole::ItBlogHead);
        assert_eq!(asha.batch, "2025");
        assert_eq!(asha.image.as_deref(), Some("team_images/asha.jpg"));

        let dev = members.iter().find(|m| m.id == "b").unwrap();
        assert_eq!(dev.role, TeamRole::Member);
        assert!(!dev.active);

        let leaders = repo.list_leadership().await.unwrap();
        assert_eq!(leaders.len(), 1);
        assert_eq!(leaders[0].id, "10");
        assert_eq!(leaders[0].position, "Director");
    }

    #[tokio::test]
    async fn test_bad_row_does_not_stop_others() {
        let (temp, pool, importer) = setup().await;
        fs::write(
            temp.path().join(TEAM_FILE),
            "team_members:\n  - id: 1\n    name: Good\n  - id: 2\n    name: Bad\n    order: first\n  - id: 3\n    name: Also Good\n",
        )
        .unwrap();

        let report = importer.run().await.unwrap();
        assert_eq!(report.imported, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].item, "team-members.yaml row 2");

        let members = SqlxTeamRepository::new(pool).list_members(false).await.unwrap();
        assert_eq!(members.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_files_are_skipped() {
        let (_temp, _pool, importer) = setup().await;
        let report = importer.run().await.unwrap();
        assert!(report.skipped);
        assert_eq!(report.imported, 0);
    }

    #[tokio::test]
    async fn test_invalid_yaml_file_is_one_failure() {
        let (temp, _pool, importer) = setup().await;
        fs::write(temp.path().join(TEAM_FILE), "team_members: [unclosed").unwrap();

        let report = importer.run().await.unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].item, TEAM_FILE);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_one_failure() {
        let (temp, pool, importer) = setup().await;
        fs::write(temp.path().join(TEAM_FILE), [0xffu8, 0xfe]).unwrap();
        fs::write(
            temp.path().join(LEADERSHIP_FILE),
            "leadership:\n  - id: 10\n    name: Prof. Shah\n",
        )
        .unwrap();

        let report = importer.run().await.unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].item, TEAM_FILE);
        assert!(report.failures[0].error.contains("Failed to read file"));
        assert_eq!(report.created, 1);

        let leaders = SqlxTeamRepository::new(pool).list_leadership().await.unwrap();
        assert_eq!(leaders.len(), 1);
    }

    #[tokio::test]
    async fn test_reimport_preserves_image() {
        let (temp, pool, importer) = setup().await;
        let path = temp.path().join(TEAM_FILE);
        fs::write(&path, "team_members:\n  - id: 1\n    name: A\n    image: /media/team_images/old.jpg\n").unwrap();
        importer.run().await.unwrap();

        fs::write(&path, "team_members:\n  - id: 1\n    name: A\n    image: /media/team_images/new.jpg\n").unwrap();
        let report = importer.run().await.unwrap();
        assert_eq!(report.updated, 0);

        let members = SqlxTeamRepository::new(pool).list_members(false).await.unwrap();
        assert_eq!(members[0].image.as_deref(), Some("team_images/old.jpg"));
    }
}
