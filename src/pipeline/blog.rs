//! Markdown blog importer
//!
//! Every `*.md` file directly inside the blog directory becomes one post,
//! keyed by slug. Files are processed in filename order.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use serde::Deserialize;
use serde_yaml::Value;

use super::frontmatter::{self, lenient_string, scalar_to_string, OneOrMany};
use super::reconcile::upsert_in;
use super::text::{excerpt, is_valid_slug, parse_timestamp, slugify};
use super::{is_dir, ImportReport, PipelineError};
use crate::db::repositories::{blog_post, category, tag};
use crate::db::DynDatabasePool;
use crate::models::{Author, BlogPost, BlogPostInput, UserRef};

/// Author name that maps to the default internal author
const ADMIN_AUTHOR: &str = "admin";

#[derive(Debug, Clone)]
pub struct BlogImportOptions {
    pub dir: PathBuf,
    /// Credited for posts with no author or `author: admin`
    pub default_author: UserRef,
}

/// Recognised front-matter keys of a post
#[derive(Debug, Default, Deserialize)]
struct BlogFrontMatter {
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    slug: Option<String>,
    published: Option<bool>,
    featured: Option<bool>,
    #[serde(default, deserialize_with = "lenient_string")]
    excerpt: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    author: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    author_bio: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    author_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    category: Option<String>,
    tags: Option<OneOrMany<Value>>,
    #[serde(default, deserialize_with = "lenient_string")]
    featured_image: Option<String>,
}

pub struct BlogImporter {
    pool: DynDatabasePool,
    options: BlogImportOptions,
}

impl BlogImporter {
    pub fn new(pool: DynDatabasePool, options: BlogImportOptions) -> Self {
        Self { pool, options }
    }

    pub async fn run(&self) -> Result<ImportReport, PipelineError> {
        let dir = &self.options.dir;
        if !is_dir(dir).await {
            tracing::info!("Blog directory {} not found, skipping", dir.display());
            return Ok(ImportReport::skipped());
        }

        tracing::info!("Importing blogs from {}", dir.display());
        let mut report = ImportReport::default();

        for path in markdown_files(dir).await? {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match self.import_file(&path).await {
                Ok((post, created, changed)) => {
                    report.record(created, changed);
                    let action = if created {
                        "Created"
                    } else if changed {
                        "Updated"
                    } else {
                        "Unchanged"
                    };
                    tracing::info!("{} blog post '{}' from {}", action, post.slug, name);
                }
                Err(err) => report.fail(name, err),
            }
        }

        tracing::info!(
            "Imported {} blog post(s), {} failed",
            report.imported,
            report.failures.len()
        );
        Ok(report)
    }

    /// Import one file. Returns the post and whether it was created or changed.
    async fn import_file(&self, path: &Path) -> anyhow::Result<(BlogPost, bool, bool)> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let doc = frontmatter::parse(&text);
        let meta: BlogFrontMatter = doc.extract().context("Invalid front matter")?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = non_empty(meta.title).unwrap_or(stem);
        let slug = match non_empty(meta.slug) {
            Some(slug) => {
                let slug = slug.trim().to_string();
                if !is_valid_slug(&slug) {
                    bail!(
                        "Invalid slug '{}': use only letters, digits, '-' and '_'",
                        slug
                    );
                }
                slug
            }
            None => slugify(&title),
        };
        if slug.is_empty() {
            bail!("Cannot derive a slug from title '{}'", title);
        }

        let published_date = match non_empty(meta.date) {
            Some(raw) => Some(parse_timestamp(&raw).ok_or_else(|| anyhow!("Unparsable date '{}'", raw))?),
            None => None,
        };

        let author = match non_empty(meta.author) {
            Some(name) if name != ADMIN_AUTHOR => Author::External {
                name,
                bio: meta.author_bio.unwrap_or_default(),
                email: meta.author_email.unwrap_or_default(),
            },
            _ => Author::Internal(self.options.default_author.clone()),
        };

        let input = BlogPostInput {
            title,
            slug: slug.clone(),
            excerpt: meta.excerpt.unwrap_or_else(|| excerpt(&doc.body)),
            content: doc.body.clone(),
            published: meta.published.unwrap_or(true),
            featured: meta.featured.unwrap_or(false),
            author,
            published_date,
            featured_image: non_empty(meta.featured_image),
        };

        let mut tx = self.pool.as_sqlite().begin().await?;
        let upserted = upsert_in::<BlogPost>(&mut tx, Some(&slug), input).await?;
        let mut post = upserted.record;
        let mut changed = upserted.changed;

        if let Some(name) = non_empty(meta.category) {
            let category = category::get_or_create_category(&mut tx, &name, &slugify(&name)).await?;
            if post.category.as_ref().map(|c| c.id.as_str()) != Some(category.id.as_str()) {
                blog_post::set_post_category(&mut tx, &post.id, Some(category.id.as_str())).await?;
                post.category = Some(category);
                changed = true;
            }
        }

        if doc.has_key("tags") {
            let names: Vec<String> = meta
                .tags
                .map(OneOrMany::into_vec)
                .unwrap_or_default()
                .iter()
                .filter_map(scalar_to_string)
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();

            let mut tags = Vec::with_capacity(names.len());
            for name in &names {
                tags.push(tag::get_or_create_tag(&mut tx, name, &slugify(name)).await?);
            }
            tags.sort_by(|a, b| a.name.cmp(&b.name));
            tags.dedup_by(|a, b| a.id == b.id);

            let before: Vec<&str> = post.tags.iter().map(|t| t.id.as_str()).collect();
            let after: Vec<&str> = tags.iter().map(|t| t.id.as_str()).collect();
            if before != after {
                tag::replace_post_tags(&mut tx, &post.id, &tags).await?;
                post.tags = tags;
                changed = true;
            }
        }

        tx.commit().await?;
        Ok((post, upserted.created, changed))
    }
}

/// `*.md` files directly inside `dir`, sorted by name
async fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let read_error = |source| PipelineError::ReadSource {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_error)?;
    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        let path = entry.path();
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if is_file && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{BlogPostFilter, BlogPostRepository, SqlxBlogPostRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use chrono::{Datelike, Timelike};
    use std::fs;

    struct Fixture {
        _temp: tempfile::TempDir,
        dir: PathBuf,
        pool: DynDatabasePool,
        importer: BlogImporter,
    }

    async fn fixture() -> Fixture {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("blogs");
        fs::create_dir_all(&dir).unwrap();

        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let admin = SqlxUserRepository::new(pool.clone())
            .get_or_create("admin", "admin@example.com")
            .await
            .unwrap();

        let importer = BlogImporter::new(
            pool.clone(),
            BlogImportOptions {
                dir: dir.clone(),
                default_author: admin.to_ref(),
            },
        );
        Fixture {
            _temp: temp,
            dir,
            pool,
            importer,
        }
    }

    async fn post(pool: &DynDatabasePool, slug: &str) -> BlogPost {
        SqlxBlogPostRepository::new(pool.clone())
            .get_by_slug(slug)
            .await
            .unwrap()
            .expect("post exists")
    }

    #[tokio::test]
    async fn test_full_front_matter() {
        let f = fixture().await;
        fs::write(
            f.dir.join("adr.md"),
            "---\ntitle: Future of ADR\ndate: 2024-05-01T09:30:00Z\nauthor: Jane Doe\nauthor_bio: Scholar\nauthor_email: jane@example.com\ncategory: Insights\ntags:\n  - ODR\n  - Mediation\nfeatured: true\nfeatured_image: blog_images/adr.jpg\n---\n\n# Heading\n\nBody text.",
        )
        .unwrap();

        let report = f.importer.run().await.unwrap();
        assert_eq!(report.created, 1);
        assert!(report.failures.is_empty());

        let p = post(&f.pool, "future-of-adr").await;
        assert_eq!(p.title, "Future of ADR");
        assert!(p.published && p.featured);
        assert_eq!(p.content, "# Heading\n\nBody text.");
        assert_eq!(p.excerpt, "Heading Body text.");
        assert_eq!(
            p.author,
            Author::External {
                name: "Jane Doe".into(),
                bio: "Scholar".into(),
                email: "jane@example.com".into()
            }
        );
        assert_eq!(p.category_name(), Some("Insights"));
        let tag_names: Vec<_> = p.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tag_names, vec!["Mediation", "ODR"]);
        assert_eq!(p.featured_image.as_deref(), Some("blog_images/adr.jpg"));
        assert_eq!((p.published_date.month(), p.published_date.hour()), (5, 9));
    }

    #[tokio::test]
    async fn test_defaults_without_front_matter() {
        let f = fixture().await;
        fs::write(f.dir.join("Plain Notes.md"), "Just some *markdown*.").unwrap();
        fs::write(f.dir.join("ignored.txt"), "not a post").unwrap();

        let report = f.importer.run().await.unwrap();
        assert_eq!(report.imported, 1);

        let p = post(&f.pool, "plain-notes").await;
        assert_eq!(p.title, "Plain Notes");
        assert!(p.published);
        assert!(!p.featured);
        assert_eq!(p.author_display_name(), "admin");
        assert!(p.category.is_none());
        assert!(p.tags.is_empty());
    }

    #[tokio::test]
    async fn test_admin_author_maps_to_default_user() {
        let f = fixture().await;
        fs::write(f.dir.join("a.md"), "---\ntitle: A\nauthor: admin\n---\nx").unwrap();
        f.importer.run().await.unwrap();

        let p = post(&f.pool, "a").await;
        assert!(matches!(p.author, Author::Internal(_)));
    }

    #[tokio::test]
    async fn test_reimport_is_idempotent_and_updates() {
        let f = fixture().await;
        let path = f.dir.join("post.md");
        fs::write(&path, "---\ntitle: Post\ntags: [one, two]\n---\nFirst").unwrap();

        f.importer.run().await.unwrap();
        let first = post(&f.pool, "post").await;

        let again = f.importer.run().await.unwrap();
        assert_eq!((again.created, again.updated, again.imported), (0, 0, 1));
        let unchanged = post(&f.pool, "post").await;
        assert_eq!(unchanged, first);

        fs::write(&path, "---\ntitle: Post\ntags: three\n---\nSecond").unwrap();
        let changed = f.importer.run().await.unwrap();
        assert_eq!(changed.updated, 1);

        let p = post(&f.pool, "post").await;
        assert_eq!(p.id, first.id);
        assert_eq!(p.content, "Second");
        assert_eq!(p.tags.len(), 1);
        assert_eq!(p.tags[0].slug, "three");
    }

    #[tokio::test]
    async fn test_absent_tags_and_category_left_alone() {
        let f = fixture().await;
        let path = f.dir.join("keep.md");
        fs::write(&path, "---\ntitle: Keep\ncategory: News\ntags: [a]\n---\nx").unwrap();
        f.importer.run().await.unwrap();

        fs::write(&path, "---\ntitle: Keep\n---\ny").unwrap();
        f.importer.run().await.unwrap();
        let p = post(&f.pool, "keep").await;
        assert_eq!(p.category_name(), Some("News"));
        assert_eq!(p.tags.len(), 1);

        fs::write(&path, "---\ntitle: Keep\ntags: []\n---\ny").unwrap();
        f.importer.run().await.unwrap();
        assert!(post(&f.pool, "keep").await.tags.is_empty());
    }

    #[tokio::test]
    async fn test_bad_date_is_row_failure() {
        let f = fixture().await;
        fs::write(f.dir.join("a-bad.md"), "---\ntitle: Bad\ndate: not-a-date\n---\nx").unwrap();
        fs::write(f.dir.join("b-good.md"), "---\ntitle: Good\ndate: 2024-01-02\n---\nx").unwrap();

        let report = f.importer.run().await.unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].item, "a-bad.md");
        assert!(report.failures[0].error.contains("not-a-date"));

        let all = SqlxBlogPostRepository::new(f.pool.clone())
            .list(&BlogPostFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_directory_is_skipped() {
        let f = fixture().await;
        fs::remove_dir_all(&f.dir).unwrap();
        let report = f.importer.run().await.unwrap();
        assert!(report.skipped);
        assert_eq!(report.imported, 0);
    }

    #[tokio::test]
    async fn test_unsafe_explicit_slug_is_row_failure() {
        let f = fixture().await;
        fs::write(f.dir.join("a.md"), "---\ntitle: Escape\nslug: ../../escaped\n---\nx").unwrap();
        fs::write(f.dir.join("b.md"), "---\ntitle: Fine\nslug: fine_slug-2\n---\ny").unwrap();

        let report = f.importer.run().await.unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].item, "a.md");
        assert!(report.failures[0].error.contains("Invalid slug"));
        post(&f.pool, "fine_slug-2").await;
    }

    #[tokio::test]
    async fn test_unreadable_file_does_not_stop_scan() {
        let f = fixture().await;
        fs::write(f.dir.join("a-good.md"), "---\ntitle: First\n---\nx").unwrap();
        fs::write(f.dir.join("b-binary.md"), [0xffu8, 0xfe, 0x00, 0x41]).unwrap();
        fs::write(f.dir.join("c-good.md"), "---\ntitle: Second\n---\ny").unwrap();

        let report = f.importer.run().await.unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].item, "b-binary.md");
        post(&f.pool, "first").await;
        post(&f.pool, "second").await;
    }

    #[tokio::test]
    async fn test_accented_title_slug() {
        let f = fixture().await;
        fs::write(f.dir.join("cafe.md"), "---\ntitle: Café Déjà vu\n---\nx").unwrap();

        f.importer.run().await.unwrap();
        assert_eq!(post(&f.pool, "cafe-deja-vu").await.title, "Café Déjà vu");
    }
}
