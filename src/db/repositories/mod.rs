//! Database repositories
//!
//! One repository per content family. The traits cover what the HTTP layer
//! and exporter read; importers write through the free functions that take
//! a `&mut SqliteConnection` so a record and its relations share one
//! transaction.

pub mod announcement;
pub mod blog_post;
pub mod carousel;
pub mod category;
pub mod event;
pub mod gallery;
pub mod newsletter;
pub mod submission;
pub mod tag;
pub mod team;
pub mod user;

pub use announcement::{AnnouncementFilter, AnnouncementRepository, SqlxAnnouncementRepository};
pub use blog_post::{BlogPostFilter, BlogPostRepository, SqlxBlogPostRepository};
pub use carousel::{CarouselRepository, SqlxCarouselRepository};
pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use event::{EventFilter, EventRepository, SqlxEventRepository};
pub use gallery::{GalleryRepository, SqlxGalleryRepository};
pub use newsletter::{NewsletterArchiveRepository, SqlxNewsletterArchiveRepository};
pub use submission::{SqlxSubmissionRepository, SubmissionRepository};
pub use tag::{SqlxTagRepository, TagRepository};
pub use team::{SqlxTeamRepository, TeamRepository};
pub use user::{SqlxUserRepository, UserRepository};
