//! Data models
//!
//! Entities persisted by the content store, the inputs the importers and
//! forms produce for them, and the small enums they share.

mod announcement;
mod author;
mod blog_post;
mod carousel;
mod category;
mod event;
mod gallery;
mod newsletter;
mod submission;
mod tag;
mod team;
mod user;

pub use announcement::{Announcement, AnnouncementInput, AnnouncementType};
pub use author::{Author, AuthorColumns, ANONYMOUS_AUTHOR, ORGANIZATION_AUTHOR};
pub use blog_post::{BlogPost, BlogPostInput};
pub use carousel::{CarouselImage, CarouselImageInput, TitleColor};
pub use category::Category;
pub use event::{Event, EventInput, EventType};
pub use gallery::{Gallery, GalleryInput, Image, ImageInput};
pub use newsletter::NewsletterArchive;
pub use submission::{
    ArticleSubmission, ArticleSubmissionInput, ContactInput, ContactMessage,
    InternshipApplication, InternshipApplicationInput, NewsletterSignupInput,
    NewsletterSubscription, ReviewStatus, SubmissionType,
};
pub use tag::Tag;
pub use team::{Leadership, LeadershipInput, TeamMember, TeamMemberInput, TeamRole};
pub use user::{User, UserRef};
