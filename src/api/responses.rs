//! Shared API response types
//!
//! The same payloads are served by the HTTP handlers and written by the
//! static exporter, so the frontend sees one shape per content type.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{
    Announcement, AnnouncementType, Author, BlogPost, Category, CarouselImage, Event, EventType,
    Gallery, Image, Leadership, NewsletterArchive, Tag, TeamMember, TeamRole, TitleColor,
};

// ============================================================================
// Envelopes
// ============================================================================

/// Collection envelope used by every list endpoint and exported file
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub results: Vec<T>,
    pub count: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(results: Vec<T>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Public URL of a stored media path
pub fn media_url(prefix: &str, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", prefix, p))
}

// ============================================================================
// Taxonomy
// ============================================================================

#[derive(Debug, Serialize, Clone)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryInfo {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            created_at: category.created_at,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct TagInfo {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl From<Tag> for TagInfo {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            slug: tag.slug,
        }
    }
}

// ============================================================================
// Blog Posts
// ============================================================================

/// Blog post payload. List views leave the detail-only fields out.
#[derive(Debug, Serialize)]
pub struct BlogPostResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub published: bool,
    pub featured: bool,
    pub author_display_name: String,
    pub category_name: Option<String>,
    pub tags: Vec<TagInfo>,
    pub featured_image: Option<String>,
    pub featured_image_url: Option<String>,
    pub published_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BlogPostResponse {
    pub fn summary(post: BlogPost, media_prefix: &str) -> Self {
        Self {
            id: post.id.clone(),
            author_display_name: post.author_display_name(),
            category_name: post.category_name().map(str::to_string),
            featured_image_url: media_url(media_prefix, post.featured_image.as_deref()),
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            published: post.published,
            featured: post.featured,
            tags: post.tags.into_iter().map(TagInfo::from).collect(),
            featured_image: post.featured_image,
            published_date: post.published_date,
            created_at: post.created_at,
            content: None,
            author_bio: None,
            author_email: None,
            category: None,
            updated_at: None,
        }
    }

    /// Full post including body, guest author details and category
    pub fn detail(post: BlogPost, media_prefix: &str) -> Self {
        let content = post.content.clone();
        let category = post.category.clone().map(CategoryInfo::from);
        let updated_at = post.updated_at;
        let (author_bio, author_email) = match &post.author {
            Author::External { bio, email, .. } => (Some(bio.clone()), Some(email.clone())),
            Author::Internal(_) => (None, None),
        };

        Self {
            content: Some(content),
            author_bio,
            author_email,
            category,
            updated_at: Some(updated_at),
            ..Self::summary(post, media_prefix)
        }
    }
}

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: String,
    pub event_type: EventType,
    pub published: bool,
    pub featured: bool,
    pub author_display_name: String,
    pub featured_image: Option<String>,
    pub featured_image_url: Option<String>,
    pub registration_link: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EventResponse {
    pub fn summary(event: Event, media_prefix: &str) -> Self {
        Self {
            author_display_name: event.author_display_name(),
            featured_image_url: media_url(media_prefix, event.featured_image.as_deref()),
            id: event.id,
            title: event.title,
            slug: event.slug,
            description: event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            location: event.location,
            event_type: event.event_type,
            published: event.published,
            featured: event.featured,
            featured_image: event.featured_image,
            registration_link: event.registration_link,
            created_at: event.created_at,
            content: None,
            updated_at: None,
        }
    }

    pub fn detail(event: Event, media_prefix: &str) -> Self {
        let content = event.content.clone();
        let updated_at = event.updated_at;
        Self {
            content: Some(content),
            updated_at: Some(updated_at),
            ..Self::summary(event, media_prefix)
        }
    }
}

// ============================================================================
// Galleries
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ImageInfo {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub alt_text: String,
    pub caption: String,
}

impl ImageInfo {
    fn new(image: Image, media_prefix: &str) -> Self {
        Self {
            image: media_url(media_prefix, Some(&image.image)),
            id: image.id,
            title: image.title,
            alt_text: image.alt_text,
            caption: image.caption,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub author_name: String,
    pub cover_image: Option<String>,
    pub image_count: usize,
    pub images: Vec<ImageInfo>,
    pub created_at: DateTime<Utc>,
}

impl GalleryResponse {
    pub fn new(gallery: Gallery, media_prefix: &str) -> Self {
        Self {
            id: gallery.id,
            title: gallery.title,
            slug: gallery.slug,
            description: gallery.description,
            author_name: gallery.author.display_name,
            cover_image: media_url(media_prefix, gallery.cover_image.as_deref()),
            image_count: gallery.images.len(),
            images: gallery
                .images
                .into_iter()
                .map(|image| ImageInfo::new(image, media_prefix))
                .collect(),
            created_at: gallery.created_at,
        }
    }
}

// ============================================================================
// Team
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TeamMemberResponse {
    pub id: String,
    pub name: String,
    pub role: TeamRole,
    pub role_display: &'static str,
    pub batch: String,
    pub email: String,
    pub linkedin_url: String,
    pub bio: String,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub active: bool,
    pub order: i64,
}

impl TeamMemberResponse {
    pub fn new(member: TeamMember, media_prefix: &str) -> Self {
        Self {
            role_display: member.role.label(),
            image_url: media_url(media_prefix, member.image.as_deref()),
            id: member.id,
            name: member.name,
            role: member.role,
            batch: member.batch,
            email: member.email,
            linkedin_url: member.linkedin_url,
            bio: member.bio,
            image: member.image,
            active: member.active,
            order: member.sort_order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeadershipResponse {
    pub id: String,
    pub name: String,
    pub position: String,
    pub bio: String,
    pub email: String,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub order: i64,
}

impl LeadershipResponse {
    pub fn new(leader: Leadership, media_prefix: &str) -> Self {
        Self {
            image_url: media_url(media_prefix, leader.image.as_deref()),
            id: leader.id,
            name: leader.name,
            position: leader.position,
            bio: leader.bio,
            email: leader.email,
            image: leader.image,
            order: leader.sort_order,
        }
    }
}

// ============================================================================
// Site configuration
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AnnouncementResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub announcement_type: AnnouncementType,
    pub is_featured: bool,
    pub published_date: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Announcement> for AnnouncementResponse {
    fn from(announcement: Announcement) -> Self {
        Self {
            id: announcement.id,
            title: announcement.title,
            content: announcement.content,
            announcement_type: announcement.announcement_type,
            is_featured: announcement.is_featured,
            published_date: announcement.published_date,
            expiry_date: announcement.expiry_date,
            created_at: announcement.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CarouselImageResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub link_url: String,
    pub title_color: TitleColor,
    pub title_color_display: &'static str,
    pub show_title: bool,
    pub is_active: bool,
    pub order: i64,
}

impl CarouselImageResponse {
    pub fn new(slide: CarouselImage, media_prefix: &str) -> Self {
        Self {
            image_url: media_url(media_prefix, slide.image.as_deref()),
            title_color_display: slide.title_color.label(),
            id: slide.id,
            title: slide.title,
            description: slide.description,
            image: slide.image,
            link_url: slide.link_url,
            title_color: slide.title_color,
            show_title: slide.show_title,
            is_active: slide.is_active,
            order: slide.sort_order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewsletterArchiveResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub issue_number: String,
    pub published_date: NaiveDate,
    pub pdf_file: Option<String>,
    pub is_featured: bool,
    pub order: i64,
}

impl NewsletterArchiveResponse {
    pub fn new(archive: NewsletterArchive, media_prefix: &str) -> Self {
        Self {
            pdf_file: media_url(media_prefix, archive.pdf_file.as_deref()),
            id: archive.id,
            title: archive.title,
            description: archive.description,
            issue_number: archive.issue_number,
            published_date: archive.published_date,
            is_featured: archive.is_featured,
            order: archive.sort_order,
        }
    }
}

// ============================================================================
// Search
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FeaturedResponse {
    pub featured_blogs: Vec<BlogPostResponse>,
    pub featured_events: Vec<EventResponse>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub blogs: Vec<BlogPostResponse>,
    pub events: Vec<EventResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UserRef, ANONYMOUS_AUTHOR};

    fn post(author: Author) -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: "p1".to_string(),
            title: "Post".to_string(),
            slug: "post".to_string(),
            content: "Body".to_string(),
            excerpt: "Body".to_string(),
            published: true,
            featured: false,
            author,
            category: None,
            tags: vec![Tag {
                id: "t1".to_string(),
                name: "ODR".to_string(),
                slug: "odr".to_string(),
            }],
            featured_image: Some("blog_images/a.jpg".to_string()),
            published_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_media_url() {
        assert_eq!(
            media_url("/media/", Some("team_images/a.jpg")).as_deref(),
            Some("/media/team_images/a.jpg")
        );
        assert_eq!(media_url("/media/", Some("")), None);
        assert_eq!(media_url("/media/", None), None);
    }

    #[test]
    fn test_list_response_counts() {
        let list = ListResponse::from(vec![1, 2, 3]);
        assert_eq!(list.count, 3);
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["count"], 3);
        assert_eq!(json["results"][2], 3);
    }

    #[test]
    fn test_blog_summary_omits_detail_fields() {
        let json =
            serde_json::to_value(BlogPostResponse::summary(post(Author::external("")), "/media/"))
                .unwrap();
        assert_eq!(json["author_display_name"], ANONYMOUS_AUTHOR);
        assert_eq!(json["featured_image_url"], "/media/blog_images/a.jpg");
        assert_eq!(json["tags"][0]["slug"], "odr");
        assert!(json.get("content").is_none());
        assert!(json.get("updated_at").is_none());
    }

    #[test]
    fn test_blog_detail_includes_guest_fields() {
        let author = Author::External {
            name: "Guest".to_string(),
            bio: "Writer".to_string(),
            email: "g@example.com".to_string(),
        };
        let json = serde_json::to_value(BlogPostResponse::detail(post(author), "/media/")).unwrap();
        assert_eq!(json["content"], "Body");
        assert_eq!(json["author_bio"], "Writer");
        assert_eq!(json["author_email"], "g@example.com");

        let internal = Author::Internal(UserRef {
            id: "u1".to_string(),
            display_name: "admin".to_string(),
        });
        let json = serde_json::to_value(BlogPostResponse::detail(post(internal), "/media/")).unwrap();
        assert_eq!(json["author_display_name"], "admin");
        assert!(json.get("author_bio").is_none());
    }

    #[test]
    fn test_team_member_display_fields() {
        let now = Utc::now();
        let member = TeamMember {
            id: "1".to_string(),
            name: "Asha".to_string(),
            role: TeamRole::CoConvenor,
            batch: "2025".to_string(),
            email: String::new(),
            linkedin_url: String::new(),
            bio: String::new(),
            image: None,
            active: true,
            sort_order: 3,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(TeamMemberResponse::new(member, "/media/")).unwrap();
        assert_eq!(json["role"], "co_convenor");
        assert_eq!(json["role_display"], "Co-convenor");
        assert_eq!(json["order"], 3);
        assert!(json["image_url"].is_null());
    }
}
