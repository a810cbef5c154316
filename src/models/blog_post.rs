//! Blog post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Author, Category, Tag, ANONYMOUS_AUTHOR};

/// Blog post entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    /// Unique URL slug, also the import identity
    pub slug: String,
    /// Markdown body
    pub content: String,
    pub excerpt: String,
    pub published: bool,
    pub featured: bool,
    pub author: Author,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    /// Media path relative to the media root
    pub featured_image: Option<String>,
    pub published_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    pub fn author_display_name(&self) -> String {
        self.author.display_name(ANONYMOUS_AUTHOR)
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

/// Field values supplied by an import for one post.
///
/// Category and tags are relations and are attached separately.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPostInput {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub published: bool,
    pub featured: bool,
    pub author: Author,
    /// `None` keeps the stored date, or uses the current time for new posts
    pub published_date: Option<DateTime<Utc>>,
    pub featured_image: Option<String>,
}
