//! Tag model

use serde::{Deserialize, Serialize};

/// Tag attached to blog posts through `blog_post_tags`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
}
