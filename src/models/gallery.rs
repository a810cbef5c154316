//! Gallery and image models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserRef;

/// Photo gallery. Always authored by an internal user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Gallery {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub published: bool,
    pub author: UserRef,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Images belonging to the gallery, newest first
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Single image, optionally part of a gallery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub id: String,
    pub title: String,
    pub image: String,
    pub alt_text: String,
    pub caption: String,
    pub gallery_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Values for a new gallery
#[derive(Debug, Clone)]
pub struct GalleryInput {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub published: bool,
    pub author: UserRef,
    pub cover_image: Option<String>,
}

/// Values for a new image
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub title: String,
    pub image: String,
    pub alt_text: String,
    pub caption: String,
}
