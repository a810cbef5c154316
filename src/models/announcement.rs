//! Announcement model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementType {
    News,
    Event,
    Deadline,
    #[default]
    General,
}

impl AnnouncementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementType::News => "news",
            AnnouncementType::Event => "event",
            AnnouncementType::Deadline => "deadline",
            AnnouncementType::General => "general",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "news" => Some(AnnouncementType::News),
            "event" => Some(AnnouncementType::Event),
            "deadline" => Some(AnnouncementType::Deadline),
            "general" => Some(AnnouncementType::General),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnnouncementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Announcement entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub announcement_type: AnnouncementType,
    pub is_featured: bool,
    pub is_active: bool,
    pub published_date: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementInput {
    pub title: String,
    pub content: String,
    pub announcement_type: AnnouncementType,
    pub is_featured: bool,
    pub is_active: bool,
    /// `None` keeps the stored date, or uses the current time for new rows
    pub published_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub sort_order: i64,
}
