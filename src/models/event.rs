//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Author, ORGANIZATION_AUTHOR};

/// Kind of event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Conference,
    Workshop,
    Seminar,
    Competition,
    Course,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Conference => "conference",
            EventType::Workshop => "workshop",
            EventType::Seminar => "seminar",
            EventType::Competition => "competition",
            EventType::Course => "course",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "conference" => Some(EventType::Conference),
            "workshop" => Some(EventType::Workshop),
            "seminar" => Some(EventType::Seminar),
            "competition" => Some(EventType::Competition),
            "course" => Some(EventType::Course),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Event entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: String,
    pub event_type: EventType,
    pub published: bool,
    pub featured: bool,
    pub author: Author,
    pub featured_image: Option<String>,
    pub registration_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Events without an author are credited to the centre itself.
    pub fn author_display_name(&self) -> String {
        self.author.display_name(ORGANIZATION_AUTHOR)
    }
}

/// Values for a new event
#[derive(Debug, Clone)]
pub struct EventInput {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: String,
    pub event_type: EventType,
    pub published: bool,
    pub featured: bool,
    pub author: Author,
    pub featured_image: Option<String>,
    pub registration_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_round_trip() {
        for t in [
            EventType::Conference,
            EventType::Workshop,
            EventType::Seminar,
            EventType::Competition,
            EventType::Course,
        ] {
            assert_eq!(EventType::from_str(t.as_str()), Some(t));
        }
        assert_eq!(EventType::from_str("Workshop"), Some(EventType::Workshop));
        assert_eq!(EventType::from_str("party"), None);
    }
}
