//! Homepage carousel model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Color of the title overlay on a carousel slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleColor {
    #[default]
    White,
    Black,
    Primary,
    Golden,
    Red,
    Green,
}

impl TitleColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleColor::White => "white",
            TitleColor::Black => "black",
            TitleColor::Primary => "primary",
            TitleColor::Golden => "golden",
            TitleColor::Red => "red",
            TitleColor::Green => "green",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "white" => Some(TitleColor::White),
            "black" => Some(TitleColor::Black),
            "primary" => Some(TitleColor::Primary),
            "golden" => Some(TitleColor::Golden),
            "red" => Some(TitleColor::Red),
            "green" => Some(TitleColor::Green),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TitleColor::White => "White",
            TitleColor::Black => "Black",
            TitleColor::Primary => "Primary Blue",
            TitleColor::Golden => "Golden",
            TitleColor::Red => "Red",
            TitleColor::Green => "Green",
        }
    }
}

impl std::fmt::Display for TitleColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Carousel slide entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarouselImage {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub link_url: String,
    pub title_color: TitleColor,
    pub show_title: bool,
    pub is_active: bool,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselImageInput {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub link_url: String,
    pub title_color: TitleColor,
    pub show_title: bool,
    pub is_active: bool,
    pub sort_order: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_color_parsing() {
        assert_eq!(TitleColor::from_str("Golden"), Some(TitleColor::Golden));
        assert_eq!(TitleColor::from_str("purple"), None);
        assert_eq!(TitleColor::default(), TitleColor::White);
        assert_eq!(TitleColor::Primary.label(), "Primary Blue");
    }
}
