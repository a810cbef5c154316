//! Newsletter archive model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Published newsletter issue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsletterArchive {
    pub id: String,
    pub title: String,
    pub description: String,
    /// e.g. "Issue 1, 2024"
    pub issue_number: String,
    pub pdf_file: Option<String>,
    pub published_date: NaiveDate,
    pub is_featured: bool,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}
