//! Category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blog post category. Name and slug are both unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
