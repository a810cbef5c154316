//! Public form submissions
//!
//! Each form has a request payload (what the browser posts) and a stored
//! record. Payload fields default to empty so that validation can report
//! every missing field at once instead of failing on the first.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of article offered for publication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionType {
    BlogArticle,
    JournalArticle,
}

impl SubmissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionType::BlogArticle => "blog_article",
            SubmissionType::JournalArticle => "journal_article",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "blog_article" => Some(SubmissionType::BlogArticle),
            "journal_article" => Some(SubmissionType::JournalArticle),
            _ => None,
        }
    }
}

/// Editorial review state of a submission or application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    UnderReview,
    Accepted,
    Rejected,
    Published,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::UnderReview => "under_review",
            ReviewStatus::Accepted => "accepted",
            ReviewStatus::Rejected => "rejected",
            ReviewStatus::Published => "published",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReviewStatus::Pending),
            "under_review" => Some(ReviewStatus::UnderReview),
            "accepted" => Some(ReviewStatus::Accepted),
            "rejected" => Some(ReviewStatus::Rejected),
            "published" => Some(ReviewStatus::Published),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewsletterSignupInput {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub attachment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArticleSubmissionInput {
    pub submission_type: String,
    pub title: String,
    pub author_name: String,
    pub author_email: String,
    pub author_bio: String,
    pub content: String,
    pub keywords: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InternshipApplicationInput {
    pub applicant_name: String,
    pub applicant_email: String,
    pub phone: String,
    pub university: String,
    pub course: String,
    pub year: String,
    pub proposed_start_date: String,
    pub proposed_end_date: String,
    pub interest_letter: String,
    /// Reference to an uploaded CV
    pub cv: String,
    /// Reference to an uploaded writing sample
    pub writing_sample: String,
}

// ---------------------------------------------------------------------------
// Stored records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewsletterSubscription {
    pub id: String,
    pub email: String,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub attachment: Option<String>,
    pub replied: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArticleSubmission {
    pub id: String,
    pub submission_type: SubmissionType,
    pub title: String,
    pub author_name: String,
    pub author_email: String,
    pub author_bio: String,
    pub content: String,
    pub keywords: String,
    pub status: ReviewStatus,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InternshipApplication {
    pub id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub phone: String,
    pub university: String,
    pub course: String,
    pub year: String,
    pub proposed_start_date: NaiveDate,
    pub proposed_end_date: NaiveDate,
    pub interest_letter: String,
    pub cv: String,
    pub writing_sample: String,
    pub status: ReviewStatus,
    pub applied_at: DateTime<Utc>,
}
