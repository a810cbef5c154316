//! Public form service
//!
//! Validates and stores newsletter signups, contact messages, article
//! submissions and internship applications. Validation collects every field
//! error before returning so the form can highlight all of them at once.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::db::repositories::SubmissionRepository;
use crate::models::{
    ArticleSubmission, ArticleSubmissionInput, ContactInput, ContactMessage,
    InternshipApplication, InternshipApplicationInput, NewsletterSignupInput,
    NewsletterSubscription, ReviewStatus, SubmissionType,
};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
});

const REQUIRED: &str = "This field is required.";
const INVALID_EMAIL: &str = "Enter a valid email address.";
const INVALID_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";

/// Field name to error messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Invalid form data")]
    Validation(FieldErrors),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Accumulates field errors for one form
#[derive(Debug, Default)]
struct Validator {
    errors: FieldErrors,
}

impl Validator {
    fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Trimmed value, or an error when blank or over `max` characters
    fn required(&mut self, field: &str, value: &str, max: usize) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.add(field, REQUIRED);
        } else {
            self.max_length(field, value, max);
        }
        value.to_string()
    }

    fn optional(&mut self, field: &str, value: &str, max: usize) -> String {
        let value = value.trim();
        self.max_length(field, value, max);
        value.to_string()
    }

    fn max_length(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(
                field,
                format!("Ensure this field has no more than {} characters.", max),
            );
        }
    }

    fn email(&mut self, field: &str, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.add(field, REQUIRED);
        } else if !EMAIL_RE.is_match(value) {
            self.add(field, INVALID_EMAIL);
        }
        value.to_string()
    }

    fn date(&mut self, field: &str, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            self.add(field, REQUIRED);
            return None;
        }
        match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.add(field, INVALID_DATE);
                None
            }
        }
    }

    fn finish(self) -> Result<(), FormError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(FormError::Validation(self.errors))
        }
    }
}

/// Validates and persists public form posts
pub struct FormService {
    repo: Arc<dyn SubmissionRepository>,
}

impl FormService {
    pub fn new(repo: Arc<dyn SubmissionRepository>) -> Self {
        Self { repo }
    }

    pub async fn subscribe(
        &self,
        input: NewsletterSignupInput,
    ) -> Result<NewsletterSubscription, FormError> {
        let mut v = Validator::default();
        let email = v.email("email", &input.email);
        let name = v.optional("name", &input.name, 100);

        if !email.is_empty()
            && self
                .repo
                .subscription_exists(&email)
                .await
                .context("Failed to check existing subscription")?
        {
            v.add("email", "newsletter with this email already exists.");
        }
        v.finish()?;

        let subscription = NewsletterSubscription {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            active: true,
            created_at: Utc::now(),
        };
        self.repo.create_subscription(&subscription).await?;
        tracing::info!("New newsletter subscription: {}", subscription.email);
        Ok(subscription)
    }

    pub async fn contact(&self, input: ContactInput) -> Result<ContactMessage, FormError> {
        let mut v = Validator::default();
        let name = v.required("name", &input.name, 100);
        let email = v.email("email", &input.email);
        let subject = v.optional("subject", &input.subject, 200);
        let message = v.required("message", &input.message, usize::MAX);
        v.finish()?;

        let contact = ContactMessage {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            subject,
            message,
            attachment: input
                .attachment
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
            replied: false,
            created_at: Utc::now(),
        };
        self.repo.create_contact_message(&contact).await?;
        tracing::info!("Contact message received from {}", contact.email);
        Ok(contact)
    }

    pub async fn submit_article(
        &self,
        input: ArticleSubmissionInput,
    ) -> Result<ArticleSubmission, FormError> {
        let mut v = Validator::default();
        let submission_type = match input.submission_type.trim() {
            "" => {
                v.add("submission_type", REQUIRED);
                None
            }
            other => {
                let parsed = SubmissionType::from_str(other);
                if parsed.is_none() {
                    v.add(
                        "submission_type",
                        format!("\"{}\" is not a valid choice.", other),
                    );
                }
                parsed
            }
        };
        let title = v.required("title", &input.title, 200);
        let author_name = v.required("author_name", &input.author_name, 100);
        let author_email = v.email("author_email", &input.author_email);
        let author_bio = input.author_bio.trim().to_string();
        let content = v.required("content", &input.content, usize::MAX);
        let keywords = v.optional("keywords", &input.keywords, 500);
        v.finish()?;

        let submission_type =
            submission_type.context("Submission type missing after validation")?;

        let submission = ArticleSubmission {
            id: Uuid::new_v4().to_string(),
            submission_type,
            title,
            author_name,
            author_email,
            author_bio,
            content,
            keywords,
            status: ReviewStatus::Pending,
            submitted_at: Utc::now(),
        };
        self.repo.create_article_submission(&submission).await?;
        tracing::info!("Article submission received: {}", submission.title);
        Ok(submission)
    }

    pub async fn apply_internship(
        &self,
        input: InternshipApplicationInput,
    ) -> Result<InternshipApplication, FormError> {
        let mut v = Validator::default();
        let applicant_name = v.required("applicant_name", &input.applicant_name, 100);
        let applicant_email = v.email("applicant_email", &input.applicant_email);
        let phone = v.optional("phone", &input.phone, 20);
        let university = v.required("university", &input.university, 200);
        let course = v.required("course", &input.course, 100);
        let year = v.required("year", &input.year, 20);
        let start = v.date("proposed_start_date", &input.proposed_start_date);
        let end = v.date("proposed_end_date", &input.proposed_end_date);
        let interest_letter = v.required("interest_letter", &input.interest_letter, usize::MAX);
        let cv = v.required("cv", &input.cv, usize::MAX);
        let writing_sample = v.required("writing_sample", &input.writing_sample, usize::MAX);

        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                v.add(
                    "proposed_end_date",
                    "End date cannot be before the start date.",
                );
            }
        }
        v.finish()?;

        let proposed_start_date = start.context("Start date missing after validation")?;
        let proposed_end_date = end.context("End date missing after validation")?;

        let application = InternshipApplication {
            id: Uuid::new_v4().to_string(),
            applicant_name,
            applicant_email,
            phone,
            university,
            course,
            year,
            proposed_start_date,
            proposed_end_date,
            interest_letter,
            cv,
            writing_sample,
            status: ReviewStatus::Pending,
            applied_at: Utc::now(),
        };
        self.repo.create_internship_application(&application).await?;
        tracing::info!(
            "Internship application received from {}",
            application.applicant_email
        );
        Ok(application)
    }
}
