//! Form submission repository
//!
//! Append-only storage for the public forms.

use crate::db::DynDatabasePool;
use crate::models::{ArticleSubmission, ContactMessage, InternshipApplication, NewsletterSubscription};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Whether a newsletter subscription exists for `email`
    async fn subscription_exists(&self, email: &str) -> Result<bool>;

    async fn create_subscription(&self, subscription: &NewsletterSubscription) -> Result<()>;

    async fn create_contact_message(&self, message: &ContactMessage) -> Result<()>;

    async fn create_article_submission(&self, submission: &ArticleSubmission) -> Result<()>;

    async fn create_internship_application(&self, application: &InternshipApplication) -> Result<()>;
}

pub struct SqlxSubmissionRepository {
    pool: DynDatabasePool,
}

impl SqlxSubmissionRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SubmissionRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SubmissionRepository for SqlxSubmissionRepository {
    async fn subscription_exists(&self, email: &str) -> Result<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM newsletter_subscriptions WHERE lower(email) = lower(?)",
        )
        .bind(email)
        .fetch_one(self.pool.as_sqlite())
        .await
        .context("Failed to check newsletter subscription")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn create_subscription(&self, s: &NewsletterSubscription) -> Result<()> {
        sqlx::query(
            "INSERT INTO newsletter_subscriptions (id, email, name, active, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&s.id)
        .bind(&s.email)
        .bind(&s.name)
        .bind(s.active)
        .bind(s.created_at)
        .execute(self.pool.as_sqlite())
        .await
        .context("Failed to create newsletter subscription")?;
        Ok(())
    }

    async fn create_contact_message(&self, m: &ContactMessage) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO contact_messages (id, name, email, subject, message, attachment, replied, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&m.id)
        .bind(&m.name)
        .bind(&m.email)
        .bind(&m.subject)
        .bind(&m.message)
        .bind(&m.attachment)
        .bind(m.replied)
        .bind(m.created_at)
        .execute(self.pool.as_sqlite())
        .await
        .context("Failed to create contact message")?;
        Ok(())
    }

    async fn create_article_submission(&self, s: &ArticleSubmission) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO article_submissions (id, submission_type, title, author_name, author_email,
                                             author_bio, content, keywords, status, submitted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&s.id)
        .bind(s.submission_type.as_str())
        .bind(&s.title)
        .bind(&s.author_name)
        .bind(&s.author_email)
        .bind(&s.author_bio)
        .bind(&s.content)
        .bind(&s.keywords)
        .bind(s.status.as_str())
        .bind(s.submitted_at)
        .execute(self.pool.as_sqlite())
        .await
        .context("Failed to create article submission")?;
        Ok(())
    }

    async fn create_internship_application(&self, a: &InternshipApplication) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO internship_applications (
                id, applicant_name, applicant_email, phone, university, course, year,
                proposed_start_date, proposed_end_date, interest_letter, cv, writing_sample,
                status, applied_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&a.id)
        .bind(&a.applicant_name)
        .bind(&a.applicant_email)
        .bind(&a.phone)
        .bind(&a.university)
        .bind(&a.course)
        .bind(&a.year)
        .bind(a.proposed_start_date)
        .bind(a.proposed_end_date)
        .bind(&a.interest_letter)
        .bind(&a.cv)
        .bind(&a.writing_sample)
        .bind(a.status.as_str())
        .bind(a.applied_at)
        .execute(self.pool.as_sqlite())
        .await
        .context("Failed to create internship application")?;
        Ok(())
    }
}
