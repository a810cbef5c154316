//! Public form endpoints
//!
//! - POST /api/newsletter/signup
//! - POST /api/contact/submit
//! - POST /api/submissions/submit
//! - POST /api/internship/apply
//!
//! Each returns 201 with a confirmation message, or 400 with field errors.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::MessageResponse;
use crate::models::{
    ArticleSubmissionInput, ContactInput, InternshipApplicationInput, NewsletterSignupInput,
};

type Created = (StatusCode, Json<MessageResponse>);

fn created(message: &str) -> Created {
    (StatusCode::CREATED, Json(MessageResponse::new(message)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/newsletter/signup", post(newsletter_signup))
        .route("/contact/submit", post(contact_submit))
        .route("/submissions/submit", post(submission_submit))
        .route("/internship/apply", post(internship_apply))
}

async fn newsletter_signup(
    State(state): State<AppState>,
    Json(input): Json<NewsletterSignupInput>,
) -> Result<Created, ApiError> {
    state.forms.subscribe(input).await?;
    Ok(created("Successfully subscribed to newsletter"))
}

async fn contact_submit(
    State(state): State<AppState>,
    Json(input): Json<ContactInput>,
) -> Result<Created, ApiError> {
    state.forms.contact(input).await?;
    Ok(created("Contact form submitted successfully"))
}

async fn submission_submit(
    State(state): State<AppState>,
    Json(input): Json<ArticleSubmissionInput>,
) -> Result<Created, ApiError> {
    state.forms.submit_article(input).await?;
    Ok(created("Submission submitted successfully"))
}

async fn internship_apply(
    State(state): State<AppState>,
    Json(input): Json<InternshipApplicationInput>,
) -> Result<Created, ApiError> {
    state.forms.apply_internship(input).await?;
    Ok(created("Internship application submitted successfully"))
}
