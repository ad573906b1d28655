use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_status::SubscriberStatus;
use crate::email_client::EmailClient;
use crate::html::{render_rich_text, template::NewsletterTemplate, RenderedNewsletter};
use crate::routes::subscribers::get_subscribers;
use crate::routes::{error_chain_fmt, ErrorBody};

#[derive(Deserialize, Debug)]
pub struct PreviewNewsletter {
    #[serde(default)]
    pub content: String,
    pub subtitle: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct NewNewsletter {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
    pub subtitle: Option<String>,
}

#[derive(Serialize)]
struct PreviewResponse {
    success: bool,
    #[serde(flatten)]
    newsletter: RenderedNewsletter,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    success: bool,
    recipients_count: usize,
    message_id: Option<String>,
}

#[derive(thiserror::Error)]
pub enum PublishNewsletterError {
    #[error("{0}")]
    ValidationError(&'static str),
    #[error("Failed to send the newsletter to the active subscribers.")]
    SendEmailError(#[source] reqwest::Error),
    #[error("Failed to get subscribers from the database.")]
    GetSubscribersError(#[source] anyhow::Error),
}

impl std::fmt::Debug for PublishNewsletterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for PublishNewsletterError {
    fn status_code(&self) -> StatusCode {
        match self {
            PublishNewsletterError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PublishNewsletterError::SendEmailError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PublishNewsletterError::GetSubscribersError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}

#[tracing::instrument(name = "Previewing a newsletter", skip(body, template))]
pub async fn preview_newsletter(
    body: web::Json<PreviewNewsletter>,
    template: web::Data<NewsletterTemplate>,
) -> Result<HttpResponse, PublishNewsletterError> {
    if body.content.trim().is_empty() {
        return Err(PublishNewsletterError::ValidationError(
            "Newsletter content is required",
        ));
    }

    let newsletter = render_rich_text(&body.content, body.subtitle.as_deref(), &template);

    Ok(HttpResponse::Ok().json(PreviewResponse {
        success: true,
        newsletter,
    }))
}

#[tracing::instrument(
    name = "Publishing a newsletter to all active subscribers",
    skip(body, db_pool, email_client, template),
    fields(subject = %body.subject)
)]
pub async fn publish_newsletter(
    body: web::Json<NewNewsletter>,
    db_pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    template: web::Data<NewsletterTemplate>,
) -> Result<HttpResponse, PublishNewsletterError> {
    if body.subject.trim().is_empty() || body.content.trim().is_empty() {
        return Err(PublishNewsletterError::ValidationError(
            "Newsletter subject and content are required",
        ));
    }

    let subscriber_emails = get_active_subscriber_emails(&db_pool).await?;
    let mut message_id = None;

    if !subscriber_emails.is_empty() {
        let newsletter = render_rich_text(&body.content, body.subtitle.as_deref(), &template);

        message_id = email_client
            .broadcast_email(&subscriber_emails, body.subject.trim(), &newsletter.html)
            .await
            .map_err(PublishNewsletterError::SendEmailError)?;
    }

    Ok(HttpResponse::Ok().json(PublishResponse {
        success: true,
        recipients_count: subscriber_emails.len(),
        message_id,
    }))
}

async fn get_active_subscriber_emails(
    db_pool: &PgPool,
) -> Result<Vec<SubscriberEmail>, PublishNewsletterError> {
    let subscribers = get_subscribers(db_pool, Some(SubscriberStatus::Active), None)
        .await
        .map_err(PublishNewsletterError::GetSubscribersError)?;

    Ok(subscribers
        .into_iter()
        .map(|subscriber: Subscriber| subscriber.email)
        .collect())
}
