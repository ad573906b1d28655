use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::recipients::Recipients;
use crate::email_client::EmailClient;
use crate::html::{prepare_design_html, render_rich_text, template::NewsletterTemplate};
use crate::routes::{error_chain_fmt, ErrorBody};

/// Which editor produced the `html` field, and therefore which
/// post-processing it still needs.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    /// Final markup, sent untouched.
    #[default]
    Html,
    /// Drag-and-drop designer export.
    Design,
    /// Rich-text editor fragment.
    RichText,
}

#[derive(Deserialize, Debug)]
pub struct SendEmailBody {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub source: ContentSource,
    pub subtitle: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    success: bool,
    message_id: Option<String>,
    message: String,
}

#[derive(thiserror::Error)]
pub enum SendEmailError {
    #[error("Missing required fields (html, subject, recipients)")]
    MissingFields,
    #[error("Invalid recipients: {0}")]
    InvalidRecipients(String),
    #[error("Error sending email")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SendEmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SendEmailError {
    fn status_code(&self) -> StatusCode {
        match self {
            SendEmailError::MissingFields | SendEmailError::InvalidRecipients(_) => {
                StatusCode::BAD_REQUEST
            }
            SendEmailError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}

#[tracing::instrument(
    name = "Sending a newsletter email",
    skip(body, email_client, template),
    fields(
        subject = %body.subject,
        source = ?body.source,
        recipients_count = body.recipients.len()
    )
)]
pub async fn send_email(
    body: web::Json<SendEmailBody>,
    email_client: web::Data<EmailClient>,
    template: web::Data<NewsletterTemplate>,
) -> Result<HttpResponse, SendEmailError> {
    let body = body.into_inner();

    if body.html.trim().is_empty() || body.subject.trim().is_empty() || body.recipients.is_empty()
    {
        return Err(SendEmailError::MissingFields);
    }

    let recipients = Recipients::parse(body.recipients).map_err(SendEmailError::InvalidRecipients)?;
    let html = match body.source {
        ContentSource::Html => body.html,
        ContentSource::Design => {
            prepare_design_html(&body.html).context("Failed to inline the newsletter CSS.")?
        }
        ContentSource::RichText => {
            render_rich_text(&body.html, body.subtitle.as_deref(), &template).html
        }
    };

    let message_id = email_client
        .broadcast_email(recipients.as_ref(), body.subject.trim(), &html)
        .await
        .context("Failed to deliver the newsletter through the email API.")?;

    tracing::info!(
        recipients_count = recipients.len(),
        message_id = ?message_id,
        "Newsletter email sent"
    );

    Ok(HttpResponse::Ok().json(SendEmailResponse {
        success: true,
        message_id,
        message: format!(
            "Email sent successfully to {} subscriber(s)",
            recipients.len()
        ),
    }))
}
