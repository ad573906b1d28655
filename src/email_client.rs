use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time;

use crate::domain::subscriber_email::SubscriberEmail;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);
/// The mail API rejects requests carrying more personalizations than this.
pub const MAX_PERSONALIZATIONS: usize = 1000;
const MESSAGE_ID_HEADER: &str = "X-Message-Id";

#[derive(Debug, Clone)]
pub struct Sender {
    pub email: SubscriberEmail,
    pub name: Option<String>,
}

pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: Sender,
    api_key: Secret<String>,
}

#[derive(serde::Serialize)]
struct SendEmailBody<'a> {
    personalizations: Vec<SendgridPersonalization<'a>>,
    from: SendgridEmail<'a>,
    subject: &'a str,
    content: Vec<SendgridContent<'a>>,
}

#[derive(serde::Serialize)]
struct SendgridEmail<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(serde::Serialize)]
struct SendgridPersonalization<'a> {
    to: Vec<SendgridEmail<'a>>,
}

#[derive(serde::Serialize)]
struct SendgridContent<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: Sender,
        api_key: Secret<String>,
        timeout: Option<time::Duration>,
    ) -> Result<EmailClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(EmailClient {
            http_client,
            base_url,
            sender,
            api_key,
        })
    }

    pub async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<Option<String>, reqwest::Error> {
        self.send_batch(std::slice::from_ref(recipient), subject, html_content)
            .await
    }

    /// Sends the same email to every recipient, one personalization each so
    /// no recipient sees the others' addresses.
    ///
    /// Recipients are split into requests of at most [`MAX_PERSONALIZATIONS`].
    /// The first failing request aborts the broadcast. Returns the message id
    /// reported for the last request, if any.
    #[tracing::instrument(
        name = "Broadcast an email",
        skip(self, recipients, html_content),
        fields(recipients_count = recipients.len())
    )]
    pub async fn broadcast_email(
        &self,
        recipients: &[SubscriberEmail],
        subject: &str,
        html_content: &str,
    ) -> Result<Option<String>, reqwest::Error> {
        let mut message_id = None;

        for batch in recipients.chunks(MAX_PERSONALIZATIONS) {
            message_id = self.send_batch(batch, subject, html_content).await?;
        }

        Ok(message_id)
    }

    async fn send_batch(
        &self,
        recipients: &[SubscriberEmail],
        subject: &str,
        html_content: &str,
    ) -> Result<Option<String>, reqwest::Error> {
        let url = format!("{}/mail/send", self.base_url);
        let body = SendEmailBody {
            from: SendgridEmail {
                email: self.sender.email.as_ref(),
                name: self.sender.name.as_deref(),
            },
            personalizations: recipients
                .iter()
                .map(|recipient| SendgridPersonalization {
                    to: vec![SendgridEmail {
                        email: recipient.as_ref(),
                        name: None,
                    }],
                })
                .collect(),
            subject,
            content: vec![SendgridContent {
                content_type: "text/html",
                value: html_content,
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await?
            .error_for_status()?; // return an error when server response status code is 4xx or 5xx

        let message_id = response
            .headers()
            .get(MESSAGE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(String::from);

        Ok(message_id)
    }
}
