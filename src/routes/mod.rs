mod health_check;
mod newsletters;
mod send_email;
mod subscribers;

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};

pub use health_check::health_check;
pub use newsletters::{preview_newsletter, publish_newsletter};
pub use send_email::send_email;
pub use subscribers::{
    add_subscriber, filter_subscribers, insert_subscriber, list_subscribers, subscriber_stats,
    AddSubscriberError,
};

/// Body returned by every failing endpoint.
#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected request body: {}", err);
    let response = HttpResponse::BadRequest().json(ErrorBody::new("Invalid request body"));

    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected query string: {}", err);
    let response = HttpResponse::BadRequest().json(ErrorBody::new("Invalid query parameters"));

    InternalError::from_response(err, response).into()
}
