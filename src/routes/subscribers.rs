use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, PgPool};
use uuid::Uuid;

use crate::domain::new_subscriber::{NewSubscriber, NewSubscriberBody, NewSubscriberError};
use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_stats::SubscriberStats;
use crate::domain::subscriber_status::SubscriberStatus;
use crate::routes::{error_chain_fmt, ErrorBody};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
    Unsubscribed,
}

impl StatusFilter {
    fn as_status(self) -> Option<SubscriberStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(SubscriberStatus::Active),
            StatusFilter::Inactive => Some(SubscriberStatus::Inactive),
            StatusFilter::Unsubscribed => Some(SubscriberStatus::Unsubscribed),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct SubscribersQuery {
    #[serde(default)]
    pub status: StatusFilter,
    pub search: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FilterSubscribersBody {
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

fn default_active_only() -> bool {
    true
}

#[derive(Serialize)]
struct SubscribersResponse {
    success: bool,
    subscribers: Vec<Subscriber>,
}

#[derive(Serialize)]
struct AddSubscriberResponse {
    success: bool,
    message: &'static str,
    subscriber: Subscriber,
}

#[derive(Serialize)]
struct StatsResponse {
    success: bool,
    stats: SubscriberStats,
}

#[derive(thiserror::Error)]
pub enum SubscribersError {
    #[error("Error fetching subscribers")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscribersError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribersError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}

#[derive(thiserror::Error)]
pub enum AddSubscriberError {
    #[error(transparent)]
    ValidationError(#[from] NewSubscriberError),
    #[error("Email is already registered")]
    DuplicateEmail,
    #[error("Error adding subscriber")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for AddSubscriberError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for AddSubscriberError {
    fn status_code(&self) -> StatusCode {
        match self {
            AddSubscriberError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AddSubscriberError::DuplicateEmail => StatusCode::CONFLICT,
            AddSubscriberError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}

#[tracing::instrument(name = "Listing subscribers", skip(db_pool))]
pub async fn list_subscribers(
    query: web::Query<SubscribersQuery>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, SubscribersError> {
    let query = query.into_inner();
    let subscribers =
        get_subscribers(&db_pool, query.status.as_status(), query.search.as_deref()).await?;

    Ok(HttpResponse::Ok().json(SubscribersResponse {
        success: true,
        subscribers,
    }))
}

#[tracing::instrument(
    name = "Filtering subscribers",
    skip(body, db_pool),
    fields(active_only = %body.active_only)
)]
pub async fn filter_subscribers(
    body: web::Json<FilterSubscribersBody>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, SubscribersError> {
    let status = body.active_only.then_some(SubscriberStatus::Active);
    let subscribers = get_subscribers(&db_pool, status, None).await?;

    Ok(HttpResponse::Ok().json(SubscribersResponse {
        success: true,
        subscribers,
    }))
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(body, db_pool),
    fields(
        subscriber_email = %body.email,
        subscriber_name = %body.name
    )
)]
pub async fn add_subscriber(
    body: web::Json<NewSubscriberBody>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, AddSubscriberError> {
    let new_subscriber: NewSubscriber = body.try_into()?;

    if email_exists(&db_pool, &new_subscriber).await? {
        return Err(AddSubscriberError::DuplicateEmail);
    }

    let subscriber = insert_subscriber(&db_pool, &new_subscriber).await?;

    Ok(HttpResponse::Created().json(AddSubscriberResponse {
        success: true,
        message: "Subscriber added successfully",
        subscriber,
    }))
}

#[tracing::instrument(name = "Computing subscriber statistics", skip(db_pool))]
pub async fn subscriber_stats(
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, SubscribersError> {
    let subscribers = get_subscribers(&db_pool, None, None).await?;
    let stats = SubscriberStats::from_subscribers(&subscribers, Utc::now());

    Ok(HttpResponse::Ok().json(StatsResponse {
        success: true,
        stats,
    }))
}

/// Subscribers ordered by name. Rows that no longer pass validation are
/// skipped with a warning instead of failing the whole listing.
#[tracing::instrument(name = "Get subscribers from the database", skip(db_pool))]
pub async fn get_subscribers(
    db_pool: &PgPool,
    status: Option<SubscriberStatus>,
    search: Option<&str>,
) -> Result<Vec<Subscriber>, anyhow::Error> {
    let pattern = search
        .map(str::trim)
        .filter(|search| !search.is_empty())
        .map(|search| format!("%{}%", escape_like(search)));

    let rows = sqlx::query(
        r#"
        SELECT id, name, email, signed_up_at, status
        FROM subscribers
        WHERE ($1::text IS NULL OR lower(status) = $1)
          AND ($2::text IS NULL OR name ILIKE $2 OR email ILIKE $2)
        ORDER BY name
        "#,
    )
    .bind(status.map(|status| status.as_ref().to_owned()))
    .bind(pattern)
    .fetch_all(db_pool)
    .await
    .context("Failed to fetch subscribers from the database.")?;

    let subscribers = rows
        .into_iter()
        .filter_map(|row: PgRow| match Subscriber::try_from(row) {
            Ok(subscriber) => Some(subscriber),
            Err(err) => {
                tracing::warn!("Skipping invalid stored subscriber: {:?}", err);
                None
            }
        })
        .collect();

    Ok(subscribers)
}

#[tracing::instrument(
    name = "Check whether the email is already registered",
    skip(db_pool, new_subscriber)
)]
async fn email_exists(
    db_pool: &PgPool,
    new_subscriber: &NewSubscriber,
) -> Result<bool, anyhow::Error> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM subscribers WHERE lower(email) = lower($1)")
            .bind(new_subscriber.email.as_ref())
            .fetch_optional(db_pool)
            .await
            .context("Failed to look up the subscriber email.")?;

    Ok(existing.is_some())
}

#[tracing::instrument(
    name = "Insert a new subscriber into the database",
    skip(db_pool, new_subscriber)
)]
pub async fn insert_subscriber(
    db_pool: &PgPool,
    new_subscriber: &NewSubscriber,
) -> Result<Subscriber, AddSubscriberError> {
    let row = sqlx::query(
        r#"
        INSERT INTO subscribers (id, name, email, signed_up_at, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, signed_up_at, status
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_subscriber.name.as_ref())
    .bind(new_subscriber.email.as_ref())
    .bind(Utc::now())
    .bind(SubscriberStatus::Active.as_ref())
    .fetch_one(db_pool)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AddSubscriberError::DuplicateEmail
        } else {
            AddSubscriberError::UnexpectedError(
                anyhow::Error::new(err).context("Failed to insert the new subscriber."),
            )
        }
    })?;

    Subscriber::try_from(row)
        .context("Failed to read back the inserted subscriber.")
        .map_err(AddSubscriberError::UnexpectedError)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Escapes `LIKE` wildcards so the search term matches literally.
fn escape_like(search: &str) -> String {
    search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
