use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;
use crate::domain::subscriber_status::SubscriberStatus;

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: Uuid,
    pub email: SubscriberEmail,
    pub name: SubscriberName,
    pub signed_up_at: DateTime<Utc>,
    pub status: SubscriberStatus,
}

impl TryFrom<PgRow> for Subscriber {
    type Error = anyhow::Error;

    fn try_from(row: PgRow) -> Result<Self, Self::Error> {
        Ok(Subscriber {
            id: row.try_get("id")?,
            email: SubscriberEmail::parse(row.try_get("email")?).map_err(anyhow::Error::msg)?,
            name: SubscriberName::parse(row.try_get("name")?).map_err(anyhow::Error::msg)?,
            signed_up_at: row.try_get("signed_up_at")?,
            status: SubscriberStatus::parse(row.try_get("status")?).map_err(anyhow::Error::msg)?,
        })
    }
}
