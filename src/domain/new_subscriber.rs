use actix_web::web;
use serde::Deserialize;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;

#[derive(Debug)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub name: SubscriberName,
}

#[derive(Deserialize, Debug)]
pub struct NewSubscriberBody {
    #[serde(default, alias = "nombre")]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NewSubscriberError {
    #[error("Name and email are required")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmail(String),
    #[error("Invalid subscriber name")]
    InvalidName(String),
}

impl TryFrom<web::Json<NewSubscriberBody>> for NewSubscriber {
    type Error = NewSubscriberError;

    fn try_from(body: web::Json<NewSubscriberBody>) -> Result<Self, Self::Error> {
        let body = body.into_inner();

        if body.name.trim().is_empty() || body.email.trim().is_empty() {
            return Err(NewSubscriberError::MissingFields);
        }

        let name = SubscriberName::parse(body.name).map_err(NewSubscriberError::InvalidName)?;
        let email = SubscriberEmail::parse(body.email).map_err(NewSubscriberError::InvalidEmail)?;

        Ok(NewSubscriber { email, name })
    }
}
