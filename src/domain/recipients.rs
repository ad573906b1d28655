use std::collections::HashSet;

use crate::domain::subscriber_email::SubscriberEmail;

/// A non-empty list of delivery addresses without duplicates.
#[derive(Debug, Clone)]
pub struct Recipients(Vec<SubscriberEmail>);

impl Recipients {
    /// Duplicates are compared case-insensitively and the first spelling wins.
    pub fn parse(addresses: Vec<String>) -> Result<Recipients, String> {
        let mut seen = HashSet::new();
        let mut recipients = Vec::with_capacity(addresses.len());

        for address in addresses {
            let email = SubscriberEmail::parse(address)?;

            if seen.insert(email.normalized()) {
                recipients.push(email);
            }
        }

        if recipients.is_empty() {
            return Err(String::from("At least one recipient is required"));
        }

        Ok(Self(recipients))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[SubscriberEmail]> for Recipients {
    fn as_ref(&self) -> &[SubscriberEmail] {
        &self.0
    }
}
