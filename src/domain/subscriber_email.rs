use validator::validate_email;

/// A syntactically valid address. The original spelling is kept for
/// delivery; comparisons go through [`SubscriberEmail::normalized`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<SubscriberEmail, String> {
        let email = email.trim();

        if !validate_email(email) {
            return Err(format!("{} is not a valid email address", email));
        }

        Ok(Self(email.to_string()))
    }

    /// Lowercased form, used to detect the same mailbox spelled differently.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
