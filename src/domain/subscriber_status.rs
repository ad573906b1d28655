#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    Active,
    Inactive,
    Unsubscribed,
}

impl SubscriberStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, SubscriberStatus::Active)
    }

    pub fn is_inactive(&self) -> bool {
        matches!(self, SubscriberStatus::Inactive)
    }

    pub fn is_unsubscribed(&self) -> bool {
        matches!(self, SubscriberStatus::Unsubscribed)
    }

    /// Older rows were stored capitalised (`Active`), so matching ignores case.
    pub fn parse(status: String) -> Result<SubscriberStatus, String> {
        match status.trim().to_lowercase().as_str() {
            "active" => Ok(SubscriberStatus::Active),
            "inactive" => Ok(SubscriberStatus::Inactive),
            "unsubscribed" => Ok(SubscriberStatus::Unsubscribed),
            _ => Err(format!("{} is not a valid subscriber status", status)),
        }
    }
}

impl AsRef<str> for SubscriberStatus {
    fn as_ref(&self) -> &str {
        match self {
            SubscriberStatus::Active => "active",
            SubscriberStatus::Inactive => "inactive",
            SubscriberStatus::Unsubscribed => "unsubscribed",
        }
    }
}
