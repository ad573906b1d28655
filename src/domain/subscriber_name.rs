use unicode_segmentation::UnicodeSegmentation;

/// Longest display name accepted, counted in graphemes.
const MAX_GRAPHEMES: usize = 256;
const FORBIDDEN_CHARS: [char; 9] = ['/', '{', '}', '"', '>', '<', '\\', '(', ')'];

/// Display name shown in the dashboard list. Rendered into HTML, so markup
/// characters are refused.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SubscriberName(String);

impl SubscriberName {
    pub fn parse(name: String) -> Result<SubscriberName, String> {
        let name = name.trim();

        if name.is_empty() {
            return Err(String::from("Subscriber name is empty"));
        }

        if name.graphemes(true).count() > MAX_GRAPHEMES {
            return Err(format!(
                "Subscriber name is longer than {} characters",
                MAX_GRAPHEMES
            ));
        }

        if let Some(forbidden) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
            return Err(format!(
                "{} is not a valid subscriber name: '{}' is not allowed",
                name, forbidden
            ));
        }

        Ok(Self(name.to_string()))
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
