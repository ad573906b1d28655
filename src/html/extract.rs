//! Heuristics that pull a title and a header image out of editor HTML.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest paragraph text returned as a title before it gets shortened.
const MAX_PARAGRAPH_TITLE_CHARS: usize = 50;
const TRUNCATED_PARAGRAPH_CHARS: usize = 47;

static HEADINGS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        compile(r"(?is)<h1(?:\s[^>]*)?>(.*?)</h1>"),
        compile(r"(?is)<h2(?:\s[^>]*)?>(.*?)</h2>"),
        compile(r"(?is)<h3(?:\s[^>]*)?>(.*?)</h3>"),
    ]
});
static PARAGRAPH: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<p(?:\s[^>]*)?>(.*?)</p>"));
static TAG: Lazy<Regex> = Lazy::new(|| compile(r"<[^>]*>"));
static IMAGE_SOURCES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        compile(r#"(?i)<img[^>]*src="([^"]*)"[^>]*>"#),
        compile(r#"(?i)<img[^>]*src='([^']*)'[^>]*>"#),
        compile(r#"(?i)<img[^>]*src=([^ >'"]*)[^>]*>"#),
    ]
});

pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid pattern {}: {}", pattern, err))
}

/// First `h1`, then `h2`, then `h3`, then the first paragraph (shortened).
pub fn extract_first_title(html: &str) -> Option<String> {
    let heading = HEADINGS
        .iter()
        .find_map(|regex| first_capture_text(regex, html));

    if heading.is_some() {
        return heading;
    }

    let text = first_capture_text(&PARAGRAPH, html)?;

    if text.chars().count() > MAX_PARAGRAPH_TITLE_CHARS {
        let shortened: String = text.chars().take(TRUNCATED_PARAGRAPH_CHARS).collect();
        return Some(format!("{}...", shortened));
    }

    Some(text)
}

pub fn extract_first_image(html: &str) -> Option<String> {
    IMAGE_SOURCES.iter().find_map(|regex| {
        regex
            .captures(html)
            .and_then(|captures| captures.get(1))
            .map(|src| src.as_str().trim())
            .filter(|src| !src.is_empty())
            .map(String::from)
    })
}

fn first_capture_text(regex: &Regex, html: &str) -> Option<String> {
    let inner = regex.captures(html)?.get(1)?.as_str();
    let text = TAG.replace_all(inner, "");
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    Some(text.to_string())
}
