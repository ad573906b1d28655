//! Inline style injection for rich-text newsletter content.
//!
//! Email clients ignore most `<style>` blocks, so every block-level element
//! produced by the editor gets its typography written onto the tag itself.
//! Author styles already present on a tag are appended after the injected
//! declarations and therefore take precedence.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::html::extract::compile;

#[derive(Debug, Clone)]
pub struct FontStacks {
    pub heading: String,
    pub body: String,
    pub accent: String,
}

impl Default for FontStacks {
    fn default() -> Self {
        Self {
            heading: String::from("'Lora', Georgia, serif"),
            body: String::from("'Poppins', 'Helvetica Neue', Helvetica, Arial, sans-serif"),
            accent: String::from("'Quicksand', 'Helvetica Neue', Helvetica, Arial, sans-serif"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: String,
    pub background: String,
    pub card_background: String,
    pub text: String,
    pub text_secondary: String,
    pub border: String,
    pub accent: String,
    pub fonts: FontStacks,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: String::from("#4F46E5"),
            background: String::from("#F9FAFB"),
            card_background: String::from("#FFFFFF"),
            text: String::from("#1F2937"),
            text_secondary: String::from("#6B7280"),
            border: String::from("#E5E7EB"),
            accent: String::from("#F59E0B"),
            fonts: FontStacks::default(),
        }
    }
}

/// Declarations injected per element, derived once from a [`Theme`].
struct ContentStyles {
    h1: String,
    h2: String,
    h3: String,
    lead_paragraph: String,
    paragraph: String,
    unordered_list: String,
    ordered_list: String,
    list_item: String,
    header_image: String,
    image: String,
    link: String,
    blockquote: String,
    rule: String,
}

impl ContentStyles {
    fn new(theme: &Theme) -> Self {
        let fonts = &theme.fonts;

        Self {
            h1: format!(
                "color:{};font-size:28px;font-weight:700;margin-top:15px;margin-bottom:18px;font-family:{};line-height:1.3;letter-spacing:-0.02em;padding-left:25px;padding-right:25px;",
                theme.primary, fonts.heading
            ),
            h2: format!(
                "color:{};font-size:22px;font-weight:700;margin-top:20px;margin-bottom:16px;font-family:{};line-height:1.3;letter-spacing:-0.01em;padding-left:25px;padding-right:25px;",
                theme.text, fonts.heading
            ),
            h3: format!(
                "color:{};font-size:18px;font-weight:700;margin-top:18px;margin-bottom:14px;font-family:{};line-height:1.3;padding-left:25px;padding-right:25px;",
                theme.text, fonts.heading
            ),
            lead_paragraph: format!(
                "color:{};font-size:17px;line-height:1.7;margin-top:0;margin-bottom:20px;margin-left:0;margin-right:0;font-family:{};font-weight:500;padding-left:25px;padding-right:25px;",
                theme.text, fonts.body
            ),
            paragraph: format!(
                "color:{};font-size:16px;line-height:1.7;margin-top:12px;margin-bottom:16px;margin-left:0;margin-right:0;font-family:{};padding-left:25px;padding-right:25px;",
                theme.text, fonts.body
            ),
            unordered_list: String::from(
                "padding-left:45px;margin-bottom:20px;list-style-type:disc !important;display:block;padding-right:25px;",
            ),
            ordered_list: String::from(
                "padding-left:45px;margin-bottom:20px;list-style-type:decimal !important;display:block;padding-right:25px;",
            ),
            list_item: format!(
                "color:{};font-size:16px;line-height:1.6;margin-bottom:10px;display:list-item !important;font-family:{};",
                theme.text, fonts.body
            ),
            header_image: String::from(
                "max-width:100%;height:auto;display:block;margin:0;padding:0;border-radius:0;",
            ),
            image: String::from(
                "max-width:100%;height:auto;display:block;margin:20px auto;padding:0;border-radius:8px;box-shadow:0 2px 8px rgba(0,0,0,0.1);",
            ),
            link: format!(
                "color:{primary};text-decoration:none;font-weight:500;border-bottom:1px dotted {primary};padding-bottom:1px;",
                primary = theme.primary
            ),
            blockquote: format!(
                "padding:15px 25px 15px 20px;margin:20px 25px;font-style:italic;border-left:3px solid {};color:{};background-color:rgba(0,0,0,0.02);border-radius:4px;",
                theme.accent, theme.text_secondary
            ),
            rule: format!(
                "height:1px;border:none;background:linear-gradient(to right, {border}, {}, {border});margin:25px 25px;",
                theme.accent,
                border = theme.border
            ),
        }
    }
}

static H1: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<h1(\s[^>]*)?>(.*?)</h1>"));
static H2: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<h2(\s[^>]*)?>(.*?)</h2>"));
static H3: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<h3(\s[^>]*)?>(.*?)</h3>"));
static PARAGRAPH: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<p(\s[^>]*)?>(.*?)</p>"));
static UNORDERED_LIST: Lazy<Regex> = Lazy::new(|| compile(r"(?i)<ul(\s[^>]*)?>"));
static ORDERED_LIST: Lazy<Regex> = Lazy::new(|| compile(r"(?i)<ol(\s[^>]*)?>"));
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<li(\s[^>]*)?>(.*?)</li>"));
static IMAGE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)<img(\s[^>]*)?>"));
static IMAGE_SOURCE: Lazy<Regex> = Lazy::new(|| compile(r#"(?i)\ssrc\s*=\s*["']?[^"'\s>]"#));
static LINK: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<a(\s[^>]*)?>(.*?)</a>"));
static BLOCKQUOTE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?is)<blockquote(\s[^>]*)?>(.*?)</blockquote>"));
static RULE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)<hr(\s[^>]*)?/?>"));
static STYLE_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| compile(r#"(?is)\s+style\s*=\s*(?:"([^"]*)"|'([^']*)')"#));

pub fn enhance_content(html: &str, theme: &Theme) -> String {
    let styles = ContentStyles::new(theme);

    let html = style_element(&H1, html, "h1", &styles.h1);
    let html = style_element(&H2, &html, "h2", &styles.h2);
    let html = style_element(&H3, &html, "h3", &styles.h3);

    let mut paragraph_index = 0;
    let html = PARAGRAPH.replace_all(&html, |captures: &Captures| {
        let css = if paragraph_index == 0 {
            &styles.lead_paragraph
        } else {
            &styles.paragraph
        };
        paragraph_index += 1;

        wrap("p", css, captures)
    });

    let html = style_opening_tag(&UNORDERED_LIST, &html, "ul", &styles.unordered_list);
    let html = style_opening_tag(&ORDERED_LIST, &html, "ol", &styles.ordered_list);
    let html = style_element(&LIST_ITEM, &html, "li", &styles.list_item);

    let mut image_index = 0;
    let html = IMAGE.replace_all(&html, |captures: &Captures| {
        let attributes = captures.get(1).map_or("", |m| m.as_str());

        if !IMAGE_SOURCE.is_match(attributes) {
            return captures[0].to_string();
        }

        let css = if image_index == 0 {
            &styles.header_image
        } else {
            &styles.image
        };
        image_index += 1;

        format!("<img{} />", merge_style(css, attributes))
    });

    let html = style_element(&LINK, &html, "a", &styles.link);
    let html = style_element(&BLOCKQUOTE, &html, "blockquote", &styles.blockquote);

    RULE.replace_all(&html, |captures: &Captures| {
        let attributes = captures.get(1).map_or("", |m| m.as_str());

        format!("<hr{} />", merge_style(&styles.rule, attributes))
    })
    .into_owned()
}

fn style_element(regex: &Regex, html: &str, tag: &str, css: &str) -> String {
    regex
        .replace_all(html, |captures: &Captures| wrap(tag, css, captures))
        .into_owned()
}

fn style_opening_tag(regex: &Regex, html: &str, tag: &str, css: &str) -> String {
    regex
        .replace_all(html, |captures: &Captures| {
            let attributes = captures.get(1).map_or("", |m| m.as_str());

            format!("<{}{}>", tag, merge_style(css, attributes))
        })
        .into_owned()
}

fn wrap(tag: &str, css: &str, captures: &Captures) -> String {
    let attributes = captures.get(1).map_or("", |m| m.as_str());
    let inner = captures.get(2).map_or("", |m| m.as_str());

    format!("<{tag}{}>{inner}</{tag}>", merge_style(css, attributes))
}

/// Drops the `/` of a self-closing tag. A slash glued to an unquoted value
/// (`src=https://cdn.test/pics/`) belongs to the value and is kept.
fn strip_self_closing(attributes: &str) -> &str {
    match attributes.strip_suffix('/') {
        Some(rest)
            if rest.is_empty()
                || rest.ends_with(|c: char| c.is_whitespace() || c == '"' || c == '\'') =>
        {
            rest.trim_end()
        }
        _ => attributes,
    }
}

/// Builds ` style="<css><existing>"` followed by the tag's other attributes.
fn merge_style(css: &str, attributes: &str) -> String {
    let existing = STYLE_ATTRIBUTE
        .captures(attributes)
        .and_then(|captures| captures.get(1).or_else(|| captures.get(2)))
        .map_or("", |m| m.as_str().trim());
    let others = STYLE_ATTRIBUTE.replace_all(attributes, "");
    let others = strip_self_closing(others.trim_end());

    let mut style = css.to_string();
    if !existing.is_empty() {
        if !style.ends_with(';') {
            style.push(';');
        }
        style.push_str(&existing.replace('"', "'"));
    }

    format!(r#" style="{}"{}"#, style, others)
}
