//! Post-processing applied to newsletter HTML before it is sent.
//!
//! Two editors feed the service. The drag-and-drop designer exports a full
//! document with its own `<style>` blocks ([`prepare_design_html`]); the
//! rich-text editor produces a fragment that still needs the newsletter
//! layout around it ([`render_rich_text`]).

pub mod enhance;
pub mod extract;
pub mod fonts;
pub mod inline;
pub mod template;

use chrono::{Datelike, Utc};
use css_inline::InlineError;

use crate::html::extract::{extract_first_image, extract_first_title};
use crate::html::fonts::{apply_font_fallbacks, inject_font_links};
use crate::html::inline::inline_css;
use crate::html::template::NewsletterTemplate;

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedNewsletter {
    pub title: String,
    pub image_url: Option<String>,
    pub html: String,
}

/// Font fallbacks, then CSS inlining, then web-font links in `<head>`.
pub fn prepare_design_html(html: &str) -> Result<String, InlineError> {
    let html = apply_font_fallbacks(html);
    let html = inline_css(&html)?;

    Ok(inject_font_links(&html))
}

pub fn render_rich_text(
    content: &str,
    subtitle: Option<&str>,
    template: &NewsletterTemplate,
) -> RenderedNewsletter {
    let title = extract_first_title(content).unwrap_or_else(|| template.default_title.clone());
    let image_url = extract_first_image(content);
    let year = Utc::now().year();
    let html = template.render(&title, subtitle, content, year);

    RenderedNewsletter {
        title,
        image_url,
        html,
    }
}
