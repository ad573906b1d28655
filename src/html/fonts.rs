//! Web-font fallbacks for designer exports.
//!
//! The drag-and-drop designer emits declarations such as
//! `font-family: 'Montserrat', sans-serif`. Clients that cannot load the web
//! font would fall straight back to their default sans-serif, so the stack is
//! widened with common system fonts and the stylesheet is linked from `<head>`
//! for the clients that do load it.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::html::extract::compile;

#[derive(Debug)]
pub struct WebFont {
    pub family: &'static str,
    pub fallback_stack: &'static str,
    pub stylesheet_url: &'static str,
}

pub static WEB_FONTS: [WebFont; 4] = [
    WebFont {
        family: "Montserrat",
        fallback_stack: "'Montserrat', Arial, 'Helvetica Neue', Helvetica, sans-serif",
        stylesheet_url: "https://fonts.googleapis.com/css?family=Montserrat:400,700",
    },
    WebFont {
        family: "Open Sans",
        fallback_stack: "'Open Sans', Arial, 'Helvetica Neue', Helvetica, sans-serif",
        stylesheet_url: "https://fonts.googleapis.com/css?family=Open+Sans:400,700",
    },
    WebFont {
        family: "Lato",
        fallback_stack: "'Lato', 'Helvetica Neue', Arial, Helvetica, sans-serif",
        stylesheet_url: "https://fonts.googleapis.com/css?family=Lato:400,700",
    },
    WebFont {
        family: "Raleway",
        fallback_stack: "'Raleway', 'Helvetica Neue', Arial, Helvetica, sans-serif",
        stylesheet_url: "https://fonts.googleapis.com/css?family=Raleway:400,700",
    },
];

static DECLARATIONS: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    WEB_FONTS
        .iter()
        .map(|font| {
            let pattern = format!(
                r#"(?i)font-family:\s*['"]{}['"],\s*sans-serif"#,
                regex::escape(font.family)
            );
            let replacement = format!("font-family: {}", font.fallback_stack);

            (compile(&pattern), replacement)
        })
        .collect()
});

static REFERENCES: Lazy<Vec<Regex>> = Lazy::new(|| {
    WEB_FONTS
        .iter()
        .map(|font| compile(&format!(r#"(?i)['"]{}['"]"#, regex::escape(font.family))))
        .collect()
});

static HEAD_END: Lazy<Regex> = Lazy::new(|| compile(r"(?i)</head>"));

pub fn apply_font_fallbacks(html: &str) -> String {
    DECLARATIONS
        .iter()
        .fold(html.to_string(), |html, (regex, replacement)| {
            regex
                .replace_all(&html, NoExpand(replacement.as_str()))
                .into_owned()
        })
}

/// Known web fonts quoted anywhere in the document.
pub fn referenced_web_fonts(html: &str) -> Vec<&'static WebFont> {
    WEB_FONTS
        .iter()
        .zip(REFERENCES.iter())
        .filter(|(_, regex)| regex.is_match(html))
        .map(|(font, _)| font)
        .collect()
}

/// Links the stylesheets of every referenced web font right before `</head>`.
///
/// An `@import` copy is added for clients that drop `<link>` but keep
/// `<style>`. Documents without a `</head>` are returned unchanged.
pub fn inject_font_links(html: &str) -> String {
    let fonts = referenced_web_fonts(html);

    if fonts.is_empty() || !HEAD_END.is_match(html) {
        return html.to_string();
    }

    let links: String = fonts
        .iter()
        .map(|font| format!(r#"<link href="{}" rel="stylesheet">"#, font.stylesheet_url))
        .collect();
    let imports: String = fonts
        .iter()
        .map(|font| format!("@import url('{}');", font.stylesheet_url))
        .collect();
    let block = format!("{}<style>{}</style></head>", links, imports);

    HEAD_END.replacen(html, 1, NoExpand(&block)).into_owned()
}
