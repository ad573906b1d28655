use crate::html::enhance::{enhance_content, Theme};

const WEB_FONT_STYLESHEETS: [&str; 3] = [
    "https://fonts.googleapis.com/css2?family=Poppins:wght@400;500;600;700&display=swap",
    "https://fonts.googleapis.com/css2?family=Lora:wght@400;500;700&display=swap",
    "https://fonts.googleapis.com/css2?family=Quicksand:wght@400;500;600&display=swap",
];

const CLIENT_RESET_CSS: &str = "body { margin: 0 !important; padding: 0 !important; } \
div { margin-top: 0 !important; padding-top: 0 !important; } \
table { margin: 0 auto !important; padding: 0 !important; } \
td { padding: 0 !important; } \
ul { list-style-type: disc !important; } \
ol { list-style-type: decimal !important; } \
li { display: list-item !important; }";

/// Wraps rich-text content in the newsletter email layout.
#[derive(Debug, Clone)]
pub struct NewsletterTemplate {
    pub brand_name: String,
    pub unsubscribe_url: String,
    pub default_title: String,
    pub theme: Theme,
}

impl NewsletterTemplate {
    pub fn new(brand_name: String, unsubscribe_url: String, default_title: String) -> Self {
        Self {
            brand_name,
            unsubscribe_url,
            default_title,
            theme: Theme::default(),
        }
    }

    pub fn render(&self, title: &str, subtitle: Option<&str>, content: &str, year: i32) -> String {
        let theme = &self.theme;
        let fonts = &theme.fonts;
        let font_links: String = WEB_FONT_STYLESHEETS
            .iter()
            .map(|url| format!(r#"<link rel="stylesheet" href="{}" />"#, url))
            .collect();
        let subtitle = subtitle
            .map(str::trim)
            .filter(|subtitle| !subtitle.is_empty())
            .map(|subtitle| {
                format!(
                    r#"<p style="color:{};font-size:15px;margin:0;padding:20px 25px 0;text-align:center;font-family:{};letter-spacing:0.5px;">{}</p>"#,
                    theme.text_secondary,
                    fonts.accent,
                    htmlescape::encode_minimal(subtitle)
                )
            })
            .unwrap_or_default();
        let footer_text_style = format!(
            "color:{};font-size:13px;line-height:22px;text-align:center;margin:8px 0;font-family:{};",
            theme.text_secondary, fonts.accent
        );

        format!(
            r#"<!DOCTYPE html><html lang="en"><head><meta charset="UTF-8" /><meta name="viewport" content="width=device-width, initial-scale=1.0" />{font_links}<style>{reset}</style><title>{title}</title></head><body style="margin:0;padding:0;background-color:#f4f5f7;font-family:{body_font};"><div style="display:none;max-height:0;overflow:hidden;">{title}</div><table role="presentation" width="100%" cellpadding="0" cellspacing="0" border="0" style="max-width:650px;width:100%;margin:0 auto;"><tr><td><div style="margin:0;padding:0;border-radius:12px;overflow:hidden;box-shadow:0 4px 10px rgba(0, 0, 0, 0.05);background-color:{card};">{subtitle}<div style="margin:0;padding:0;">{content}</div></div><div style="background-color:{background};padding:20px;border-top:1px solid {border};border-bottom-left-radius:12px;border-bottom-right-radius:12px;"><p style="{footer_text_style}">&copy; {year} {brand}. All rights reserved.</p><p style="{footer_text_style}">If you no longer wish to receive these emails, you can <a href="{unsubscribe}" style="color:{primary};text-decoration:underline;">unsubscribe here</a>.</p></div></td></tr></table></body></html>"#,
            reset = CLIENT_RESET_CSS,
            title = htmlescape::encode_minimal(title),
            body_font = fonts.body,
            card = theme.card_background,
            content = enhance_content(content, theme),
            background = theme.background,
            border = theme.border,
            brand = htmlescape::encode_minimal(&self.brand_name),
            unsubscribe = htmlescape::encode_minimal(&self.unsubscribe_url),
            primary = theme.primary,
        )
    }
}
