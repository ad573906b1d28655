use css_inline::{CSSInliner, InlineError};

/// Copies `<style>` rules onto the matching elements.
///
/// `<style>` tags stay in the document so media queries and `@font-face`
/// rules keep working in clients that honour them. Remote stylesheets are
/// never fetched.
pub fn inline_css(html: &str) -> Result<String, InlineError> {
    CSSInliner::options()
        .remove_style_tags(false)
        .load_remote_stylesheets(false)
        .build()
        .inline(html)
}
