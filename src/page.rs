//! Redirect page rendering.
//!
//! The page is fixed markup with one substitution, so it is rendered with a
//! `format!` template rather than a template engine. The target is escaped
//! once and reused at every insertion point: the `<title>`, the
//! `meta http-equiv="refresh"` tag, and a fallback link for clients that
//! ignore refresh.
//!
//! The refresh tag delimits the URL with single quotes
//! (`content="0;URL='…'"`), so `'` must be escaped along with the usual
//! HTML-significant characters.

/// Escape `& < > ' "` for use in HTML text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&#39;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the redirect page for an unescaped target reference.
pub fn render_redirect_page(reference: &str) -> String {
    let target = escape_html(reference);
    format!(
        "<!DOCTYPE html>
<html>
\t<head>
\t\t<title>This page has moved to {target}</title>
\t\t<meta charset=\"utf-8\" />
\t\t<meta http-equiv=\"refresh\" content=\"0;URL='{target}'\" />
\t</head>
\t<body>
\t\t<p>This page has moved to <a href=\"{target}\">{target}</a>.</p>
\t</body>
</html>
"
    )
}
