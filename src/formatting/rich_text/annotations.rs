// src/formatting/rich_text/annotations.rs
//! Application of inline annotations to a single span.
//!
//! Wrapping happens innermost first. For Markdown the nesting, outermost
//! to innermost, is strikethrough, underline, italic, bold, code; for HTML
//! the color span sits outside the style tags. A link always wraps
//! everything.

use crate::types::Annotations;

/// Renderer for text styles to Markdown.
pub struct MarkdownStyleRenderer;

impl MarkdownStyleRenderer {
    /// Applies styles to raw text. Markdown special characters pass through.
    pub fn apply_styles(content: &str, annotations: &Annotations, link: Option<&str>) -> String {
        let mut result = content.to_string();

        if annotations.code {
            result = format!("`{}`", result);
        }

        if annotations.bold {
            result = format!("**{}**", result);
        }

        if annotations.italic {
            result = format!("*{}*", result);
        }

        // No native underline in Markdown; `_` is the conventional stand-in
        if annotations.underline {
            result = format!("_{}_", result);
        }

        if annotations.strikethrough {
            result = format!("~~{}~~", result);
        }

        if let Some(url) = link {
            result = format!("[{}]({})", result, url);
        }

        result
    }
}

/// Renderer for text styles to HTML.
pub struct HtmlStyleRenderer;

impl HtmlStyleRenderer {
    /// Escapes the text, then applies styles using HTML tags.
    pub fn apply_styles(content: &str, annotations: &Annotations, link: Option<&str>) -> String {
        let mut result = html_escape(content);

        if annotations.code {
            result = format!("<code>{}</code>", result);
        }

        if annotations.bold {
            result = format!("<strong>{}</strong>", result);
        }

        if annotations.italic {
            result = format!("<em>{}</em>", result);
        }

        if annotations.underline {
            result = format!("<u>{}</u>", result);
        }

        if annotations.strikethrough {
            result = format!("<s>{}</s>", result);
        }

        if !annotations.color.is_default() {
            result = format!(
                "<span class=\"{}\">{}</span>",
                annotations.color.css_class(),
                result
            );
        }

        if let Some(url) = link {
            result = format!(
                "<a href=\"{}\" target=\"_blank\">{}</a>",
                html_escape(url),
                result
            );
        }

        result
    }
}

/// Basic HTML escaping for text and attribute values.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
