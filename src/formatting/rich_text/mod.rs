// src/formatting/rich_text/mod.rs
//! Formats ordered rich text spans into inline markup.

mod annotations;

pub use annotations::html_escape;

use crate::types::{RichTextItem, RichTextType};
use annotations::{HtmlStyleRenderer, MarkdownStyleRenderer};

/// The markup language inline text is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupTarget {
    Markdown,
    Html,
}

/// Formats spans for `target`, concatenated in input order.
pub fn format_rich_text(items: &[RichTextItem], target: MarkupTarget) -> String {
    items
        .iter()
        .map(|item| format_single_item(item, target))
        .collect()
}

/// Formats an array of RichTextItems into Markdown.
pub fn rich_text_to_markdown(items: &[RichTextItem]) -> String {
    format_rich_text(items, MarkupTarget::Markdown)
}

/// Formats an array of RichTextItems into escaped, styled HTML.
pub fn rich_text_to_html(items: &[RichTextItem]) -> String {
    format_rich_text(items, MarkupTarget::Html)
}

fn format_single_item(item: &RichTextItem, target: MarkupTarget) -> String {
    let text = item.display_text();
    if text.is_empty() {
        return String::new();
    }

    // Inline equations keep their TeX source; the `$` delimiters only
    // mean something to Markdown consumers.
    let content = match (&item.text_type, target) {
        (RichTextType::Equation { .. }, MarkupTarget::Markdown) => format!("${}$", text),
        _ => text.to_string(),
    };

    let link = item.link_target();
    match target {
        MarkupTarget::Markdown => {
            MarkdownStyleRenderer::apply_styles(&content, &item.annotations, link)
        }
        MarkupTarget::Html => HtmlStyleRenderer::apply_styles(&content, &item.annotations, link),
    }
}
