// src/types/rich_text.rs
use super::Color;
use serde::{Deserialize, Serialize};

/// Hyperlink target attached to a text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

/// The kind of rich text content.
///
/// Each variant carries its specific data. Mentions render through
/// `plain_text`, which Notion fills with the display form of the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RichTextType {
    Text { content: String, link: Option<Link> },
    Mention,
    Equation { expression: String },
}

/// Inline style flags of one span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

/// Rich text span with formatting annotations.
///
/// Spans are ordered; a node's inline text is the concatenation of its
/// spans in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    pub text_type: RichTextType,
    pub annotations: Annotations,
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichTextItem {
    /// Create a plain text item, the most common rich text variant.
    pub fn plain_text(text: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                content: text.to_string(),
                link: None,
            },
            annotations: Annotations::default(),
            plain_text: text.to_string(),
            href: None,
        }
    }

    /// Same text with the given annotations.
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Same text linking to `url`.
    pub fn with_href(mut self, url: &str) -> Self {
        self.href = Some(url.to_string());
        self
    }

    /// The raw text this span displays, before any markup.
    pub fn display_text(&self) -> &str {
        match &self.text_type {
            RichTextType::Text { content, .. } => content,
            RichTextType::Equation { expression } => expression,
            RichTextType::Mention => &self.plain_text,
        }
    }

    /// The span's link target: `href`, falling back to the text link.
    pub fn link_target(&self) -> Option<&str> {
        self.href.as_deref().or(match &self.text_type {
            RichTextType::Text {
                link: Some(link), ..
            } => Some(link.url.as_str()),
            _ => None,
        })
    }
}

/// Concatenated plain text of a span sequence.
pub fn plain_text_of(items: &[RichTextItem]) -> String {
    items.iter().map(|item| item.display_text()).collect()
}
