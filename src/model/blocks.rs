// src/model/blocks.rs
//! Type-specific payloads carried by content nodes.

use crate::types::{plain_text_of, Color, RichTextItem};

/// Text content shared by every text-bearing node type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBlockContent {
    pub rich_text: Vec<RichTextItem>,
    pub color: Color,
}

impl TextBlockContent {
    pub fn new(rich_text: Vec<RichTextItem>) -> Self {
        Self {
            rich_text,
            color: Color::Default,
        }
    }
}

/// Callout payload
#[derive(Debug, Clone, PartialEq)]
pub struct CalloutContent {
    pub icon: Option<Icon>,
    pub content: TextBlockContent,
}

/// Icon types
#[derive(Debug, Clone, PartialEq)]
pub enum Icon {
    Emoji { emoji: String },
    External { external: ExternalFile },
    File { file: NotionFile },
}

impl Icon {
    pub fn emoji(&self) -> Option<&str> {
        match self {
            Icon::Emoji { emoji } => Some(emoji),
            _ => None,
        }
    }
}

/// Code payload
#[derive(Debug, Clone, PartialEq)]
pub struct CodeContent {
    /// Notion language tag, e.g. `rust` or `plain text`
    pub language: String,
    pub caption: Vec<RichTextItem>,
    pub rich_text: Vec<RichTextItem>,
}

impl CodeContent {
    /// Raw source text. Code is never styled, so annotations are dropped.
    pub fn source(&self) -> String {
        plain_text_of(&self.rich_text)
    }

    pub fn caption_text(&self) -> String {
        plain_text_of(&self.caption)
    }

    /// Language usable as a fence info string or CSS class suffix.
    pub fn fence_language(&self) -> &str {
        match self.language.as_str() {
            "plain text" => "text",
            other => other,
        }
    }
}

/// Image payload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageContent {
    pub source: FileObject,
    pub caption: Vec<RichTextItem>,
}

/// Bookmark payload
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkContent {
    pub url: String,
    pub caption: Vec<RichTextItem>,
}

/// Table layout flags. Rows arrive as `table_row` children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub table_width: usize,
    pub has_column_header: bool,
    pub has_row_header: bool,
}

/// One table row: a sequence of cells, each a rich text sequence
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRowContent {
    pub cells: Vec<Vec<RichTextItem>>,
}

/// File object types
#[derive(Debug, Clone, PartialEq)]
pub enum FileObject {
    External { external: ExternalFile },
    File { file: NotionFile },
}

impl FileObject {
    pub fn url(&self) -> &str {
        match self {
            FileObject::External { external } => &external.url,
            FileObject::File { file } => &file.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalFile {
    pub url: String,
}

/// A Notion-hosted file; its URL stops working after `expiry_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct NotionFile {
    pub url: String,
    pub expiry_time: Option<chrono::DateTime<chrono::Utc>>,
}
