// src/model/node.rs
//! The content node tree.
//!
//! A `ContentNode` is one block of page content. Its type-specific data
//! lives in `NodeKind`, one variant per block type, so each renderer can
//! dispatch with a single exhaustive match.

use super::blocks::*;
use crate::types::{plain_text_of, BlockId, RichTextItem};

/// One block of content together with its exclusively owned children.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentNode {
    pub id: BlockId,
    /// Whether the source declares nested children, resolved or not.
    pub has_children: bool,
    /// Resolved children in source order; empty until fetched.
    pub children: Vec<ContentNode>,
    pub kind: NodeKind,
    /// Why the children (or the synced original) could not be fetched.
    pub fetch_error: Option<String>,
}

/// Type tag and payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Paragraph(TextBlockContent),
    Heading1(TextBlockContent),
    Heading2(TextBlockContent),
    Heading3(TextBlockContent),
    BulletedListItem(TextBlockContent),
    NumberedListItem(TextBlockContent),
    ToDo {
        content: TextBlockContent,
        checked: bool,
    },
    Toggle {
        content: TextBlockContent,
        open: bool,
    },
    Quote(TextBlockContent),
    Callout(CalloutContent),
    Divider,
    Code(CodeContent),
    Image(ImageContent),
    Table(TableLayout),
    TableRow(TableRowContent),
    ColumnList,
    Column,
    /// `synced_from: None` marks the original; `Some` is an alias that
    /// the fetcher replaces with the node it points to.
    SyncedBlock {
        synced_from: Option<BlockId>,
    },
    Bookmark(BookmarkContent),
    Embed {
        url: String,
    },
    LinkPreview {
        url: String,
    },
    Unsupported {
        block_type: String,
        rich_text: Vec<RichTextItem>,
    },
}

impl ContentNode {
    pub fn new(id: BlockId, kind: NodeKind) -> Self {
        Self {
            id,
            has_children: false,
            children: Vec::new(),
            kind,
            fetch_error: None,
        }
    }

    /// Attaches resolved children, keeping `has_children` consistent.
    pub fn with_children(mut self, children: Vec<ContentNode>) -> Self {
        self.has_children = self.has_children || !children.is_empty();
        self.children = children;
        self
    }

    /// Declares that the source holds children not yet fetched.
    pub fn declaring_children(mut self) -> Self {
        self.has_children = true;
        self
    }

    /// Marks the node's subtree as unresolved; it keeps whatever it has.
    pub fn with_fetch_error(mut self, cause: impl Into<String>) -> Self {
        self.fetch_error = Some(cause.into());
        self
    }

    /// Whether no node in this subtree failed to fetch.
    pub fn is_complete(&self) -> bool {
        self.fetch_error.is_none() && self.children.iter().all(ContentNode::is_complete)
    }

    /// The Notion type tag of this node.
    pub fn type_name(&self) -> &str {
        match &self.kind {
            NodeKind::Paragraph(_) => "paragraph",
            NodeKind::Heading1(_) => "heading_1",
            NodeKind::Heading2(_) => "heading_2",
            NodeKind::Heading3(_) => "heading_3",
            NodeKind::BulletedListItem(_) => "bulleted_list_item",
            NodeKind::NumberedListItem(_) => "numbered_list_item",
            NodeKind::ToDo { .. } => "to_do",
            NodeKind::Toggle { .. } => "toggle",
            NodeKind::Quote(_) => "quote",
            NodeKind::Callout(_) => "callout",
            NodeKind::Divider => "divider",
            NodeKind::Code(_) => "code",
            NodeKind::Image(_) => "image",
            NodeKind::Table(_) => "table",
            NodeKind::TableRow(_) => "table_row",
            NodeKind::ColumnList => "column_list",
            NodeKind::Column => "column",
            NodeKind::SyncedBlock { .. } => "synced_block",
            NodeKind::Bookmark(_) => "bookmark",
            NodeKind::Embed { .. } => "embed",
            NodeKind::LinkPreview { .. } => "link_preview",
            NodeKind::Unsupported { block_type, .. } => block_type,
        }
    }

    /// The inline spans of a text-bearing node; empty for everything else.
    pub fn rich_text(&self) -> &[RichTextItem] {
        match &self.kind {
            NodeKind::Paragraph(c)
            | NodeKind::Heading1(c)
            | NodeKind::Heading2(c)
            | NodeKind::Heading3(c)
            | NodeKind::BulletedListItem(c)
            | NodeKind::NumberedListItem(c)
            | NodeKind::Quote(c)
            | NodeKind::ToDo { content: c, .. }
            | NodeKind::Toggle { content: c, .. } => &c.rich_text,
            NodeKind::Callout(callout) => &callout.content.rich_text,
            NodeKind::Code(code) => &code.rich_text,
            NodeKind::Unsupported { rich_text, .. } => rich_text,
            _ => &[],
        }
    }

    pub fn plain_text(&self) -> String {
        plain_text_of(self.rich_text())
    }

    /// Target of a synced-block alias.
    pub fn synced_target(&self) -> Option<&BlockId> {
        match &self.kind {
            NodeKind::SyncedBlock { synced_from } => synced_from.as_ref(),
            _ => None,
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Heading1(_) | NodeKind::Heading2(_) | NodeKind::Heading3(_)
        )
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ContentNode::subtree_size)
            .sum::<usize>()
    }
}
