// src/model/mod.rs
pub mod blocks;
mod node;

pub use blocks::*;
pub use node::{ContentNode, NodeKind};

use crate::types::PageId;
use chrono::{DateTime, Utc};

/// Page metadata as the pages endpoint reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub id: PageId,
    /// Plain text of the page's title property, if it has one.
    pub title: Option<String>,
    pub url: String,
    pub last_edited_time: Option<DateTime<Utc>>,
}

/// A page with its fully resolved body.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub meta: PageMeta,
    pub body: Vec<ContentNode>,
}

impl Page {
    pub fn new(meta: PageMeta, body: Vec<ContentNode>) -> Self {
        Self { meta, body }
    }

    pub fn id(&self) -> &PageId {
        &self.meta.id
    }

    /// Title to show for the page.
    ///
    /// Falls back to the first top-level heading, then to `Page <short id>`.
    pub fn display_title(&self) -> String {
        if let Some(title) = self.meta.title.as_deref().map(str::trim) {
            if !title.is_empty() {
                return title.to_string();
            }
        }

        self.body
            .iter()
            .filter(|node| node.is_heading())
            .map(|node| node.plain_text().trim().to_string())
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| format!("Page {}", self.meta.id.short()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockId, RichTextItem};

    fn meta(title: Option<&str>) -> PageMeta {
        PageMeta {
            id: PageId::parse("0123456789abcdef0123456789abcdef").unwrap(),
            title: title.map(str::to_string),
            url: "https://www.notion.so/0123456789abcdef0123456789abcdef".to_string(),
            last_edited_time: None,
        }
    }

    fn heading(text: &str) -> ContentNode {
        ContentNode::new(
            BlockId::new_v4(),
            NodeKind::Heading2(TextBlockContent::new(vec![RichTextItem::plain_text(text)])),
        )
    }

    #[test]
    fn title_property_wins() {
        let page = Page::new(meta(Some("Roadmap")), vec![heading("Intro")]);
        assert_eq!(page.display_title(), "Roadmap");
    }

    #[test]
    fn blank_title_falls_back_to_heading() {
        let page = Page::new(meta(Some("  ")), vec![heading("Intro")]);
        assert_eq!(page.display_title(), "Intro");
    }

    #[test]
    fn untitled_page_uses_short_id() {
        let page = Page::new(meta(None), Vec::new());
        assert_eq!(page.display_title(), "Page 01234567");
    }
}
