// src/formatting/markdown.rs
//! Markdown rendering of content nodes.
//!
//! Nesting is expressed by indentation: every level adds
//! `MARKDOWN_INDENT_WIDTH` spaces in front of block markers. Quotes and
//! callouts are the exception; they nest by prefixing every line of
//! their body, children included, with `> `.

use super::rich_text::rich_text_to_markdown;
use super::BlockRenderer;
use crate::constants::{BLOCK_MAX_RENDER_DEPTH, MARKDOWN_INDENT_WIDTH};
use crate::error::ConversionError;
use crate::model::{
    BookmarkContent, CalloutContent, CodeContent, ContentNode, NodeKind, TableLayout,
    TableRowContent,
};
use crate::types::RichTextItem;
use std::fmt::Write;

/// Marker line of a callout without an emoji icon.
const DEFAULT_CALLOUT_MARKER: &str = "[!NOTE]";

/// Renders nodes as Markdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_children(&self, children: &[ContentNode], depth: usize) -> String {
        children
            .iter()
            .map(|child| self.render(child, depth))
            .collect()
    }

    /// Quote-style body: the text, a blank line, then children at level
    /// zero, every line prefixed with `> ` at the node's indentation.
    fn render_prefixed(&self, head: &str, children: &[ContentNode], indent: &str) -> String {
        let mut body = String::new();
        if !head.is_empty() {
            body.push_str(head);
            body.push_str("\n\n");
        }
        body.push_str(&self.render_children(children, 0));

        let mut out = String::new();
        for line in body.trim_end_matches('\n').lines() {
            if line.is_empty() {
                out.push_str(&format!("{}>\n", indent));
            } else {
                out.push_str(&format!("{}> {}\n", indent, line));
            }
        }
        out.push('\n');
        out
    }

    fn render_callout(
        &self,
        callout: &CalloutContent,
        children: &[ContentNode],
        indent: &str,
    ) -> String {
        let marker = callout
            .icon
            .as_ref()
            .and_then(|icon| icon.emoji())
            .unwrap_or(DEFAULT_CALLOUT_MARKER);
        let text = rich_text_to_markdown(&callout.content.rich_text);
        let head = if text.is_empty() {
            marker.to_string()
        } else {
            format!("{}\n{}", marker, text)
        };
        self.render_prefixed(&head, children, indent)
    }

    fn render_code(&self, code: &CodeContent, indent: &str) -> Result<String, ConversionError> {
        let mut out = String::new();
        writeln!(out, "{}```{}", indent, code.fence_language())?;
        for line in code.source().split('\n') {
            writeln!(out, "{}{}", indent, line)?;
        }
        writeln!(out, "{}```", indent)?;

        let caption = code.caption_text();
        if !caption.is_empty() {
            writeln!(out, "{}*{}*", indent, caption)?;
        }
        out.push('\n');
        Ok(out)
    }

    fn render_bookmark(
        &self,
        url: &str,
        caption: &str,
        indent: &str,
    ) -> Result<String, ConversionError> {
        let mut out = String::new();
        writeln!(out, "{}[{}]({})", indent, url, url)?;
        if !caption.is_empty() {
            writeln!(out, "{}*{}*", indent, caption)?;
        }
        out.push('\n');
        Ok(out)
    }

    /// GFM pipe table. The first row is the header; without a column
    /// header an empty one is emitted so every data row stays a row.
    fn render_table(
        &self,
        layout: &TableLayout,
        children: &[ContentNode],
        indent: &str,
    ) -> Result<String, ConversionError> {
        let rows = table_rows(children)?;
        let width = table_width(layout, &rows)?;
        if width == 0 {
            return Ok(String::new());
        }

        let mut lines: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                let mut cells: Vec<String> =
                    row.cells.iter().map(|cell| table_cell(cell)).collect();
                cells.resize(width, String::new());
                cells
            })
            .collect();

        if !layout.has_column_header || lines.is_empty() {
            lines.insert(0, vec![String::new(); width]);
        }

        let mut out = String::new();
        for (i, cells) in lines.iter().enumerate() {
            writeln!(out, "{}| {} |", indent, cells.join(" | "))?;
            if i == 0 {
                writeln!(out, "{}|{}", indent, " --- |".repeat(width))?;
            }
        }
        out.push('\n');
        Ok(out)
    }
}

impl BlockRenderer for MarkdownRenderer {
    fn try_render(&self, node: &ContentNode, depth: usize) -> Result<String, ConversionError> {
        if depth > BLOCK_MAX_RENDER_DEPTH {
            return Err(ConversionError::DepthExceeded {
                limit: BLOCK_MAX_RENDER_DEPTH,
            });
        }

        let indent = indent_for(depth);
        let text = rich_text_to_markdown(node.rich_text());
        let children = &node.children;

        let own = match &node.kind {
            NodeKind::Paragraph(_) => {
                if text.is_empty() {
                    "\n\n".to_string()
                } else {
                    format!("{}{}\n\n", indent, text)
                }
            }
            NodeKind::Heading1(_) => format!("{}# {}\n\n", indent, text),
            NodeKind::Heading2(_) => format!("{}## {}\n\n", indent, text),
            NodeKind::Heading3(_) => format!("{}### {}\n\n", indent, text),
            NodeKind::BulletedListItem(_) => format!("{}- {}\n", indent, text),
            NodeKind::NumberedListItem(_) => format!("{}1. {}\n", indent, text),
            NodeKind::ToDo { checked, .. } => {
                let mark = if *checked { 'x' } else { ' ' };
                format!("{}- [{}] {}\n", indent, mark, text)
            }
            NodeKind::Toggle { .. } => {
                let mut out = String::new();
                writeln!(out, "{}<details>", indent)?;
                writeln!(out, "{}<summary>{}</summary>", indent, text)?;
                out.push('\n');
                out.push_str(&self.render_children(children, depth + 1));
                writeln!(out, "{}</details>", indent)?;
                out.push('\n');
                return Ok(out);
            }
            NodeKind::Quote(_) => return Ok(self.render_prefixed(&text, children, &indent)),
            NodeKind::Callout(callout) => {
                return Ok(self.render_callout(callout, children, &indent))
            }
            NodeKind::Divider => format!("{}---\n\n", indent),
            NodeKind::Code(code) => return self.render_code(code, &indent),
            NodeKind::Image(_) => return Ok(String::new()),
            NodeKind::Table(layout) => return self.render_table(layout, children, &indent),
            NodeKind::TableRow(row) => {
                let cells: Vec<String> = row.cells.iter().map(|cell| table_cell(cell)).collect();
                format!("{}| {} |\n", indent, cells.join(" | "))
            }
            NodeKind::ColumnList | NodeKind::Column | NodeKind::SyncedBlock { .. } => {
                String::new()
            }
            NodeKind::Bookmark(BookmarkContent { url, caption }) => {
                self.render_bookmark(url, &rich_text_to_markdown(caption), &indent)?
            }
            NodeKind::LinkPreview { url } => self.render_bookmark(url, "", &indent)?,
            NodeKind::Embed { url } => format!("{}<{}>\n\n", indent, url),
            NodeKind::Unsupported { .. } => {
                if text.is_empty() {
                    String::new()
                } else {
                    format!("{}{}\n\n", indent, text)
                }
            }
        };

        Ok(own + &self.render_children(children, depth + 1))
    }

    fn error_placeholder(
        &self,
        node: &ContentNode,
        error: &ConversionError,
        depth: usize,
    ) -> String {
        format!(
            "{}*[Error processing {} block: {}]*\n\n",
            indent_for(depth),
            node.type_name(),
            error
        )
    }
}

fn indent_for(depth: usize) -> String {
    " ".repeat(MARKDOWN_INDENT_WIDTH * depth)
}

/// Pipe-safe cell text.
fn table_cell(cell: &[RichTextItem]) -> String {
    rich_text_to_markdown(cell)
        .replace('|', "\\|")
        .replace('\n', "<br>")
}

/// The `table_row` children of a table, rejecting anything else.
pub(crate) fn table_rows(
    children: &[ContentNode],
) -> Result<Vec<&TableRowContent>, ConversionError> {
    children
        .iter()
        .map(|child| match &child.kind {
            NodeKind::TableRow(row) => Ok(row),
            _ => Err(ConversionError::MalformedTable {
                reason: format!("unexpected {} block inside table", child.type_name()),
            }),
        })
        .collect()
}

/// Column count of a table: the declared width, or the widest row when
/// no width is declared. Rows wider than a declared width are malformed.
pub(crate) fn table_width(
    layout: &TableLayout,
    rows: &[&TableRowContent],
) -> Result<usize, ConversionError> {
    let widest = rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
    if layout.table_width == 0 {
        return Ok(widest);
    }
    if widest > layout.table_width {
        return Err(ConversionError::MalformedTable {
            reason: format!(
                "row has {} cells but the table is {} wide",
                widest, layout.table_width
            ),
        });
    }
    Ok(layout.table_width)
}
