// src/formatting/html.rs
//! HTML fragment rendering of content nodes.
//!
//! Nesting is structural: a node's children follow its own markup, or sit
//! inside it for the container types. List items are bare `<li>` elements;
//! only the assembler wraps top-level list runs in `<ul>`/`<ol>`.

use super::markdown::{table_rows, table_width};
use super::rich_text::{html_escape, rich_text_to_html};
use super::BlockRenderer;
use crate::constants::BLOCK_MAX_RENDER_DEPTH;
use crate::error::ConversionError;
use crate::model::{
    BookmarkContent, CalloutContent, CodeContent, ContentNode, ImageContent, NodeKind,
    TableLayout,
};
use crate::types::{plain_text_of, Color, RichTextItem};
use std::fmt::Write;

/// Renders nodes as HTML fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_children(&self, children: &[ContentNode], depth: usize) -> String {
        children
            .iter()
            .map(|child| self.render(child, depth))
            .collect()
    }

    fn render_callout(&self, callout: &CalloutContent) -> Result<String, ConversionError> {
        let mut out = String::new();
        writeln!(out, "<div class=\"callout{}\">", color_suffix(&callout.content.color))?;
        if let Some(emoji) = callout.icon.as_ref().and_then(|icon| icon.emoji()) {
            writeln!(out, "<div class=\"callout-emoji\">{}</div>", html_escape(emoji))?;
        }
        writeln!(
            out,
            "<div class=\"callout-text\">{}</div>",
            rich_text_to_html(&callout.content.rich_text)
        )?;
        writeln!(out, "</div>")?;
        Ok(out)
    }

    fn render_code(&self, code: &CodeContent) -> Result<String, ConversionError> {
        let mut out = String::new();
        writeln!(
            out,
            "<pre><code class=\"language-{}\">",
            html_escape(code.fence_language())
        )?;
        writeln!(out, "{}", html_escape(&code.source()))?;
        writeln!(out, "</code></pre>")?;

        let caption = code.caption_text();
        if !caption.is_empty() {
            writeln!(out, "<div class=\"code-caption\">{}</div>", html_escape(&caption))?;
        }
        Ok(out)
    }

    fn render_image(&self, image: &ImageContent) -> Result<String, ConversionError> {
        let caption = rich_text_to_html(&image.caption);
        let alt = html_escape(&plain_text_of(&image.caption));

        let mut out = String::new();
        writeln!(out, "<figure>")?;
        writeln!(
            out,
            "<img src=\"{}\" alt=\"{}\">",
            html_escape(image.source.url()),
            alt
        )?;
        if !caption.is_empty() {
            writeln!(out, "<figcaption>{}</figcaption>", caption)?;
        }
        writeln!(out, "</figure>")?;
        Ok(out)
    }

    fn render_bookmark(
        &self,
        url: &str,
        caption: &[RichTextItem],
    ) -> Result<String, ConversionError> {
        let href = html_escape(url);
        let caption = rich_text_to_html(caption);

        let mut out = String::new();
        writeln!(out, "<div class=\"bookmark\">")?;
        writeln!(out, "<a href=\"{}\" target=\"_blank\">{}</a>", href, href)?;
        if !caption.is_empty() {
            writeln!(out, "<div class=\"bookmark-caption\">{}</div>", caption)?;
        }
        writeln!(out, "</div>")?;
        Ok(out)
    }

    fn render_table(
        &self,
        layout: &TableLayout,
        children: &[ContentNode],
    ) -> Result<String, ConversionError> {
        let rows = table_rows(children)?;
        let width = table_width(layout, &rows)?;

        let mut out = String::from("<table>\n");
        for (row_index, row) in rows.iter().enumerate() {
            out.push_str("  <tr>\n");
            for col_index in 0..width {
                let is_header = (row_index == 0 && layout.has_column_header)
                    || (col_index == 0 && layout.has_row_header);
                let tag = if is_header { "th" } else { "td" };
                let cell = row
                    .cells
                    .get(col_index)
                    .map(|cell| rich_text_to_html(cell))
                    .unwrap_or_default();
                writeln!(out, "    <{tag}>{cell}</{tag}>")?;
            }
            out.push_str("  </tr>\n");
        }
        out.push_str("</table>\n");
        Ok(out)
    }
}

impl BlockRenderer for HtmlRenderer {
    fn try_render(&self, node: &ContentNode, depth: usize) -> Result<String, ConversionError> {
        if depth > BLOCK_MAX_RENDER_DEPTH {
            return Err(ConversionError::DepthExceeded {
                limit: BLOCK_MAX_RENDER_DEPTH,
            });
        }

        let text = rich_text_to_html(node.rich_text());
        let children = &node.children;
        let nested = depth + 1;

        let own = match &node.kind {
            NodeKind::Paragraph(_) => format!("<p>{}</p>\n", text),
            NodeKind::Heading1(_) => format!("<h1>{}</h1>\n", text),
            NodeKind::Heading2(_) => format!("<h2>{}</h2>\n", text),
            NodeKind::Heading3(_) => format!("<h3>{}</h3>\n", text),
            NodeKind::BulletedListItem(_) | NodeKind::NumberedListItem(_) => {
                format!("<li>{}</li>\n", text)
            }
            NodeKind::ToDo { checked, .. } => {
                let checked = if *checked { " checked" } else { "" };
                format!(
                    "<div class=\"todo-item\"><input type=\"checkbox\"{} disabled> {}</div>\n",
                    checked, text
                )
            }
            NodeKind::Toggle { open, .. } => {
                let open = if *open { " open" } else { "" };
                return Ok(format!(
                    "<details{}>\n<summary>{}</summary>\n<div class=\"toggle-content\">\n{}</div>\n</details>\n",
                    open,
                    text,
                    self.render_children(children, nested)
                ));
            }
            NodeKind::Quote(_) => format!("<blockquote>{}</blockquote>\n", text),
            NodeKind::Callout(callout) => self.render_callout(callout)?,
            NodeKind::Divider => "<hr>\n".to_string(),
            NodeKind::Code(code) => return self.render_code(code),
            NodeKind::Image(image) => self.render_image(image)?,
            NodeKind::Table(layout) => return self.render_table(layout, children),
            NodeKind::TableRow(row) => {
                let mut out = String::from("<tr>");
                for cell in &row.cells {
                    write!(out, "<td>{}</td>", rich_text_to_html(cell))?;
                }
                out.push_str("</tr>\n");
                out
            }
            NodeKind::ColumnList => {
                return Ok(format!(
                    "<div class=\"column-list\">\n{}</div>\n",
                    self.render_children(children, nested)
                ))
            }
            NodeKind::Column => {
                return Ok(format!(
                    "<div class=\"column\">\n{}</div>\n",
                    self.render_children(children, nested)
                ))
            }
            NodeKind::SyncedBlock { .. } => return Ok(self.render_children(children, depth)),
            NodeKind::Bookmark(BookmarkContent { url, caption }) => {
                self.render_bookmark(url, caption)?
            }
            NodeKind::LinkPreview { url } => self.render_bookmark(url, &[])?,
            NodeKind::Embed { url } => format!(
                "<div class=\"embed-container\">\n<iframe src=\"{}\" frameborder=\"0\" allowfullscreen></iframe>\n</div>\n",
                html_escape(url)
            ),
            NodeKind::Unsupported { block_type, .. } => {
                format!("<div class=\"{}-block\">{}</div>\n", html_escape(block_type), text)
            }
        };

        Ok(own + &self.render_children(children, nested))
    }

    fn error_placeholder(
        &self,
        node: &ContentNode,
        error: &ConversionError,
        _depth: usize,
    ) -> String {
        // `--` would end the comment early.
        let message = error.to_string().replace("--", "- -");
        format!(
            "<!-- Error processing {} block: {} -->\n",
            node.type_name(),
            message
        )
    }
}

fn color_suffix(color: &Color) -> String {
    if color.is_default() {
        String::new()
    } else {
        format!(" {}", color.css_class())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Icon, TableRowContent, TextBlockContent};
    use crate::types::BlockId;
    use pretty_assertions::assert_eq;

    fn node(kind: NodeKind) -> ContentNode {
        ContentNode::new(BlockId::new_v4(), kind)
    }

    fn text(value: &str) -> TextBlockContent {
        TextBlockContent::new(vec![RichTextItem::plain_text(value)])
    }

    fn row(cells: &[&str]) -> ContentNode {
        node(NodeKind::TableRow(TableRowContent {
            cells: cells
                .iter()
                .map(|cell| vec![RichTextItem::plain_text(cell)])
                .collect(),
        }))
    }

    #[test]
    fn paragraph_text_is_escaped() {
        let paragraph = node(NodeKind::Paragraph(text("a < b & c")));
        assert_eq!(HtmlRenderer.render(&paragraph, 0), "<p>a &lt; b &amp; c</p>\n");
    }

    #[test]
    fn nested_items_follow_their_parent_unwrapped() {
        let tree = node(NodeKind::BulletedListItem(text("outer")))
            .with_children(vec![node(NodeKind::NumberedListItem(text("inner")))]);

        assert_eq!(
            HtmlRenderer.render(&tree, 0),
            "<li>outer</li>\n<li>inner</li>\n"
        );
    }

    #[test]
    fn block_children_are_appended_without_list_wrapper() {
        let tree = node(NodeKind::Paragraph(text("para")))
            .with_children(vec![node(NodeKind::BulletedListItem(text("child")))]);

        assert_eq!(
            HtmlRenderer.render(&tree, 0),
            "<p>para</p>\n<li>child</li>\n"
        );
    }

    #[test]
    fn callout_carries_color_class_and_emoji() {
        let mut content = text("Heads up");
        content.color = Color::YellowBackground;
        let callout = node(NodeKind::Callout(CalloutContent {
            icon: Some(Icon::Emoji {
                emoji: "💡".to_string(),
            }),
            content,
        }));

        assert_eq!(
            HtmlRenderer.render(&callout, 0),
            "<div class=\"callout color-yellow_background\">\n<div class=\"callout-emoji\">💡</div>\n<div class=\"callout-text\">Heads up</div>\n</div>\n"
        );
    }

    #[test]
    fn table_marks_header_row_and_column() {
        let table = node(NodeKind::Table(TableLayout {
            table_width: 2,
            has_column_header: true,
            has_row_header: true,
        }))
        .with_children(vec![row(&["h1", "h2"]), row(&["r1"])]);

        assert_eq!(
            HtmlRenderer.render(&table, 0),
            "<table>\n  <tr>\n    <th>h1</th>\n    <th>h2</th>\n  </tr>\n  <tr>\n    <th>r1</th>\n    <td></td>\n  </tr>\n</table>\n"
        );
    }

    #[test]
    fn overwide_row_becomes_comment() {
        let table = node(NodeKind::Table(TableLayout {
            table_width: 1,
            has_column_header: false,
            has_row_header: false,
        }))
        .with_children(vec![row(&["a", "b"])]);

        assert_eq!(
            HtmlRenderer.render(&table, 0),
            "<!-- Error processing table block: malformed table: row has 2 cells but the table is 1 wide -->\n"
        );
    }
}
