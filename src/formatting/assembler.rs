// src/formatting/assembler.rs
//! Turns a page body into one document string.

use super::html::HtmlRenderer;
use super::markdown::MarkdownRenderer;
use super::BlockRenderer;
use crate::constants::CHARS_PER_BLOCK_ESTIMATE;
use crate::model::{ContentNode, NodeKind};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BLANK_LINE_RUN: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// HTML wrapper of a run of list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bulleted,
    Numbered,
}

impl ListKind {
    fn of(node: &ContentNode) -> Option<Self> {
        match node.kind {
            NodeKind::BulletedListItem(_) => Some(ListKind::Bulleted),
            NodeKind::NumberedListItem(_) => Some(ListKind::Numbered),
            _ => None,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            ListKind::Bulleted => "ul",
            ListKind::Numbered => "ol",
        }
    }
}

/// Markdown document of a page body.
///
/// Top-level nodes render at depth zero. A blank line separates a list
/// from whatever follows it, runs of blank lines collapse to one, and
/// the document ends with exactly one newline.
pub fn assemble_markdown(nodes: &[ContentNode]) -> String {
    let renderer = MarkdownRenderer;
    let mut out = String::with_capacity(nodes.len() * CHARS_PER_BLOCK_ESTIMATE);
    let mut previous_was_list = false;

    for node in nodes {
        let is_list = matches!(
            node.kind,
            NodeKind::BulletedListItem(_) | NodeKind::NumberedListItem(_) | NodeKind::ToDo { .. }
        );
        if previous_was_list && !is_list {
            out.push('\n');
        }
        out.push_str(&renderer.render(node, 0));
        previous_was_list = is_list;
    }

    let collapsed = BLANK_LINE_RUN.replace_all(&out, "\n\n");
    let trimmed = collapsed.trim_matches('\n');
    format!("{}\n", trimmed)
}

/// HTML fragment of a page body, with list runs wrapped in `<ul>`/`<ol>`.
pub fn assemble_html(nodes: &[ContentNode]) -> String {
    let renderer = HtmlRenderer;
    group_list_runs(nodes, |node| renderer.render(node, 0))
}

/// Renders `nodes` in order, wrapping each maximal run of same-kind list
/// items in one list element. A change of list kind closes the run.
fn group_list_runs<F>(nodes: &[ContentNode], mut render: F) -> String
where
    F: FnMut(&ContentNode) -> String,
{
    let mut out = String::new();
    let mut open: Option<ListKind> = None;

    for node in nodes {
        let kind = ListKind::of(node);
        if open != kind {
            if let Some(list) = open {
                out.push_str(&format!("</{}>\n", list.tag()));
            }
            if let Some(list) = kind {
                out.push_str(&format!("<{}>\n", list.tag()));
            }
            open = kind;
        }
        out.push_str(&render(node));
    }

    if let Some(list) = open {
        out.push_str(&format!("</{}>\n", list.tag()));
    }
    out
}
