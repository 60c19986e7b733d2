// src/formatting/mod.rs
//! Renders content trees into Markdown and HTML.
//!
//! Both renderers implement `BlockRenderer` independently over the same
//! `NodeKind` switch. The assembler turns a page body into one document
//! per target, and `document` wraps an HTML fragment into a standalone page.

pub mod assembler;
pub mod document;
pub mod html;
pub mod markdown;
pub mod rich_text;

pub use assembler::{assemble_html, assemble_markdown};
pub use document::render_html_document;
pub use html::HtmlRenderer;
pub use markdown::MarkdownRenderer;

use crate::error::ConversionError;
use crate::model::ContentNode;

/// The ability to render one node, and its subtree, to a markup string.
///
/// `try_render` may fail for a single node; `render` never does. It
/// substitutes the renderer's error placeholder so one malformed block
/// cannot abort its siblings or the document. A node whose children
/// could not be fetched renders what it has, followed by a placeholder
/// one level down, where the children would have been.
pub trait BlockRenderer {
    fn try_render(&self, node: &ContentNode, depth: usize) -> Result<String, ConversionError>;

    /// Visible marker emitted in place of a node that failed to render.
    fn error_placeholder(&self, node: &ContentNode, error: &ConversionError, depth: usize)
        -> String;

    fn render(&self, node: &ContentNode, depth: usize) -> String {
        let rendered = self.try_render(node, depth).unwrap_or_else(|error| {
            log::warn!(
                "Failed to render {} block {}: {}",
                node.type_name(),
                node.id,
                error
            );
            self.error_placeholder(node, &error, depth)
        });

        match &node.fetch_error {
            Some(cause) => {
                let missing = ConversionError::ChildrenUnavailable {
                    cause: cause.clone(),
                };
                rendered + &self.error_placeholder(node, &missing, depth + 1)
            }
            None => rendered,
        }
    }
}

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Html,
}

impl OutputFormat {
    /// File extension of documents in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
        }
    }

    /// Assembles a page body into a document of this format.
    pub fn assemble(&self, nodes: &[ContentNode]) -> String {
        match self {
            OutputFormat::Markdown => assemble_markdown(nodes),
            OutputFormat::Html => assemble_html(nodes),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Html => write!(f, "html"),
        }
    }
}
