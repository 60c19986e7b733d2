// src/lib.rs
//! notion2markup: converts Notion pages into Markdown and HTML documents.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `FetchError`, `ConversionError`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `PipelineConfig`, `SyncState`
//! - **Domain model**: `ContentNode`, `NodeKind`, `Page`, `PageMeta` and block payloads
//! - **Domain types**: `NotionId`, `PageId`, `BlockId`, `RichTextItem`, etc.
//! - **API client**: `NodeSource`, `PageSource`, `DatabaseSource`, `NodeFetcher`, `NotionHttpClient`
//! - **Discovery**: database queries selecting the pages to sync
//! - **Formatting**: `BlockRenderer`, `MarkdownRenderer`, `HtmlRenderer`, assemblers
//! - **Output**: delivery plans and document file names
//! - **Pipeline**: `PageConverter`, `run_sync`

mod api;
mod config;
mod constants;
mod error;
mod error_recovery;
mod formatting;
mod model;
mod output;
mod pipeline;
mod state;
mod types;

// --- Error Handling ---
pub use crate::error::{
    AppError, ConversionError, FetchError, NotionClientError, NotionErrorCode, Result,
};
pub use crate::error_recovery::{retry_with_policy, RetryPolicy};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, PipelineConfig};
pub use crate::constants::{
    BLOCK_MAX_RENDER_DEPTH, DEFAULT_SYNC_DAYS, LOG_FILE_NAME, MARKDOWN_INDENT_WIDTH,
};
pub use crate::state::SyncState;

// --- Domain Model ---
pub use crate::model::{
    BookmarkContent, CalloutContent, CodeContent, ContentNode, ExternalFile, FileObject, Icon,
    ImageContent, NodeKind, NotionFile, Page, PageMeta, TableLayout, TableRowContent,
    TextBlockContent,
};

// --- Domain Types ---
pub use crate::types::{
    plain_text_of, Annotations, ApiKey, BatchSize, BlockId, Color, DatabaseId, Link, NotionId,
    PageId,
    RichTextItem, RichTextType, ValidatedUrl,
};

// --- API Client ---
pub use crate::api::{
    client::ApiResponse,
    parser::{
        parse_block_response, parse_children_response, parse_page_response, parse_query_response,
    },
    discover_pages, DatabaseQuery, DatabaseSelection, DatabaseSource, DiscoveryMode, FetchOptions,
    NodeCache, NodeFetcher, NodeSource, NotionHttpClient, PageFilter, PageSort, PageSource,
    PaginatedResponse, SortKey,
};

// --- Formatting ---
pub use crate::formatting::rich_text::{
    format_rich_text, rich_text_to_html, rich_text_to_markdown, MarkupTarget,
};
pub use crate::formatting::{
    assemble_html, assemble_markdown, render_html_document, BlockRenderer, HtmlRenderer,
    MarkdownRenderer, OutputFormat,
};

// --- Output ---
pub use crate::output::{
    deliver, document_filename, document_path, existing_page_ids, sanitize_title,
    DeliveryTarget, OutputPlan, OutputReport,
};

// --- Pipeline ---
pub use crate::pipeline::{
    discover_database_pages, merge_page_ids, run_sync, ConversionSettings, DocumentComposer,
    DocumentDelivery, PageConverter, PageRetrieval, RenderedDocument, SyncSummary,
};
