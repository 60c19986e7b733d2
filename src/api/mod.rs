// src/api/mod.rs
//! Notion API interaction: retrieving content from a workspace.
//!
//! Remote access is expressed as capabilities: `NodeSource`, `PageSource`
//! and `DatabaseSource`. The fetcher and discovery depend only on those,
//! never on HTTP details, so tests drive them with in-memory sources.

pub mod cache;
pub mod client;
pub mod discovery;
pub mod fetcher;
pub mod notion_client_adapter;
mod pagination;
pub mod parser;
pub mod query;
mod responses;
mod types;

use crate::error::AppError;
use crate::model::{ContentNode, PageMeta};
use crate::types::{DatabaseId, NotionId, PageId};

/// The ability to list and retrieve content nodes.
#[async_trait::async_trait]
pub trait NodeSource: Send + Sync {
    /// One page of `parent`'s children, continuing from `cursor`.
    async fn list_children(
        &self,
        parent: &NotionId,
        cursor: Option<String>,
        page_size: u32,
    ) -> Result<PaginatedResponse<ContentNode>, AppError>;

    /// A single node without its children.
    async fn retrieve_node(&self, id: &NotionId) -> Result<ContentNode, AppError>;
}

/// The ability to retrieve page metadata.
#[async_trait::async_trait]
pub trait PageSource: NodeSource {
    async fn retrieve_page(&self, id: &PageId) -> Result<PageMeta, AppError>;
}

/// The ability to query a database for pages.
#[async_trait::async_trait]
pub trait DatabaseSource: Send + Sync {
    /// One page of the pages matching `query`, continuing from `cursor`.
    async fn query_database(
        &self,
        database: &DatabaseId,
        query: &DatabaseQuery,
        cursor: Option<String>,
        page_size: u32,
    ) -> Result<PaginatedResponse<PageMeta>, AppError>;
}

// Re-export the public interface
pub use cache::NodeCache;
pub use client::NotionHttpClient;
pub use discovery::{discover_pages, DatabaseSelection, DiscoveryMode};
pub use fetcher::{FetchOptions, NodeFetcher};
pub use query::{DatabaseQuery, PageFilter, PageSort, SortKey};
pub use responses::PaginatedResponse;
