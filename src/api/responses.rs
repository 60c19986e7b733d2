// src/api/responses.rs
//! Wire types of the Notion API.
//!
//! Bodies are deserialized into `notion-client`'s serde types and only then
//! converted to the domain model, so the adapter never touches raw JSON.

use crate::error::AppError;
use crate::model::{ContentNode, PageMeta};
use serde::{Deserialize, Serialize};

pub use notion_client::objects::{
    block::Block as NotionBlock, error::Error as NotionError, page::Page as NotionPage,
};

/// Generic paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub object: String,
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// A list page whose continuation is `next_cursor`; `None` ends the listing.
    pub fn page(results: Vec<T>, next_cursor: Option<String>) -> Self {
        Self {
            object: "list".to_string(),
            has_more: next_cursor.is_some(),
            results,
            next_cursor,
        }
    }

    /// Converts every result, keeping the pagination envelope.
    pub fn try_map<U, F>(self, f: F) -> Result<PaginatedResponse<U>, AppError>
    where
        F: FnMut(T) -> Result<U, AppError>,
    {
        Ok(PaginatedResponse {
            object: self.object,
            results: self.results.into_iter().map(f).collect::<Result<_, _>>()?,
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        })
    }
}

/// Block children response using notion-client types
pub type RetrieveBlockChildrenResponse = PaginatedResponse<NotionBlock>;

/// Trait for converting notion-client types to domain types
pub trait ToDomain<T> {
    fn to_domain(self) -> Result<T, AppError>;
}

impl ToDomain<PageMeta> for NotionPage {
    fn to_domain(self) -> Result<PageMeta, AppError> {
        super::notion_client_adapter::convert_page(self)
    }
}

impl ToDomain<ContentNode> for NotionBlock {
    fn to_domain(self) -> Result<ContentNode, AppError> {
        super::notion_client_adapter::convert_block(self)
    }
}
