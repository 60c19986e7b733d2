// tests/common/mod.rs
//! Shared fixtures: an in-memory Notion workspace and node builders.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use notion2markup::{
    AppError, BlockId, ContentNode, DatabaseId, DatabaseQuery, DatabaseSource, NodeKind,
    NodeSource, NotionErrorCode, NotionId, PageFilter, PageId, PageMeta, PageSource,
    PaginatedResponse, RichTextItem, TextBlockContent,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Deterministic block ID `n`.
pub fn block_id(n: u32) -> BlockId {
    BlockId::parse(&format!("{:032x}", n)).unwrap()
}

pub fn notion_id(n: u32) -> NotionId {
    NotionId::from(&block_id(n))
}

pub fn page_id(n: u32) -> PageId {
    PageId::parse(&format!("{:032x}", n)).unwrap()
}

pub fn text(value: &str) -> TextBlockContent {
    TextBlockContent::new(vec![RichTextItem::plain_text(value)])
}

pub fn node(n: u32, kind: NodeKind) -> ContentNode {
    ContentNode::new(block_id(n), kind)
}

pub fn paragraph(n: u32, value: &str) -> ContentNode {
    node(n, NodeKind::Paragraph(text(value)))
}

pub fn bullet(n: u32, value: &str) -> ContentNode {
    node(n, NodeKind::BulletedListItem(text(value)))
}

pub fn alias(n: u32, target: u32) -> ContentNode {
    node(
        n,
        NodeKind::SyncedBlock {
            synced_from: Some(block_id(target)),
        },
    )
}

pub fn rate_limited() -> AppError {
    AppError::NotionService {
        code: NotionErrorCode::RateLimited,
        message: "Rate limited".to_string(),
        status: reqwest::StatusCode::TOO_MANY_REQUESTS,
    }
}

pub fn not_found() -> AppError {
    AppError::NotionService {
        code: NotionErrorCode::ObjectNotFound,
        message: "Could not find block".to_string(),
        status: reqwest::StatusCode::NOT_FOUND,
    }
}

/// A page of the mock database with the properties filters look at.
#[derive(Debug, Clone)]
pub struct DatabaseRow {
    pub meta: PageMeta,
    /// The `Sync` checkbox.
    pub flagged: bool,
    /// The `Date` property.
    pub date: Option<DateTime<Utc>>,
}

impl DatabaseRow {
    fn matches(&self, filter: &PageFilter) -> bool {
        match filter {
            PageFilter::Checked { property } => property == "Sync" && self.flagged,
            PageFilter::EditedAfter(at) => self.meta.last_edited_time.map_or(false, |t| t > *at),
            PageFilter::DateOnOrAfter { property, since } => {
                property == "Date" && self.date.map_or(false, |d| d >= *since)
            }
            PageFilter::And(filters) => filters.iter().all(|f| self.matches(f)),
            PageFilter::Or(filters) => filters.iter().any(|f| self.matches(f)),
        }
    }
}

/// In-memory workspace that records every remote call.
#[derive(Default)]
pub struct MockWorkspace {
    /// Children listings, one inner vec per page of results.
    listings: HashMap<NotionId, Vec<Vec<ContentNode>>>,
    nodes: HashMap<NotionId, ContentNode>,
    pages: HashMap<NotionId, PageMeta>,
    /// Remaining transient failures per listed parent.
    flaky: Mutex<HashMap<NotionId, u32>>,
    broken: Vec<NotionId>,
    delays: HashMap<NotionId, Duration>,
    pub list_calls: AtomicUsize,
    pub retrieve_calls: AtomicUsize,
    pub page_calls: AtomicUsize,
    in_flight: AtomicUsize,
    /// Most listings that were ever awaiting an answer at once.
    pub max_in_flight: AtomicUsize,
    /// Parents in the order their listings were requested.
    pub listed: Mutex<Vec<NotionId>>,
    databases: HashMap<NotionId, Vec<DatabaseRow>>,
    /// Every database query with the cursor it was sent with.
    pub queries: Mutex<Vec<(DatabaseQuery, Option<String>)>>,
}

impl MockWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Children of `parent` served in a single page.
    pub fn with_children(self, parent: &NotionId, children: Vec<ContentNode>) -> Self {
        self.with_paged_children(parent, vec![children])
    }

    pub fn with_paged_children(mut self, parent: &NotionId, pages: Vec<Vec<ContentNode>>) -> Self {
        self.listings.insert(parent.clone(), pages);
        self
    }

    /// A node retrievable on its own, e.g. a synced-block original.
    pub fn with_node(mut self, node: ContentNode) -> Self {
        self.nodes.insert(NotionId::from(&node.id), node);
        self
    }

    pub fn with_page(mut self, meta: PageMeta) -> Self {
        self.pages.insert(NotionId::from(&meta.id), meta);
        self
    }

    pub fn with_database(mut self, database: &DatabaseId, rows: Vec<DatabaseRow>) -> Self {
        self.databases.insert(NotionId::from(database), rows);
        self
    }

    /// Listing `parent` fails `times` times with a rate limit first.
    pub fn flaky(self, parent: &NotionId, times: u32) -> Self {
        self.flaky.lock().insert(parent.clone(), times);
        self
    }

    /// Listing `parent` always fails with a non-retryable error.
    pub fn broken(mut self, parent: &NotionId) -> Self {
        self.broken.push(parent.clone());
        self
    }

    /// Listing `parent` takes `delay` to answer.
    pub fn slow(mut self, parent: &NotionId, delay: Duration) -> Self {
        self.delays.insert(parent.clone(), delay);
        self
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn retrieve_count(&self) -> usize {
        self.retrieve_calls.load(Ordering::SeqCst)
    }

    pub fn peak_concurrency(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.list_count() + self.retrieve_count() + self.page_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl NodeSource for MockWorkspace {
    async fn list_children(
        &self,
        parent: &NotionId,
        cursor: Option<String>,
        _page_size: u32,
    ) -> Result<PaginatedResponse<ContentNode>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.listed.lock().push(parent.clone());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(parent) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.broken.contains(parent) {
            return Err(not_found());
        }
        {
            let mut flaky = self.flaky.lock();
            if let Some(remaining) = flaky.get_mut(parent) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(rate_limited());
                }
            }
        }

        let pages = match self.listings.get(parent) {
            Some(pages) => pages,
            None => return Ok(PaginatedResponse::page(Vec::new(), None)),
        };
        let index = cursor
            .as_deref()
            .map(|c| c.parse::<usize>().unwrap())
            .unwrap_or(0);
        let next_cursor = (index + 1 < pages.len()).then(|| (index + 1).to_string());
        Ok(PaginatedResponse::page(pages[index].clone(), next_cursor))
    }

    async fn retrieve_node(&self, id: &NotionId) -> Result<ContentNode, AppError> {
        self.retrieve_calls.fetch_add(1, Ordering::SeqCst);
        self.nodes.get(id).cloned().ok_or_else(not_found)
    }
}

#[async_trait::async_trait]
impl PageSource for MockWorkspace {
    async fn retrieve_page(&self, id: &PageId) -> Result<PageMeta, AppError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(&NotionId::from(id))
            .cloned()
            .ok_or_else(not_found)
    }
}

#[async_trait::async_trait]
impl DatabaseSource for MockWorkspace {
    async fn query_database(
        &self,
        database: &DatabaseId,
        query: &DatabaseQuery,
        cursor: Option<String>,
        page_size: u32,
    ) -> Result<PaginatedResponse<PageMeta>, AppError> {
        self.queries.lock().push((query.clone(), cursor.clone()));

        let rows = self
            .databases
            .get(&NotionId::from(database))
            .ok_or_else(not_found)?;
        let matching: Vec<PageMeta> = rows
            .iter()
            .filter(|row| row.matches(&query.filter))
            .map(|row| row.meta.clone())
            .collect();

        let start = cursor
            .as_deref()
            .map(|c| c.parse::<usize>().unwrap())
            .unwrap_or(0);
        let end = (start + page_size as usize).min(matching.len());
        let next_cursor = (end < matching.len()).then(|| end.to_string());
        Ok(PaginatedResponse::page(matching[start..end].to_vec(), next_cursor))
    }
}
