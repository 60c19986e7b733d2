// src/api/fetcher.rs
//! Recursive materialization of content trees.
//!
//! The fetcher drains every children listing, replaces synced-block
//! aliases with the nodes they point to, and recurses into any node that
//! declares children. Siblings are resolved concurrently in bounded
//! batches; results are collected per batch in listing order, so the
//! finished tree never depends on completion order.
//!
//! A fetch failure below the root only costs the affected node its
//! subtree: the node is kept with `fetch_error` set and its siblings
//! resolve normally. Only failures of the root listing, and synced-block
//! cycles, fail the whole fetch.

use super::cache::NodeCache;
use super::pagination::fetch_all_pages;
use super::types::FetchContext;
use super::NodeSource;
use crate::constants::{FETCH_BATCH_PAUSE, NOTION_API_PAGE_SIZE};
use crate::error::{AppError, Result};
use crate::error_recovery::{retry_with_policy, RetryPolicy};
use crate::model::ContentNode;
use crate::types::{BatchSize, NotionId};
use futures::future::{join_all, BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;

/// Tunables for one fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Children requested per listing call.
    pub page_size: u32,
    /// Sibling subtrees resolved concurrently.
    pub batch_size: BatchSize,
    /// Pause between consecutive sibling batches.
    pub batch_pause: Duration,
    pub retry: RetryPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: NOTION_API_PAGE_SIZE,
            batch_size: BatchSize::default(),
            batch_pause: FETCH_BATCH_PAUSE,
            retry: RetryPolicy::default(),
        }
    }
}

/// Resolves remote content into fully materialized `ContentNode` trees.
pub struct NodeFetcher {
    source: Arc<dyn NodeSource>,
    cache: NodeCache,
    options: FetchOptions,
}

impl NodeFetcher {
    pub fn new(source: Arc<dyn NodeSource>, options: FetchOptions) -> Self {
        Self {
            source,
            cache: NodeCache::new(),
            options,
        }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    pub fn cache(&self) -> &NodeCache {
        &self.cache
    }

    /// Drops every cached subtree. Call between unrelated conversions.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Retrieves the node `id` and resolves all of its descendants.
    ///
    /// A cached subtree is returned unchanged without any remote call.
    pub async fn fetch_tree(&self, id: &NotionId) -> Result<ContentNode> {
        if let Some(hit) = self.cache.tree(id) {
            log::debug!("Cache hit for subtree {}", id.as_str());
            return Ok(hit);
        }
        let node = self.retrieve_node(id).await?;
        self.resolve(node, FetchContext::new()).await
    }

    /// Resolves the children of `parent`, e.g. the body of a page.
    pub async fn fetch_children(&self, parent: &NotionId) -> Result<Vec<ContentNode>> {
        let ctx = FetchContext::new().with_visited(parent.clone());
        self.resolve_children(parent, ctx).await
    }

    fn resolve(&self, node: ContentNode, ctx: FetchContext) -> BoxFuture<'_, Result<ContentNode>> {
        async move {
            let id = NotionId::from(&node.id);
            if let Some(hit) = self.cache.tree(&id) {
                return Ok(hit);
            }
            ctx.ensure_unvisited(&id)?;
            let ctx = ctx.with_visited(id.clone());

            let resolved = match node.synced_target().map(NotionId::from) {
                Some(target) => {
                    ctx.ensure_unvisited(&target)?;
                    log::debug!(
                        "Following synced block {} -> {}",
                        id.as_str(),
                        target.as_str()
                    );
                    match self.retrieve_node(&target).await {
                        Ok(original) => self.resolve(original, ctx).await?,
                        Err(e) => keep_unresolved(node, e)?,
                    }
                }
                None if node.has_children => match self.resolve_children(&id, ctx).await {
                    Ok(children) => node.with_children(children),
                    Err(e) => keep_unresolved(node, e)?,
                },
                None => node,
            };

            if resolved.is_complete() {
                self.cache.store_tree(id, resolved.clone());
            }
            Ok(resolved)
        }
        .boxed()
    }

    async fn resolve_children(
        &self,
        parent: &NotionId,
        ctx: FetchContext,
    ) -> Result<Vec<ContentNode>> {
        if let Some(hit) = self.cache.children(parent) {
            log::debug!("Cache hit for children of {}", parent.as_str());
            return Ok(hit);
        }

        let listed = self.list_children(parent).await?;
        log::debug!(
            "Resolving {} children of {} (depth {})",
            listed.len(),
            parent.as_str(),
            ctx.depth()
        );

        let batch_size = self.options.batch_size.get();
        let mut resolved = Vec::with_capacity(listed.len());
        let mut pending = listed.into_iter().peekable();
        let mut first_batch = true;

        while pending.peek().is_some() {
            if !first_batch && !self.options.batch_pause.is_zero() {
                tokio::time::sleep(self.options.batch_pause).await;
            }
            first_batch = false;

            let batch: Vec<_> = pending
                .by_ref()
                .take(batch_size)
                .map(|child| self.resolve(child, ctx.clone()))
                .collect();

            // The whole batch settles before an error propagates, so
            // finished siblings stay cached for a later attempt.
            for outcome in join_all(batch).await {
                resolved.push(outcome?);
            }
        }

        if resolved.iter().all(ContentNode::is_complete) {
            self.cache.store_children(parent.clone(), resolved.clone());
        }
        Ok(resolved)
    }

    async fn list_children(&self, parent: &NotionId) -> Result<Vec<ContentNode>> {
        let policy = self.options.retry;
        let label = parent.to_hyphenated();

        fetch_all_pages(self.options.page_size, |page_size, cursor| {
            let label = &label;
            async move {
                retry_with_policy(policy, label, || {
                    self.source.list_children(parent, cursor.clone(), page_size)
                })
                .await
                .map_err(AppError::from)
            }
        })
        .await
    }

    async fn retrieve_node(&self, id: &NotionId) -> Result<ContentNode> {
        retry_with_policy(self.options.retry, &id.to_hyphenated(), || {
            self.source.retrieve_node(id)
        })
        .await
        .map_err(AppError::from)
    }
}

/// Keeps `node` without the subtree that failed to fetch. Anything other
/// than an exhausted fetch, such as a synced-block cycle, still fails.
fn keep_unresolved(node: ContentNode, error: AppError) -> Result<ContentNode> {
    match error {
        AppError::Fetch(fetch) => {
            log::warn!(
                "Keeping {} block {} without its children: {}",
                node.type_name(),
                node.id,
                fetch
            );
            Ok(node.with_fetch_error(fetch.to_string()))
        }
        other => Err(other),
    }
}
