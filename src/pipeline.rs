// src/pipeline.rs
//! Page conversion pipeline: retrieve → compose → deliver.
//!
//! Each stage is a capability trait so it can be exercised in isolation.
//! `PageConverter` implements all three against a `PageSource`, and
//! `run_sync` drives it over a list of pages with the persisted sync state.
//! `discover_database_pages` supplies that list from a database query.

use crate::api::{
    discover_pages, DatabaseSelection, DatabaseSource, DiscoveryMode, FetchOptions, NodeFetcher,
    NodeSource, PageSource,
};
use crate::config::PipelineConfig;
use crate::error::AppError;
use crate::error_recovery::retry_with_policy;
use crate::formatting::{render_html_document, OutputFormat};
use crate::model::{Page, PageMeta};
use crate::output::{
    deliver, document_path, existing_page_ids, DeliveryTarget, OutputPlan, OutputReport,
};
use crate::state::SyncState;
use crate::types::{NotionId, PageId};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Retrieves pages and their fully resolved bodies.
#[async_trait::async_trait]
pub trait PageRetrieval {
    async fn retrieve_meta(&self, id: &PageId) -> Result<PageMeta, AppError>;

    async fn retrieve_body(&self, meta: PageMeta) -> Result<Page, AppError>;
}

/// Turns a page into a finished document.
pub trait DocumentComposer {
    fn compose(&self, page: &Page) -> Result<RenderedDocument, AppError>;
}

/// Delivers a finished document to its destinations.
pub trait DocumentDelivery {
    fn deliver(&self, document: RenderedDocument) -> Result<OutputReport, AppError>;
}

/// A converted page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub page_id: PageId,
    pub title: String,
    pub format: OutputFormat,
    pub content: String,
}

/// How pages are rendered and where documents go.
#[derive(Debug, Clone)]
pub struct ConversionSettings {
    pub format: OutputFormat,
    /// Wrap HTML fragments into full documents.
    pub standalone: bool,
    pub output_dir: PathBuf,
    pub to_stdout: bool,
    pub fetch: FetchOptions,
}

impl From<&PipelineConfig> for ConversionSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            format: config.format,
            standalone: config.standalone,
            output_dir: config.output_dir.clone(),
            to_stdout: config.stdout,
            fetch: FetchOptions {
                batch_size: config.batch_size,
                ..FetchOptions::default()
            },
        }
    }
}

/// Converts single pages end to end.
pub struct PageConverter {
    pages: Arc<dyn PageSource>,
    fetcher: NodeFetcher,
    settings: ConversionSettings,
}

impl PageConverter {
    pub fn new<S>(source: Arc<S>, settings: ConversionSettings) -> Self
    where
        S: PageSource + 'static,
    {
        let nodes: Arc<dyn NodeSource> = source.clone();
        Self {
            pages: source,
            fetcher: NodeFetcher::new(nodes, settings.fetch),
            settings,
        }
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Where `page`'s document is written.
    pub fn output_path(&self, title: &str, page_id: &PageId) -> PathBuf {
        document_path(&self.settings.output_dir, title, page_id, self.settings.format)
    }

    /// Retrieves, renders and delivers one page.
    pub async fn convert(&self, meta: PageMeta) -> Result<OutputReport, AppError> {
        let page = self.retrieve_body(meta).await?;
        let document = self.compose(&page)?;
        let report = DocumentDelivery::deliver(self, document)?;

        if !report.is_success() {
            return Err(AppError::DeliveryFailed {
                failures: report.failed.iter().map(|f| f.error.clone()).collect(),
            });
        }
        Ok(report)
    }
}

#[async_trait::async_trait]
impl PageRetrieval for PageConverter {
    async fn retrieve_meta(&self, id: &PageId) -> Result<PageMeta, AppError> {
        let source = &self.pages;
        let meta = retry_with_policy(self.settings.fetch.retry, &id.to_dashed(), || {
            source.retrieve_page(id)
        })
        .await?;
        Ok(meta)
    }

    async fn retrieve_body(&self, meta: PageMeta) -> Result<Page, AppError> {
        // Every page starts from an empty cache; nodes never leak between pages.
        self.fetcher.clear_cache();

        let root = NotionId::from(&meta.id);
        let body = self.fetcher.fetch_children(&root).await?;
        log::info!(
            "Fetched {} blocks for page {}",
            body.iter().map(|node| node.subtree_size()).sum::<usize>(),
            meta.id
        );
        if !body.iter().all(|node| node.is_complete()) {
            log::warn!("Page {} is missing some nested content", meta.id);
        }
        Ok(Page::new(meta, body))
    }
}

impl DocumentComposer for PageConverter {
    fn compose(&self, page: &Page) -> Result<RenderedDocument, AppError> {
        let title = page.display_title();
        let body = self.settings.format.assemble(&page.body);
        let content = if self.settings.standalone && self.settings.format == OutputFormat::Html {
            render_html_document(&title, &body)?
        } else {
            body
        };

        Ok(RenderedDocument {
            page_id: page.id().clone(),
            title,
            format: self.settings.format,
            content,
        })
    }
}

impl DocumentDelivery for PageConverter {
    fn deliver(&self, document: RenderedDocument) -> Result<OutputReport, AppError> {
        let target = if self.settings.to_stdout {
            DeliveryTarget::PrintToStdout {
                content: document.content,
            }
        } else {
            DeliveryTarget::WriteFile {
                path: self.output_path(&document.title, &document.page_id),
                content: document.content,
            }
        };

        deliver(OutputPlan::new().with_operation(target))
    }
}

/// Outcome of a sync run.
#[derive(Debug, Default)]
pub struct SyncSummary {
    /// Pages converted, with the files written for each.
    pub converted: Vec<(PageId, Vec<PathBuf>)>,
    /// Pages whose document is up to date.
    pub skipped: Vec<PageId>,
    pub failed: Vec<(PageId, String)>,
}

impl SyncSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Converts `pages` one after another, skipping unchanged pages.
///
/// A failing page is logged and recorded in the summary; the run goes
/// on. The sync state is saved once all pages were attempted.
pub async fn run_sync(
    converter: &PageConverter,
    pages: &[PageId],
    state_file: &Path,
) -> Result<SyncSummary, AppError> {
    let mut state = SyncState::load(state_file)?;
    let settings = converter.settings();
    let existing = if settings.to_stdout {
        Default::default()
    } else {
        existing_page_ids(&settings.output_dir, settings.format)?
    };

    let mut summary = SyncSummary::default();
    for (index, page_id) in pages.iter().enumerate() {
        log::info!("[{}/{}] Processing page {}", index + 1, pages.len(), page_id);

        let meta = match converter.retrieve_meta(page_id).await {
            Ok(meta) => meta,
            Err(e) => {
                log::error!("Error processing page {}: {}", page_id, e);
                summary.failed.push((page_id.clone(), e.to_string()));
                continue;
            }
        };

        let has_output = existing.contains(page_id);
        if !settings.to_stdout && !state.needs_sync(&meta, has_output) {
            log::info!("Page {} is up to date, skipping", page_id);
            summary.skipped.push(page_id.clone());
            continue;
        }

        match converter.convert(meta).await {
            Ok(report) => {
                state.record(page_id, Utc::now());
                let written = report.written_paths().into_iter().cloned().collect();
                summary.converted.push((page_id.clone(), written));
            }
            Err(e) => {
                log::error!("Error processing page {}: {}", page_id, e);
                summary.failed.push((page_id.clone(), e.to_string()));
            }
        }
    }

    state.mark_synced(Utc::now());
    state.save(state_file)?;

    log::info!(
        "Sync finished: {} converted, {} skipped, {} failed",
        summary.converted.len(),
        summary.skipped.len(),
        summary.failed.len()
    );
    Ok(summary)
}

/// Queries `selection`'s database for the pages due this run.
///
/// Recent discovery uses the requested window, or the one remembered in
/// the state file; a requested window is saved for later runs.
pub async fn discover_database_pages(
    source: &dyn DatabaseSource,
    selection: &DatabaseSelection,
    state_file: &Path,
    fetch: &FetchOptions,
) -> Result<Vec<PageId>, AppError> {
    let mut state = SyncState::load(state_file)?;
    let mode = if selection.recent {
        let days = state.window_days(selection.days);
        if selection.days.is_some() {
            state.save(state_file)?;
        }
        DiscoveryMode::Recent {
            property: selection.date_property.clone(),
            days,
        }
    } else {
        DiscoveryMode::Flagged {
            property: selection.sync_property.clone(),
        }
    };
    log::info!("Discovering pages in {} ({:?})", selection.database, mode);

    let query = mode.query(state.last_sync, Utc::now());
    let pages = discover_pages(
        source,
        &selection.database,
        &query,
        fetch.page_size,
        fetch.retry,
    )
    .await?;
    Ok(pages.into_iter().map(|meta| meta.id).collect())
}

/// `explicit` pages followed by the discovered ones not already listed.
pub fn merge_page_ids(explicit: &[PageId], discovered: Vec<PageId>) -> Vec<PageId> {
    let mut pages = explicit.to_vec();
    for id in discovered {
        if !pages.contains(&id) {
            pages.push(id);
        }
    }
    pages
}
