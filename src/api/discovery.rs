// src/api/discovery.rs
//! Finding the pages of a database that are due for a sync.
//!
//! Two modes exist. Flagged discovery selects pages whose checkbox
//! property is ticked, narrowed to pages edited since the last run once
//! there has been one. Recent discovery selects pages dated within a
//! window of days, plus anything edited since the last run.

use super::pagination::fetch_all_pages;
use super::query::{DatabaseQuery, PageFilter, SortKey};
use super::DatabaseSource;
use crate::error::AppError;
use crate::error_recovery::{retry_with_policy, RetryPolicy};
use crate::model::PageMeta;
use crate::types::DatabaseId;
use chrono::{DateTime, Duration, Utc};

/// A database to discover pages in, as configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSelection {
    pub database: DatabaseId,
    /// Checkbox property of flagged discovery.
    pub sync_property: String,
    /// Date property of recent discovery.
    pub date_property: String,
    /// Select by date window instead of by checkbox.
    pub recent: bool,
    /// Window requested for this run, in days.
    pub days: Option<u32>,
}

/// Which pages of a database are selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryMode {
    Flagged { property: String },
    Recent { property: String, days: u32 },
}

impl DiscoveryMode {
    /// The query selecting this mode's pages as of `now`.
    pub fn query(&self, last_sync: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DatabaseQuery {
        match self {
            DiscoveryMode::Flagged { property } => {
                let checked = PageFilter::Checked {
                    property: property.clone(),
                };
                match last_sync {
                    Some(at) => DatabaseQuery::new(PageFilter::And(vec![
                        checked,
                        PageFilter::EditedAfter(at),
                    ]))
                    .sorted_by(SortKey::LastEditedTime),
                    None => DatabaseQuery::new(checked),
                }
            }
            DiscoveryMode::Recent { property, days } => {
                let dated = PageFilter::DateOnOrAfter {
                    property: property.clone(),
                    since: now - Duration::days(i64::from(*days)),
                };
                let filter = match last_sync {
                    Some(at) => PageFilter::Or(vec![dated, PageFilter::EditedAfter(at)]),
                    None => dated,
                };
                DatabaseQuery::new(filter).sorted_by(SortKey::Property(property.clone()))
            }
        }
    }
}

/// Runs `query` against `database`, draining every page of results.
pub async fn discover_pages(
    source: &dyn DatabaseSource,
    database: &DatabaseId,
    query: &DatabaseQuery,
    page_size: u32,
    retry: RetryPolicy,
) -> Result<Vec<PageMeta>, AppError> {
    let label = database.to_dashed();
    let pages = fetch_all_pages(page_size, |page_size, cursor| {
        let label = &label;
        async move {
            retry_with_policy(retry, label, || {
                source.query_database(database, query, cursor.clone(), page_size)
            })
            .await
            .map_err(AppError::from)
        }
    })
    .await?;

    log::info!("Database {} selected {} page(s)", database, pages.len());
    Ok(pages)
}
