// src/state.rs
//! Persistent record of what has been synced, and when.
//!
//! The state file is JSON: `{"last_sync": <rfc3339>, "pages": {<id>: <rfc3339>}}`.
//! Older files hold nothing but the bare timestamp of the last run; those
//! load as `last_sync` with no per-page entries. `sync_days` remembers the
//! window last used for date-based database discovery.

use crate::constants::{DEFAULT_SYNC_DAYS, MIN_SYNC_DAYS};
use crate::error::AppError;
use crate::model::PageMeta;
use crate::types::PageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Sync timestamps: one for the whole run, one per page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    pub last_sync: Option<DateTime<Utc>>,
    /// Keyed by the undashed page ID.
    #[serde(default)]
    pub pages: BTreeMap<String, DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_days: Option<u32>,
}

impl SyncState {
    /// Reads the state file; a missing or empty file is a fresh state.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            log::debug!("No sync state at {}, starting fresh", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let content = content.trim();
        if content.is_empty() {
            return Ok(Self::default());
        }

        match serde_json::from_str::<SyncState>(content) {
            Ok(state) => Ok(state),
            Err(source) => match parse_legacy_timestamp(content) {
                Some(last_sync) => {
                    log::info!("Upgrading legacy sync state in {}", path.display());
                    Ok(Self {
                        last_sync: Some(last_sync),
                        ..Self::default()
                    })
                }
                None => Err(AppError::JsonParseError {
                    path: path.to_path_buf(),
                    source,
                }),
            },
        }
    }

    /// Writes the state as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::debug!("Saved sync state to {}", path.display());
        Ok(())
    }

    pub fn record(&mut self, page_id: &PageId, at: DateTime<Utc>) {
        self.pages.insert(page_id.as_str().to_string(), at);
    }

    pub fn mark_synced(&mut self, at: DateTime<Utc>) {
        self.last_sync = Some(at);
    }

    /// Days of dated pages to discover: `requested` when given, else the
    /// remembered window, else the default. A requested window is remembered.
    pub fn window_days(&mut self, requested: Option<u32>) -> u32 {
        let days = requested
            .or(self.sync_days)
            .unwrap_or(DEFAULT_SYNC_DAYS)
            .max(MIN_SYNC_DAYS);
        if requested.is_some() {
            self.sync_days = Some(days);
        }
        days
    }

    /// When `page_id` was last synced, falling back to the last run.
    pub fn last_synced(&self, page_id: &PageId) -> Option<DateTime<Utc>> {
        self.pages.get(page_id.as_str()).copied().or(self.last_sync)
    }

    /// Whether a page has to be converted again.
    ///
    /// Pages without an output file always sync. Otherwise a page syncs
    /// when it was edited after its last sync, or was never synced.
    pub fn needs_sync(&self, meta: &PageMeta, output_exists: bool) -> bool {
        if !output_exists {
            return true;
        }
        match (self.last_synced(&meta.id), meta.last_edited_time) {
            (None, _) => true,
            (Some(synced), Some(edited)) => edited > synced,
            (Some(_), None) => false,
        }
    }
}

fn parse_legacy_timestamp(content: &str) -> Option<DateTime<Utc>> {
    let unquoted = content.trim_matches('"');
    DateTime::parse_from_rfc3339(unquoted)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
