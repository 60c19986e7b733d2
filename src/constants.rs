// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains. Reading
//! them in order tells how a page travels from the API to a file: how
//! many children per request, how often to retry, how many siblings at
//! once, how deep to render, and where the result lands.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many children the Notion API returns per page of results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

/// Default endpoint of the Notion REST API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// API version sent in the `Notion-Version` header.
pub const NOTION_API_VERSION: &str = "2022-06-28";

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Attempts per remote call before the fetch is reported as failed.
pub const FETCH_RETRY_ATTEMPTS: u32 = 3;

/// Base delay between retries. Attempt `n` waits `n` times this long.
pub const FETCH_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Sibling subtrees fetched concurrently when nothing else is configured.
pub const DEFAULT_FETCH_BATCH_SIZE: usize = 8;

/// Lower bound of the configurable batch size.
pub const MIN_FETCH_BATCH_SIZE: usize = 1;

/// Upper bound of the configurable batch size.
///
/// Notion allows about three requests per second per integration; larger
/// batches only trade throughput for 429 responses.
pub const MAX_FETCH_BATCH_SIZE: usize = 10;

/// Pause between consecutive sibling batches.
pub const FETCH_BATCH_PAUSE: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Database discovery
// ---------------------------------------------------------------------------

/// Checkbox property marking database pages that should be synced.
pub const DEFAULT_SYNC_PROPERTY: &str = "Sync";

/// Date property used for date-window discovery.
pub const DEFAULT_DATE_PROPERTY: &str = "Date";

/// Days of dated pages discovered when no window was ever chosen.
pub const DEFAULT_SYNC_DAYS: u32 = 5;

pub const MIN_SYNC_DAYS: u32 = 1;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Spaces per nesting level in Markdown output.
pub const MARKDOWN_INDENT_WIDTH: usize = 4;

/// Maximum nesting depth a renderer descends before giving up on a subtree.
///
/// Real pages rarely nest past a dozen levels; a tree deeper than this
/// is rendered as an error placeholder.
pub const BLOCK_MAX_RENDER_DEPTH: usize = 100;

/// Estimated characters per block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Directory converted pages are written to by default.
pub const DEFAULT_OUTPUT_DIR: &str = "notion-pages";

/// File that remembers when each page was last converted.
pub const DEFAULT_STATE_FILE: &str = "sync_config.json";

/// Log file name, created in the system temp directory.
pub const LOG_FILE_NAME: &str = "notion2markup.log";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
