// src/config.rs
use crate::api::DatabaseSelection;
use crate::constants::{
    DEFAULT_DATE_PROPERTY, DEFAULT_FETCH_BATCH_SIZE, DEFAULT_OUTPUT_DIR, DEFAULT_STATE_FILE,
    DEFAULT_SYNC_PROPERTY, MAX_FETCH_BATCH_SIZE, MIN_FETCH_BATCH_SIZE, NOTION_API_BASE_URL,
};
use crate::error::AppError;
use crate::formatting::OutputFormat;
use crate::types::{ApiKey, BatchSize, DatabaseId, PageId, ValidatedUrl};
use clap::Parser;
use std::path::PathBuf;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Notion page URLs or IDs to convert
    #[arg(required_unless_present = "database")]
    pub pages: Vec<String>,

    /// Database whose pages are discovered and converted
    #[arg(long, env = "NOTION_DATABASE_ID")]
    pub database: Option<String>,

    /// Checkbox property marking database pages to sync
    #[arg(long, default_value = DEFAULT_SYNC_PROPERTY)]
    pub sync_property: String,

    /// Discover database pages dated within the last days instead of flagged ones
    #[arg(long, default_value_t = false, requires = "database")]
    pub recent: bool,

    /// Days of dated pages to discover; remembered for later runs (implies --recent)
    #[arg(long, requires = "database")]
    pub days: Option<u32>,

    /// Date property used by --recent
    #[arg(long, default_value = DEFAULT_DATE_PROPERTY)]
    pub date_property: String,

    /// Output document format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Wrap HTML output in a complete, styled HTML document
    #[arg(long, default_value_t = false)]
    pub standalone: bool,

    /// Directory converted documents are written to
    #[arg(short = 'd', long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: String,

    /// Print documents to stdout instead of writing files
    #[arg(long, default_value_t = false)]
    pub stdout: bool,

    /// Number of sibling blocks fetched concurrently (1-10)
    #[arg(long, default_value_t = DEFAULT_FETCH_BATCH_SIZE)]
    pub batch_size: usize,

    /// Base URL of the Notion API
    #[arg(long, default_value = NOTION_API_BASE_URL)]
    pub api_base_url: String,

    /// File recording when each page was last synced
    #[arg(long, default_value = DEFAULT_STATE_FILE)]
    pub state_file: String,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved pipeline configuration, validated and immutable.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub api_key: ApiKey,
    pub pages: Vec<PageId>,
    pub database: Option<DatabaseSelection>,
    pub format: OutputFormat,
    pub standalone: bool,
    pub output_dir: PathBuf,
    pub stdout: bool,
    pub batch_size: BatchSize,
    pub api_base_url: ValidatedUrl,
    pub state_file: PathBuf,
    pub verbose: bool,
}

impl PipelineConfig {
    /// Resolves a complete pipeline configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let api_key_str = std::env::var("NOTION_API_KEY").map_err(|_| {
            AppError::MissingConfiguration(
                "NOTION_API_KEY environment variable not set".to_string(),
            )
        })?;

        Self::from_parts(cli, &api_key_str)
    }

    /// Validates `cli` against an already obtained API key.
    pub fn from_parts(cli: CommandLineInput, api_key: &str) -> Result<Self, AppError> {
        let api_key = ApiKey::new(api_key)?;

        let pages = cli
            .pages
            .iter()
            .map(|input| PageId::parse(input))
            .collect::<Result<Vec<_>, _>>()?;

        let database = cli
            .database
            .as_deref()
            .map(|input| -> Result<DatabaseSelection, AppError> {
                Ok(DatabaseSelection {
                    database: DatabaseId::parse(input)?,
                    sync_property: cli.sync_property.clone(),
                    date_property: cli.date_property.clone(),
                    recent: cli.recent || cli.days.is_some(),
                    days: cli.days,
                })
            })
            .transpose()?;

        let clamped = cli
            .batch_size
            .clamp(MIN_FETCH_BATCH_SIZE, MAX_FETCH_BATCH_SIZE);
        if clamped != cli.batch_size {
            log::warn!(
                "Batch size {} is out of range, using {}",
                cli.batch_size,
                clamped
            );
        }

        if cli.standalone && cli.format != OutputFormat::Html {
            log::warn!("--standalone only applies to HTML output; ignoring it");
        }

        Ok(PipelineConfig {
            api_key,
            pages,
            database,
            format: cli.format,
            standalone: cli.standalone && cli.format == OutputFormat::Html,
            output_dir: PathBuf::from(cli.output_dir),
            stdout: cli.stdout,
            batch_size: BatchSize::new(clamped)?,
            api_base_url: ValidatedUrl::parse(&cli.api_base_url)?,
            state_file: PathBuf::from(cli.state_file),
            verbose: cli.verbose,
        })
    }
}
