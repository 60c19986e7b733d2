// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2markup::{
    discover_database_pages, merge_page_ids, run_sync, AppError, CommandLineInput,
    ConversionSettings, NotionHttpClient, PageConverter, PipelineConfig, SyncSummary,
    LOG_FILE_NAME,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join(LOG_FILE_NAME);
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // Documents may go to stdout, so the console appender writes to stderr.
    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Converts every requested page and reports the outcome.
async fn execute_pipeline(config: &PipelineConfig) -> Result<SyncSummary, AppError> {
    let client = Arc::new(NotionHttpClient::new(&config.api_key, &config.api_base_url)?);
    let settings = ConversionSettings::from(config);

    let pages = match &config.database {
        Some(selection) => {
            let discovered = discover_database_pages(
                client.as_ref(),
                selection,
                &config.state_file,
                &settings.fetch,
            )
            .await?;
            merge_page_ids(&config.pages, discovered)
        }
        None => config.pages.clone(),
    };

    let converter = PageConverter::new(client, settings);
    log::info!("Converting {} page(s) to {}", pages.len(), config.format);
    run_sync(&converter, &pages, &config.state_file).await
}

/// Prints a short summary unless documents went to stdout.
fn report_completion(config: &PipelineConfig, summary: &SyncSummary) {
    if config.stdout {
        return;
    }

    for (_, paths) in &summary.converted {
        for path in paths {
            println!("✓ Saved {}", path.display());
        }
    }
    if !summary.skipped.is_empty() {
        println!("Skipped {} unchanged page(s).", summary.skipped.len());
    }
    for (page_id, error) in &summary.failed {
        eprintln!("✗ {}: {}", page_id, error);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = PipelineConfig::resolve(cli)?;

    let summary = execute_pipeline(&config).await?;
    report_completion(&config, &summary);

    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
