// tests/pipeline.rs
//! End-to-end conversion runs against an in-memory workspace.

mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::*;
use notion2markup::{
    run_sync, BatchSize, ConversionSettings, DocumentComposer, FetchOptions, NodeKind,
    OutputFormat, PageConverter, PageMeta, PageRetrieval, RetryPolicy, SyncState,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn edited_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
}

fn meta(n: u32, title: &str) -> PageMeta {
    PageMeta {
        id: page_id(n),
        title: Some(title.to_string()),
        url: format!("https://www.notion.so/{:032x}", n),
        last_edited_time: Some(edited_at()),
    }
}

fn workspace() -> MockWorkspace {
    MockWorkspace::new()
        .with_page(meta(1, "Roadmap"))
        .with_children(
            &notion_id(1),
            vec![
                node(2, NodeKind::Heading1(text("Goals"))),
                paragraph(3, "Ship it."),
                bullet(4, "fast"),
            ],
        )
}

fn settings(output_dir: &Path, format: OutputFormat) -> ConversionSettings {
    ConversionSettings {
        format,
        standalone: false,
        output_dir: output_dir.to_path_buf(),
        to_stdout: false,
        fetch: FetchOptions {
            page_size: 100,
            batch_size: BatchSize::new(4).unwrap(),
            batch_pause: Duration::ZERO,
            retry: RetryPolicy::immediate(2),
        },
    }
}

#[tokio::test]
async fn converted_page_lands_in_titled_file() {
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("state.json");
    let converter = PageConverter::new(
        Arc::new(workspace()),
        settings(&dir.path().join("out"), OutputFormat::Markdown),
    );

    let summary = run_sync(&converter, &[page_id(1)], &state_file)
        .await
        .unwrap();

    assert!(summary.is_success());
    let expected = dir
        .path()
        .join("out")
        .join("Roadmap 00000000-0000-0000-0000-000000000001.md");
    assert_eq!(summary.converted, vec![(page_id(1), vec![expected.clone()])]);
    assert_eq!(
        fs::read_to_string(&expected).unwrap(),
        "# Goals\n\nShip it.\n\n- fast\n"
    );
}

#[tokio::test]
async fn unchanged_page_is_skipped_on_the_next_run() {
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("state.json");
    let workspace = Arc::new(workspace());
    let converter = PageConverter::new(workspace.clone(), settings(dir.path(), OutputFormat::Markdown));

    run_sync(&converter, &[page_id(1)], &state_file)
        .await
        .unwrap();
    let listings_after_first = workspace.list_count();

    let second = run_sync(&converter, &[page_id(1)], &state_file)
        .await
        .unwrap();

    assert_eq!(second.skipped, vec![page_id(1)]);
    assert!(second.converted.is_empty());
    assert_eq!(workspace.list_count(), listings_after_first);
}

#[tokio::test]
async fn deleted_output_forces_reconversion() {
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("state.json");
    let converter = PageConverter::new(
        Arc::new(workspace()),
        settings(dir.path(), OutputFormat::Markdown),
    );

    let first = run_sync(&converter, &[page_id(1)], &state_file)
        .await
        .unwrap();
    fs::remove_file(&first.converted[0].1[0]).unwrap();

    let second = run_sync(&converter, &[page_id(1)], &state_file)
        .await
        .unwrap();
    assert_eq!(second.converted.len(), 1);
    assert!(second.skipped.is_empty());
}

#[tokio::test]
async fn page_edited_after_last_sync_is_converted_again() {
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("state.json");
    let converter = PageConverter::new(
        Arc::new(workspace()),
        settings(dir.path(), OutputFormat::Markdown),
    );
    run_sync(&converter, &[page_id(1)], &state_file)
        .await
        .unwrap();

    let mut state = SyncState::load(&state_file).unwrap();
    state.record(&page_id(1), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    state.save(&state_file).unwrap();

    let summary = run_sync(&converter, &[page_id(1)], &state_file)
        .await
        .unwrap();
    assert_eq!(summary.converted.len(), 1);
}

#[tokio::test]
async fn failing_page_does_not_stop_the_run() {
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("state.json");
    let converter = PageConverter::new(
        Arc::new(workspace()),
        settings(dir.path(), OutputFormat::Markdown),
    );

    let summary = run_sync(&converter, &[page_id(9), page_id(1)], &state_file)
        .await
        .unwrap();

    assert!(!summary.is_success());
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, page_id(9));
    assert_eq!(summary.converted.len(), 1);
    assert_eq!(summary.converted[0].0, page_id(1));
}

#[tokio::test]
async fn sync_state_is_saved_after_the_run() {
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("nested").join("state.json");
    let converter = PageConverter::new(
        Arc::new(workspace()),
        settings(dir.path(), OutputFormat::Markdown),
    );

    run_sync(&converter, &[page_id(1), page_id(9)], &state_file)
        .await
        .unwrap();

    let state = SyncState::load(&state_file).unwrap();
    assert!(state.last_sync.is_some());
    assert!(state.last_synced(&page_id(1)).unwrap() > edited_at());
    assert_eq!(state.pages.len(), 1);
}

#[tokio::test]
async fn standalone_html_is_a_full_document() {
    let dir = TempDir::new().unwrap();
    let mut settings = settings(dir.path(), OutputFormat::Html);
    settings.standalone = true;
    let converter = PageConverter::new(Arc::new(workspace()), settings);

    let summary = run_sync(&converter, &[page_id(1)], &dir.path().join("state.json"))
        .await
        .unwrap();

    let path = &summary.converted[0].1[0];
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("html"));
    let document = fs::read_to_string(path).unwrap();
    assert!(document.starts_with("<!DOCTYPE html>"));
    assert!(document.contains("<title>Roadmap</title>"));
    assert!(document.contains("<h1>Goals</h1>\n<p>Ship it.</p>\n<ul>\n<li>fast</li>\n</ul>"));
}

#[tokio::test]
async fn compose_without_title_uses_first_heading() {
    let dir = TempDir::new().unwrap();
    let mut untitled = meta(1, "");
    untitled.title = None;
    let workspace = MockWorkspace::new()
        .with_page(untitled)
        .with_children(&notion_id(1), vec![node(2, NodeKind::Heading2(text("Fallback")))]);
    let converter = PageConverter::new(
        Arc::new(workspace),
        settings(dir.path(), OutputFormat::Html),
    );

    let meta = converter.retrieve_meta(&page_id(1)).await.unwrap();
    let page = converter.retrieve_body(meta).await.unwrap();
    let document = converter.compose(&page).unwrap();

    assert_eq!(document.title, "Fallback");
    assert_eq!(document.content, "<h2>Fallback</h2>\n");
}

#[tokio::test]
async fn page_with_broken_nested_subtree_is_still_written() {
    let dir = TempDir::new().unwrap();
    let workspace = MockWorkspace::new()
        .with_page(meta(1, "Roadmap"))
        .with_children(&notion_id(1), vec![paragraph(2, "intro"), bullet(10, "broken").declaring_children()])
        .broken(&notion_id(10));
    let converter = PageConverter::new(
        Arc::new(workspace),
        settings(dir.path(), OutputFormat::Markdown),
    );

    let summary = run_sync(&converter, &[page_id(1)], &dir.path().join("state.json"))
        .await
        .unwrap();

    assert!(summary.is_success());
    let markdown = fs::read_to_string(&summary.converted[0].1[0]).unwrap();
    assert!(markdown.starts_with("intro\n\n- broken\n"));
    assert!(markdown.contains(
        "    *[Error processing bulleted_list_item block: children unavailable: Failed to fetch"
    ));
}
