// tests/discovery.rs
//! Selecting pages to sync from a database.

mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::*;
use notion2markup::{
    discover_database_pages, discover_pages, merge_page_ids, DatabaseId, DatabaseSelection,
    DiscoveryMode, FetchOptions, PageFilter, PageMeta, RetryPolicy, SyncState, DEFAULT_SYNC_DAYS,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn database() -> DatabaseId {
    DatabaseId::parse("dbdbdbdbdbdbdbdbdbdbdbdbdbdbdbdb").unwrap()
}

fn edited(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
}

fn row(n: u32, flagged: bool, edited_on: u32, date: Option<DateTime<Utc>>) -> DatabaseRow {
    DatabaseRow {
        meta: PageMeta {
            id: page_id(n),
            title: Some(format!("Entry {}", n)),
            url: format!("https://www.notion.so/{:032x}", n),
            last_edited_time: Some(edited(edited_on)),
        },
        flagged,
        date,
    }
}

fn options(page_size: u32) -> FetchOptions {
    FetchOptions {
        page_size,
        retry: RetryPolicy::immediate(2),
        ..FetchOptions::default()
    }
}

fn selection(recent: bool, days: Option<u32>) -> DatabaseSelection {
    DatabaseSelection {
        database: database(),
        sync_property: "Sync".to_string(),
        date_property: "Date".to_string(),
        recent,
        days,
    }
}

#[tokio::test]
async fn flagged_pages_are_drained_across_result_pages() {
    let rows = (1..=5).map(|n| row(n, n != 3, 1, None)).collect();
    let workspace = MockWorkspace::new().with_database(&database(), rows);
    let query = DiscoveryMode::Flagged {
        property: "Sync".to_string(),
    }
    .query(None, Utc::now());

    let pages = discover_pages(&workspace, &database(), &query, 2, RetryPolicy::immediate(1))
        .await
        .unwrap();

    assert_eq!(
        pages.into_iter().map(|meta| meta.id).collect::<Vec<_>>(),
        vec![page_id(1), page_id(2), page_id(4), page_id(5)]
    );
    let cursors: Vec<Option<String>> = workspace
        .queries
        .lock()
        .iter()
        .map(|(_, cursor)| cursor.clone())
        .collect();
    assert_eq!(cursors, vec![None, Some("2".to_string())]);
}

#[tokio::test]
async fn flagged_discovery_after_a_run_only_finds_edited_pages() {
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("state.json");
    let mut state = SyncState::default();
    state.mark_synced(edited(10));
    state.save(&state_file).unwrap();

    let workspace = MockWorkspace::new().with_database(
        &database(),
        vec![row(1, true, 9, None), row(2, true, 11, None), row(3, false, 12, None)],
    );

    let found = discover_database_pages(
        &workspace,
        &selection(false, None),
        &state_file,
        &options(100),
    )
    .await
    .unwrap();

    assert_eq!(found, vec![page_id(2)]);
    let queries = workspace.queries.lock();
    assert_eq!(
        queries[0].0.filter,
        PageFilter::And(vec![
            PageFilter::Checked {
                property: "Sync".to_string()
            },
            PageFilter::EditedAfter(edited(10)),
        ])
    );
}

#[tokio::test]
async fn recent_discovery_remembers_the_requested_window() {
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("state.json");
    let now = Utc::now();
    let workspace = MockWorkspace::new().with_database(
        &database(),
        vec![
            row(1, false, 1, Some(now - Duration::days(2))),
            row(2, false, 1, Some(now - Duration::days(20))),
            row(3, false, 1, None),
        ],
    );

    let found = discover_database_pages(
        &workspace,
        &selection(true, Some(7)),
        &state_file,
        &options(100),
    )
    .await
    .unwrap();

    assert_eq!(found, vec![page_id(1)]);
    assert_eq!(SyncState::load(&state_file).unwrap().sync_days, Some(7));

    let again = discover_database_pages(
        &workspace,
        &selection(true, None),
        &state_file,
        &options(100),
    )
    .await
    .unwrap();
    assert_eq!(again, vec![page_id(1)]);
    match &workspace.queries.lock()[1].0.filter {
        PageFilter::DateOnOrAfter { since, .. } => {
            let window = Utc::now() - *since;
            assert!(window >= Duration::days(7) && window < Duration::days(8));
        }
        other => panic!("Expected a date filter, got {:?}", other),
    };
}

#[tokio::test]
async fn recent_discovery_without_a_window_uses_the_default() {
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("state.json");
    let workspace = MockWorkspace::new().with_database(&database(), Vec::new());

    let found = discover_database_pages(
        &workspace,
        &selection(true, None),
        &state_file,
        &options(100),
    )
    .await
    .unwrap();

    assert!(found.is_empty());
    assert!(!state_file.exists());
    match &workspace.queries.lock()[0].0.filter {
        PageFilter::DateOnOrAfter { since, .. } => {
            let window = Utc::now() - *since;
            assert!(window >= Duration::days(i64::from(DEFAULT_SYNC_DAYS)));
        }
        other => panic!("Expected a date filter, got {:?}", other),
    };
}

#[tokio::test]
async fn unknown_database_fails_discovery() {
    let dir = TempDir::new().unwrap();
    let workspace = MockWorkspace::new();

    let result = discover_database_pages(
        &workspace,
        &selection(false, None),
        &dir.path().join("state.json"),
        &options(100),
    )
    .await;

    assert!(result.is_err());
}

#[test]
fn explicit_pages_come_first_without_duplicates() {
    let merged = merge_page_ids(&[page_id(2), page_id(1)], vec![page_id(1), page_id(3)]);
    assert_eq!(merged, vec![page_id(2), page_id(1), page_id(3)]);
}
