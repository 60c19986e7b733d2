// src/output/paths.rs
//! Pure functions for document file names.
//!
//! A document is stored as `{safe title} {dashed page id}.{ext}` so the
//! page it came from can be recovered from the file name alone.

use crate::error::AppError;
use crate::formatting::OutputFormat;
use crate::types::PageId;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Replaces every character that is not alphanumeric, a space, `-` or `_`.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File name of a page's document.
pub fn document_filename(title: &str, page_id: &PageId, format: OutputFormat) -> String {
    format!(
        "{} {}.{}",
        sanitize_title(title),
        page_id.to_dashed(),
        format.extension()
    )
}

/// Full path of a page's document under `output_dir`.
pub fn document_path(
    output_dir: &Path,
    title: &str,
    page_id: &PageId,
    format: OutputFormat,
) -> PathBuf {
    output_dir.join(document_filename(title, page_id, format))
}

/// Page IDs of the `format` documents already stored in `output_dir`.
///
/// The ID is the last space-separated token of the file stem. Files
/// whose stem does not end in a valid ID are ignored.
pub fn existing_page_ids(
    output_dir: &Path,
    format: OutputFormat,
) -> Result<HashSet<PageId>, AppError> {
    let mut ids = HashSet::new();
    if !output_dir.is_dir() {
        return Ok(ids);
    }

    for entry in fs::read_dir(output_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(format.extension()) {
            continue;
        }
        let stem = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => stem,
            None => continue,
        };
        if let Some(id) = stem
            .rsplit(' ')
            .next()
            .and_then(|token| PageId::parse(token).ok())
        {
            ids.insert(id);
        }
    }

    log::debug!(
        "Found {} existing {} documents in {}",
        ids.len(),
        format,
        output_dir.display()
    );
    Ok(ids)
}
