// src/api/pagination.rs
//! Cursor-chained pagination.

use super::responses::PaginatedResponse;
use crate::error::AppError;

/// Requests pages until the source reports no more, accumulating results
/// in source order.
pub async fn fetch_all_pages<T, F, Fut>(page_size: u32, mut fetch_fn: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0u32;

    loop {
        let response = fetch_fn(page_size, cursor).await?;
        pages_fetched += 1;

        all_items.extend(response.results);
        cursor = response.next_cursor;

        if !response.has_more || cursor.is_none() {
            break;
        }
    }

    log::debug!(
        "Drained {} page(s), {} item(s)",
        pages_fetched,
        all_items.len()
    );
    Ok(all_items)
}
