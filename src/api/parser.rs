// src/api/parser.rs
//! Response parsing on top of notion-client's serde types.

use super::client::ApiResponse;
use super::responses::{
    NotionBlock, NotionError, NotionPage, PaginatedResponse, RetrieveBlockChildrenResponse,
    ToDomain,
};
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionClientError, NotionErrorCode};
use crate::model::{ContentNode, PageMeta};
use reqwest::StatusCode;

/// Parse any Notion API response using notion-client types
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_with_notion_client(&result.data, &result.url)
    } else {
        Err(parse_error_body(&result.data, result.status, &result.url))
    }
}

/// Parse successful response using notion-client's parsing
fn parse_with_notion_client<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        NotionClientError::Deserialization {
            source: e,
            body: preview(body),
        }
        .into()
    })
}

/// Turns an error body into the most specific error available.
fn parse_error_body(body: &str, status: StatusCode, url: &str) -> AppError {
    if let Ok(notion_error) = serde_json::from_str::<NotionError>(body) {
        return NotionClientError::NotionApi {
            status: notion_error.status,
            code: notion_error.code,
            message: notion_error.message,
            request_id: notion_error.request_id,
        }
        .into();
    }

    // Fallback to generic error with HTTP status code
    AppError::NotionService {
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}: {}", status, url, preview(body)),
        status,
    }
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(ERROR_BODY_PREVIEW_LENGTH) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Parse a single block
pub fn parse_block_response(result: ApiResponse<String>) -> Result<ContentNode, AppError> {
    let notion_block: NotionBlock = parse_api_response(result)?;
    notion_block.to_domain()
}

/// Parse page metadata
pub fn parse_page_response(result: ApiResponse<String>) -> Result<PageMeta, AppError> {
    let notion_page: NotionPage = parse_api_response(result)?;
    notion_page.to_domain()
}

/// Parse one page of a children listing
pub fn parse_children_response(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<ContentNode>, AppError> {
    let response: RetrieveBlockChildrenResponse = parse_api_response(result)?;
    response.try_map(ToDomain::to_domain)
}

/// Parse one page of database query results
pub fn parse_query_response(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<PageMeta>, AppError> {
    let response: PaginatedResponse<NotionPage> = parse_api_response(result)?;
    response.try_map(ToDomain::to_domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            url: "https://api.notion.com/v1/blocks/x".to_string(),
        }
    }

    #[test]
    fn test_error_parsing_with_notion_client() {
        let error_json = r#"{
            "object": "error",
            "status": 404,
            "code": "object_not_found",
            "message": "Could not find block with ID: abc123",
            "request_id": "req_123"
        }"#;

        let result = parse_block_response(response(404, error_json));

        match result {
            Err(AppError::NotionClient(NotionClientError::NotionApi { code, status, .. })) => {
                assert_eq!(code, "object_not_found");
                assert_eq!(status, 404);
            }
            other => panic!("Expected NotionClientError::NotionApi, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_error_keeps_http_status() {
        let result = parse_block_response(response(502, "<html>Bad gateway</html>"));

        match result {
            Err(err @ AppError::NotionService { .. }) => assert!(err.is_retryable()),
            other => panic!("Expected NotionService error, got {:?}", other),
        }
    }

    #[test]
    fn failed_query_reports_the_api_error() {
        let error_json = r#"{
            "object": "error",
            "status": 400,
            "code": "validation_error",
            "message": "Could not find property with name or id: Sync",
            "request_id": "req_456"
        }"#;

        match parse_query_response(response(400, error_json)) {
            Err(AppError::NotionClient(NotionClientError::NotionApi { code, .. })) => {
                assert_eq!(code, "validation_error");
            }
            other => panic!("Expected NotionClientError::NotionApi, got {:?}", other),
        }
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(ERROR_BODY_PREVIEW_LENGTH + 50);
        let shown = preview(&body);
        assert_eq!(shown.len(), ERROR_BODY_PREVIEW_LENGTH + 3);
        assert!(shown.ends_with("..."));
    }
}
