// src/api/client.rs
//! Pure HTTP client wrapper for the Notion API.
//!
//! Handles authentication and request plumbing; parsing lives in
//! `parser`, conversion to the domain model in `notion_client_adapter`.

use super::parser;
use super::responses::PaginatedResponse;
use super::query::DatabaseQuery;
use super::{DatabaseSource, NodeSource, PageSource};
use crate::constants::NOTION_API_VERSION;
use crate::error::AppError;
use crate::model::{ContentNode, PageMeta};
use crate::types::{ApiKey, DatabaseId, NotionId, PageId, ValidatedUrl};
use reqwest::{header, Client, Response};

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey, base_url: &ValidatedUrl) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.as_base().to_string(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a GET request to `endpoint` (a path relative to the base URL).
    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {} {:?}", url, query);
        Ok(self.client.get(url).query(query).send().await?)
    }

    /// Makes a POST request with a JSON body to `endpoint`.
    pub async fn post(&self, endpoint: &str, body: &serde_json::Value) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {} {}", url, body);
        Ok(self.client.post(url).json(body).send().await?)
    }
}

#[async_trait::async_trait]
impl NodeSource for NotionHttpClient {
    async fn list_children(
        &self,
        parent: &NotionId,
        cursor: Option<String>,
        page_size: u32,
    ) -> Result<PaginatedResponse<ContentNode>, AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_hyphenated());
        let mut query = vec![("page_size", page_size.to_string())];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor));
        }

        let response = self.get(&endpoint, &query).await?;
        let result = extract_response_text(response).await?;
        parser::parse_children_response(result)
    }

    async fn retrieve_node(&self, id: &NotionId) -> Result<ContentNode, AppError> {
        let endpoint = format!("blocks/{}", id.to_hyphenated());
        let response = self.get(&endpoint, &[]).await?;
        let result = extract_response_text(response).await?;
        parser::parse_block_response(result)
    }
}

#[async_trait::async_trait]
impl PageSource for NotionHttpClient {
    async fn retrieve_page(&self, id: &PageId) -> Result<PageMeta, AppError> {
        let endpoint = format!("pages/{}", id.to_dashed());
        let response = self.get(&endpoint, &[]).await?;
        let result = extract_response_text(response).await?;
        parser::parse_page_response(result)
    }
}

#[async_trait::async_trait]
impl DatabaseSource for NotionHttpClient {
    async fn query_database(
        &self,
        database: &DatabaseId,
        query: &DatabaseQuery,
        cursor: Option<String>,
        page_size: u32,
    ) -> Result<PaginatedResponse<PageMeta>, AppError> {
        let endpoint = format!("databases/{}/query", database.to_dashed());
        let body = query.request_body(cursor.as_deref(), page_size);

        let response = self.post(&endpoint, &body).await?;
        let result = extract_response_text(response).await?;
        parser::parse_query_response(result)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text along with status and URL metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
