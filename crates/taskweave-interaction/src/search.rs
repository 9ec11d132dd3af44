//! Tavily web search client.
//!
//! Sends search requests and extracts the hits the research capability feeds
//! into its synthesis step.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, parse_retry_after};

const BASE_URL: &str = "https://api.tavily.com/search";
const SEARCH_DEPTH: &str = "advanced";

/// Client for the Tavily search API.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    api_key: String,
}

/// One search hit returned by Tavily.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Search response returned to the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    /// Tavily's own synthesized short answer, when requested.
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

impl SearchClient {
    /// Creates a new client using the provided API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Performs one web search.
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<SearchResponse, ApiError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ApiError::ExecutionFailed(
                "Search query cannot be empty".into(),
            ));
        }

        let request = SearchRequest {
            api_key: &self.api_key,
            query: trimmed,
            search_depth: SEARCH_DEPTH,
            max_results,
        };

        let response = self
            .client
            .post(BASE_URL)
            .json(&request)
            .send()
            .await
            .map_err(|err| ApiError::transport("Tavily", err))?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Tavily error body".to_string());
            return Err(map_http_error(status, body, retry_after));
        }

        response
            .json()
            .await
            .map_err(|err| ApiError::Other(format!("Failed to parse Tavily response: {err}")))
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
}

fn map_http_error(
    status: StatusCode,
    body: String,
    retry_after: Option<std::time::Duration>,
) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("detail")
                .or_else(|| json.get("error"))
                .and_then(|detail| detail.as_str())
                .map(|detail| detail.to_string())
        })
        .unwrap_or_else(|| body.clone());

    ApiError::http(status, message, retry_after)
}
