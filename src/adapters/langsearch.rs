//! LangSearch adapter (§4.1). Available iff an API key is configured.
//!
//! The endpoint is chosen by `options.type` (web|scholar|news|code|
//! documentation map to distinct paths). The provider's own
//! `relevance_score` is passed through unchanged.

use super::{dedup_within_call, with_timeout, SearchAdapter};
use crate::core::error::AdapterError;
use crate::core::types::{SearchOptions, SearchResult, SearchType};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub struct LangSearchAdapter {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl LangSearchAdapter {
    pub fn new(api_key: Option<String>, client: reqwest::Client) -> Self {
        Self { api_key, client }
    }

    fn endpoint_for(search_type: Option<SearchType>) -> &'static str {
        match search_type {
            Some(SearchType::Scholar) => "https://api.langsearch.com/v1/scholar/search",
            Some(SearchType::News) => "https://api.langsearch.com/v1/news/search",
            Some(SearchType::Code) => "https://api.langsearch.com/v1/code/search",
            Some(SearchType::Documentation) => "https://api.langsearch.com/v1/documentation/search",
            _ => "https://api.langsearch.com/v1/web/search",
        }
    }

    async fn perform(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, AdapterError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AdapterError::Fatal("langsearch adapter not configured".into()));
        };

        let endpoint = Self::endpoint_for(options.r#type);

        let resp = self
            .client
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&LangSearchRequest {
                query: query.to_string(),
                count: options.max_results_or_default(),
            })
            .send()
            .await
            .map_err(|e| AdapterError::Transient(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AdapterError::Blocked {
                reason: "http_429".to_string(),
            });
        }
        if !resp.status().is_success() {
            return Err(AdapterError::Fatal(format!(
                "langsearch returned HTTP {}",
                resp.status()
            )));
        }

        let parsed: LangSearchResponse = resp
            .json()
            .await
            .map_err(|e| AdapterError::Fatal(format!("invalid langsearch response: {}", e)))?;

        let out = parsed
            .data
            .web_pages
            .value
            .into_iter()
            .map(|item| SearchResult {
                title: item.name,
                url: item.url,
                snippet: item.snippet,
                source: "langsearch".to_string(),
                relevance_score: item.relevance_score.unwrap_or(0.5).clamp(0.0, 1.0),
                metadata: Default::default(),
            })
            .collect();

        Ok(dedup_within_call(out))
    }
}

#[async_trait]
impl SearchAdapter for LangSearchAdapter {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, AdapterError> {
        with_timeout("langsearch", options, self.perform(query, options)).await
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn service_name(&self) -> &str {
        "langsearch"
    }
}

#[derive(Debug, Serialize)]
struct LangSearchRequest {
    query: String,
    count: usize,
}

#[derive(Debug, Deserialize)]
struct LangSearchResponse {
    data: LangSearchData,
}

#[derive(Debug, Deserialize)]
struct LangSearchData {
    #[serde(rename = "webPages")]
    web_pages: LangSearchWebPages,
}

#[derive(Debug, Default, Deserialize)]
struct LangSearchWebPages {
    #[serde(default)]
    value: Vec<LangSearchItem>,
}

#[derive(Debug, Deserialize)]
struct LangSearchItem {
    name: String,
    url: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    relevance_score: Option<f64>,
}
