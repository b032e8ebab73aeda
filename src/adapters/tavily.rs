//! Tavily adapter (§4.1). Available iff an API key is configured.
//!
//! Single POST to `/search`. The provider's own relevance score is used
//! directly — no lexical heuristic fallback is needed.

use super::{dedup_within_call, with_timeout, SearchAdapter};
use crate::core::error::AdapterError;
use crate::core::types::{SearchOptions, SearchResult, SearchType};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub struct TavilyAdapter {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl TavilyAdapter {
    pub fn new(api_key: Option<String>, client: reqwest::Client) -> Self {
        Self { api_key, client }
    }

    async fn perform(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, AdapterError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AdapterError::Fatal("tavily adapter not configured".into()));
        };

        let topic = match options.r#type {
            Some(SearchType::News) => "news",
            _ => "general",
        };

        let body = TavilyRequest {
            api_key: api_key.to_string(),
            query: query.to_string(),
            search_depth: "basic",
            topic,
            max_results: options.max_results_or_default(),
            include_answer: false,
            include_raw_content: false,
            include_images: false,
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
        };

        let resp = self
            .client
            .post("https://api.tavily.com/search")
            .json(&body)
            .send()
            .await
            .map_err(|e| AdapterError::Transient(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AdapterError::Blocked {
                reason: "http_429".to_string(),
            });
        }
        if !resp.status().is_success() {
            return Err(AdapterError::Fatal(format!("tavily returned HTTP {}", resp.status())));
        }

        let parsed: TavilyResponse = resp
            .json()
            .await
            .map_err(|e| AdapterError::Fatal(format!("invalid tavily response: {}", e)))?;

        let out = parsed
            .results
            .into_iter()
            .map(|r| SearchResult {
                title: r.title,
                url: r.url,
                snippet: r.content,
                source: "tavily".to_string(),
                relevance_score: r.score.unwrap_or(0.5).clamp(0.0, 1.0),
                metadata: Default::default(),
            })
            .collect();

        Ok(dedup_within_call(out))
    }
}

#[async_trait]
impl SearchAdapter for TavilyAdapter {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, AdapterError> {
        with_timeout("tavily", options, self.perform(query, options)).await
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn service_name(&self) -> &str {
        "tavily"
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest {
    api_key: String,
    query: String,
    search_depth: &'static str,
    topic: &'static str,
    max_results: usize,
    include_answer: bool,
    include_raw_content: bool,
    include_images: bool,
    include_domains: Vec<String>,
    exclude_domains: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: String,
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: Option<f64>,
}
