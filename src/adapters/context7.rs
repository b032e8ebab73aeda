//! Context7 adapter (§4.1) — documentation search. Always available; wraps
//! a resolve-then-fetch pattern: resolve a library id from the free-text
//! query, then fetch docs for that library with a token budget.

use super::{dedup_within_call, lexical_relevance, with_timeout, SearchAdapter};
use crate::core::error::AdapterError;
use crate::core::types::{SearchOptions, SearchResult};
use async_trait::async_trait;
use serde::Deserialize;

const DEFAULT_TOKEN_BUDGET: u32 = 5_000;

pub struct Context7Adapter {
    base_url: String,
    client: reqwest::Client,
}

impl Context7Adapter {
    pub fn new(base_url: String, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }

    async fn resolve_library_id(&self, query: &str) -> Result<Option<String>, AdapterError> {
        let mut url = reqwest::Url::parse(&format!("{}/v1/resolve", self.base_url))
            .map_err(|e| AdapterError::Fatal(e.to_string()))?;
        url.query_pairs_mut().append_pair("libraryName", query);

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AdapterError::Transient(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AdapterError::Fatal(format!("context7 resolve returned HTTP {}", resp.status())));
        }

        let parsed: Context7ResolveResponse = resp
            .json()
            .await
            .map_err(|e| AdapterError::Fatal(format!("invalid context7 resolve response: {}", e)))?;

        Ok(parsed.libraries.into_iter().next().map(|l| l.id))
    }

    async fn fetch_docs(&self, library_id: &str, topic: &str, max_results: usize) -> Result<Vec<SearchResult>, AdapterError> {
        let mut url = reqwest::Url::parse(&format!("{}/v1/docs", self.base_url))
            .map_err(|e| AdapterError::Fatal(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("context7CompatibleLibraryID", library_id)
            .append_pair("topic", topic)
            .append_pair("tokens", &DEFAULT_TOKEN_BUDGET.to_string());

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AdapterError::Transient(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AdapterError::Fatal(format!("context7 docs returned HTTP {}", resp.status())));
        }

        let parsed: Context7DocsResponse = resp
            .json()
            .await
            .map_err(|e| AdapterError::Fatal(format!("invalid context7 docs response: {}", e)))?;

        let mut out = Vec::with_capacity(parsed.snippets.len().min(max_results));
        for snippet in parsed.snippets.into_iter().take(max_results) {
            let relevance = lexical_relevance(topic, &snippet.title, &snippet.content);
            out.push(SearchResult {
                title: snippet.title,
                url: snippet.source_url,
                snippet: snippet.content,
                source: "context7".to_string(),
                relevance_score: relevance,
                metadata: Default::default(),
            });
        }
        Ok(out)
    }

    async fn perform(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, AdapterError> {
        let Some(library_id) = self.resolve_library_id(query).await? else {
            return Ok(Vec::new());
        };

        let results = self
            .fetch_docs(&library_id, query, options.max_results_or_default())
            .await?;
        Ok(dedup_within_call(results))
    }
}

#[async_trait]
impl SearchAdapter for Context7Adapter {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, AdapterError> {
        with_timeout("context7", options, self.perform(query, options)).await
    }

    fn is_available(&self) -> bool {
        true
    }

    fn service_name(&self) -> &str {
        "context7"
    }
}

#[derive(Debug, Deserialize)]
struct Context7ResolveResponse {
    #[serde(default)]
    libraries: Vec<Context7Library>,
}

#[derive(Debug, Deserialize)]
struct Context7Library {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Context7DocsResponse {
    #[serde(default)]
    snippets: Vec<Context7Snippet>,
}

#[derive(Debug, Deserialize)]
struct Context7Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(rename = "sourceUrl", default)]
    source_url: String,
}
