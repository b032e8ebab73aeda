//! Google Custom Search adapter (§4.1).
//!
//! Available iff an API key and CSE id are configured. Provides the
//! Scholar/News/Images categorical variants via query restriction
//! (`scholar.google.com` site-search, the news-search flag with a
//! sort-by-date hint, and the `searchType=image` parameter respectively).
//! On a non-2xx response we throw rather than synthesize results.

use super::{dedup_within_call, lexical_relevance, with_timeout, SearchAdapter};
use crate::core::error::AdapterError;
use crate::core::types::{SearchOptions, SearchResult, SearchType};
use async_trait::async_trait;
use serde::Deserialize;

pub struct GoogleAdapter {
    api_key: Option<String>,
    cse_id: Option<String>,
    client: reqwest::Client,
}

impl GoogleAdapter {
    pub fn new(api_key: Option<String>, cse_id: Option<String>, client: reqwest::Client) -> Self {
        Self { api_key, cse_id, client }
    }

    async fn perform(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, AdapterError> {
        let (Some(key), Some(cx)) = (self.api_key.as_deref(), self.cse_id.as_deref()) else {
            return Err(AdapterError::Fatal("google adapter not configured".into()));
        };

        let mut url = reqwest::Url::parse("https://www.googleapis.com/customsearch/v1")
            .map_err(|e| AdapterError::Fatal(e.to_string()))?;
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("key", key);
            qp.append_pair("cx", cx);
            qp.append_pair("q", query);
            qp.append_pair("num", &options.max_results_or_default().clamp(1, 10).to_string());

            match options.r#type {
                Some(SearchType::Scholar) => {
                    qp.append_pair("siteSearch", "scholar.google.com");
                    qp.append_pair("siteSearchFilter", "i");
                }
                Some(SearchType::News) => {
                    qp.append_pair("sort", "date");
                }
                Some(SearchType::Images) => {
                    qp.append_pair("searchType", "image");
                }
                _ => {}
            }

            if let Some(site) = &options.site_search {
                qp.append_pair("siteSearch", site);
            }
            if let Some(lang) = &options.language {
                qp.append_pair("lr", &format!("lang_{}", lang));
            }
            if let Some(date_restrict) = &options.date_restrict {
                qp.append_pair("dateRestrict", date_restrict);
            }
            if let Some(file_type) = &options.file_type {
                qp.append_pair("fileType", file_type);
            }
        }

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AdapterError::Transient(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AdapterError::Fatal(format!(
                "google custom search returned HTTP {}",
                resp.status()
            )));
        }

        let body: GoogleSearchResponse = resp
            .json()
            .await
            .map_err(|e| AdapterError::Fatal(format!("invalid google response: {}", e)))?;

        let items = body.items.unwrap_or_default();
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let relevance = lexical_relevance(query, &item.title, item.snippet.as_deref().unwrap_or(""));
            out.push(SearchResult {
                title: item.title,
                url: item.link,
                snippet: item.snippet.unwrap_or_default(),
                source: "google".to_string(),
                relevance_score: relevance,
                metadata: Default::default(),
            });
        }

        Ok(dedup_within_call(out))
    }
}

#[async_trait]
impl SearchAdapter for GoogleAdapter {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, AdapterError> {
        with_timeout("google", options, self.perform(query, options)).await
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some() && self.cse_id.is_some()
    }

    fn service_name(&self) -> &str {
        "google"
    }
}

#[derive(Debug, Deserialize)]
struct GoogleSearchResponse {
    #[serde(default)]
    items: Option<Vec<GoogleSearchItem>>,
}

#[derive(Debug, Deserialize)]
struct GoogleSearchItem {
    title: String,
    link: String,
    #[serde(default)]
    snippet: Option<String>,
}
