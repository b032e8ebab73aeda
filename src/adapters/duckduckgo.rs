//! DuckDuckGo adapter (§4.1). No API key required.
//!
//! Two-stage strategy: first the instant-answer JSON endpoint; if it
//! yields at least one result (abstract, answer, definition, or a related
//! topic) those are returned. Otherwise fall back to HTML-scraping the
//! standard `html.duckduckgo.com` endpoint; if that fails too, try the
//! "lite" endpoint.

use super::{dedup_within_call, lexical_relevance, with_timeout, SearchAdapter};
use crate::core::error::AdapterError;
use crate::core::types::{SearchOptions, SearchResult};
use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::warn;

pub struct DuckDuckGoAdapter {
    client: reqwest::Client,
}

impl DuckDuckGoAdapter {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn perform(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, AdapterError> {
        let max_results = options.max_results_or_default();

        match self.instant_answer(query).await {
            Ok(results) if !results.is_empty() => return Ok(dedup_within_call(results)),
            Ok(_) => {}
            Err(e) => warn!("duckduckgo instant-answer failed: {}", e),
        }

        match self.html_endpoint(query, max_results, "https://html.duckduckgo.com/html/").await {
            Ok(results) if !results.is_empty() => return Ok(dedup_within_call(results)),
            Ok(_) => {}
            Err(e) => warn!("duckduckgo html endpoint failed: {}", e),
        }

        let results = self
            .html_endpoint(query, max_results, "https://lite.duckduckgo.com/lite/")
            .await?;
        Ok(dedup_within_call(results))
    }

    async fn instant_answer(&self, query: &str) -> Result<Vec<SearchResult>, AdapterError> {
        let mut url = reqwest::Url::parse("https://api.duckduckgo.com/")
            .map_err(|e| AdapterError::Fatal(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("no_html", "1")
            .append_pair("skip_disambig", "1");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AdapterError::Transient(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AdapterError::Transient(format!("HTTP {}", resp.status())));
        }

        let body: DdgInstantAnswer = resp
            .json()
            .await
            .map_err(|e| AdapterError::Fatal(format!("invalid duckduckgo response: {}", e)))?;

        let mut out = Vec::new();

        if !body.abstract_text.trim().is_empty() && !body.abstract_url.trim().is_empty() {
            out.push(self.result_from(
                query,
                if body.heading.trim().is_empty() { query } else { &body.heading },
                &body.abstract_url,
                &body.abstract_text,
            ));
        }

        if !body.answer.trim().is_empty() {
            out.push(self.result_from(query, query, &body.abstract_url, &body.answer));
        }

        if !body.definition.trim().is_empty() && !body.definition_url.trim().is_empty() {
            out.push(self.result_from(query, query, &body.definition_url, &body.definition));
        }

        for topic in &body.related_topics {
            if let (Some(text), Some(first_url)) = (&topic.text, &topic.first_url) {
                if !text.trim().is_empty() && !first_url.trim().is_empty() {
                    out.push(self.result_from(query, text, first_url, text));
                }
            }
        }

        Ok(out)
    }

    fn result_from(&self, query: &str, title: &str, url: &str, snippet: &str) -> SearchResult {
        let relevance = lexical_relevance(query, title, snippet);
        SearchResult {
            title: title.trim().to_string(),
            url: url.trim().to_string(),
            snippet: snippet.trim().to_string(),
            source: "duckduckgo".to_string(),
            relevance_score: relevance,
            metadata: Default::default(),
        }
    }

    async fn html_endpoint(
        &self,
        query: &str,
        max_results: usize,
        endpoint: &str,
    ) -> Result<Vec<SearchResult>, AdapterError> {
        let mut url = reqwest::Url::parse(endpoint).map_err(|e| AdapterError::Fatal(e.to_string()))?;
        url.query_pairs_mut().append_pair("q", query);

        let resp = self
            .client
            .get(url)
            .header("User-Agent", "Mozilla/5.0 (compatible; DeepResearchBot/1.0)")
            .send()
            .await
            .map_err(|e| AdapterError::Transient(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AdapterError::Blocked {
                reason: format!("http_{}", status.as_u16()),
            });
        }
        if !status.is_success() {
            return Err(AdapterError::Transient(format!("HTTP {}", status)));
        }

        let body = resp.text().await.map_err(|e| AdapterError::Transient(e.to_string()))?;
        Ok(parse_html_results(&body, query, max_results))
    }
}

fn parse_html_results(html: &str, query: &str, max_results: usize) -> Vec<SearchResult> {
    let doc = Html::parse_document(html);
    let Ok(result_sel) = Selector::parse("div.result, tr") else {
        return Vec::new();
    };
    let Ok(link_sel) = Selector::parse("a.result__a, a.result-link") else {
        return Vec::new();
    };
    let Ok(snippet_sel) = Selector::parse("a.result__snippet, td.result-snippet") else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for el in doc.select(&result_sel) {
        if out.len() >= max_results {
            break;
        }
        let Some(link) = el.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(href) = normalize_ddg_href(href) else {
            continue;
        };
        let title = link.text().collect::<Vec<_>>().join(" ").trim().to_string();
        if title.is_empty() {
            continue;
        }
        let snippet = el
            .select(&snippet_sel)
            .next()
            .map(|n| n.text().collect::<Vec<_>>().join(" ").trim().to_string())
            .unwrap_or_default();

        let relevance = lexical_relevance(query, &title, &snippet);
        out.push(SearchResult {
            title,
            url: href,
            snippet,
            source: "duckduckgo".to_string(),
            relevance_score: relevance,
            metadata: Default::default(),
        });
    }
    out
}

fn normalize_ddg_href(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let candidate = if let Some(rest) = href.strip_prefix("//") {
        format!("https://{}", rest)
    } else if let Some(rest) = href.strip_prefix('/') {
        format!("https://duckduckgo.com/{}", rest)
    } else {
        href.to_string()
    };

    if let Ok(url) = url::Url::parse(&candidate) {
        if matches!(url.host_str(), Some("duckduckgo.com")) && url.path().starts_with("/l/") {
            for (k, v) in url.query_pairs() {
                if k == "uddg" && !v.trim().is_empty() {
                    return Some(v.to_string());
                }
            }
        }
    }

    if candidate.starts_with("http://") || candidate.starts_with("https://") {
        Some(candidate)
    } else {
        None
    }
}

#[async_trait]
impl SearchAdapter for DuckDuckGoAdapter {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, AdapterError> {
        with_timeout("duckduckgo", options, self.perform(query, options)).await
    }

    fn is_available(&self) -> bool {
        true
    }

    fn service_name(&self) -> &str {
        "duckduckgo"
    }
}

#[derive(Debug, Default, Deserialize)]
struct DdgInstantAnswer {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "Answer", default)]
    answer: String,
    #[serde(rename = "Definition", default)]
    definition: String,
    #[serde(rename = "DefinitionURL", default)]
    definition_url: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<DdgRelatedTopic>,
}

#[derive(Debug, Default, Deserialize)]
struct DdgRelatedTopic {
    #[serde(rename = "Text", default)]
    text: Option<String>,
    #[serde(rename = "FirstURL", default)]
    first_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_redirect_hrefs() {
        assert_eq!(
            normalize_ddg_href("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2F"),
            Some("https://example.com/".to_string())
        );
        assert_eq!(
            normalize_ddg_href("https://example.org/page"),
            Some("https://example.org/page".to_string())
        );
        assert_eq!(normalize_ddg_href("javascript:void(0)"), None);
    }
}
