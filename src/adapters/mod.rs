//! Search provider adapters (C1, §4.1).
//!
//! Each adapter wraps one external search backend behind the uniform
//! `SearchAdapter` trait. A shared base (`with_timeout`) composes a
//! cancellation token with the caller's `options.timeout`; cancellation is
//! the only adapter-internal failure that's swallowed into an empty,
//! successful result (everything else propagates to the aggregator, which
//! isolates it per-adapter).

pub mod context7;
pub mod duckduckgo;
pub mod google;
pub mod langsearch;
pub mod tavily;

use crate::core::error::AdapterError;
use crate::core::types::{SearchOptions, SearchResult};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::warn;

#[async_trait]
pub trait SearchAdapter: Send + Sync {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, AdapterError>;

    /// Construction-time availability gate (credentials present, etc).
    fn is_available(&self) -> bool;

    fn service_name(&self) -> &str;
}

/// Wraps `perform` with a timeout derived from `options.timeout`. A timeout
/// is treated as the adapter having "no opinion" — returns `Ok(vec![])`
/// rather than propagating, per spec.md §4.1(b).
pub async fn with_timeout<F>(service_name: &str, options: &SearchOptions, perform: F) -> Result<Vec<SearchResult>, AdapterError>
where
    F: std::future::Future<Output = Result<Vec<SearchResult>, AdapterError>>,
{
    match tokio::time::timeout(options.timeout(), perform).await {
        Ok(inner) => inner,
        Err(_) => {
            warn!(adapter = service_name, "search cancelled (timeout)");
            Ok(Vec::new())
        }
    }
}

/// Deduplicates results returned by a single adapter call, by normalized URL
/// (§4.1(c)). Keeps first occurrence.
pub fn dedup_within_call(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(results.len());
    for r in results {
        let key = crate::search::normalize_url(&r.url);
        if seen.insert(key) {
            out.push(r);
        }
    }
    out
}

/// Lexical relevance heuristic used when a provider gives no score of its
/// own (§4.1). Start at 0; +0.5 if the query substring appears in the
/// title, +0.3 if in the snippet; per query word longer than 2 chars, +0.1
/// if the title contains it, +0.05 if the snippet does; clamp to [0, 1].
pub fn lexical_relevance(query: &str, title: &str, snippet: &str) -> f64 {
    let query_lower = query.to_lowercase();
    let title_lower = title.to_lowercase();
    let snippet_lower = snippet.to_lowercase();

    let mut score = 0.0_f64;

    if !query_lower.is_empty() && title_lower.contains(&query_lower) {
        score += 0.5;
    }
    if !query_lower.is_empty() && snippet_lower.contains(&query_lower) {
        score += 0.3;
    }

    for word in query_lower.split_whitespace().filter(|w| w.len() > 2) {
        if title_lower.contains(word) {
            score += 0.1;
        }
        if snippet_lower.contains(word) {
            score += 0.05;
        }
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_relevance_clamped_and_scored() {
        let s = lexical_relevance(
            "rust async runtime",
            "The Rust Async Runtime Guide",
            "An overview of async runtimes in Rust",
        );
        assert!(s > 0.5 && s <= 1.0);

        let zero = lexical_relevance("x", "unrelated", "also unrelated");
        assert_eq!(zero, 0.0);
    }

    #[test]
    fn dedup_within_call_keeps_first() {
        let a = SearchResult::new("A", "https://example.com/page", "x");
        let mut b = SearchResult::new("B", "https://example.com/page/", "x");
        b.snippet = "different".into();
        let out = dedup_within_call(vec![a.clone(), b]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "A");
    }
}
