//! Unified Search Aggregator (C2, §4.2). Fans a query out to every
//! available, selected provider adapter in parallel, fuses the per-adapter
//! result sets by one of three combine strategies, deduplicates by
//! normalized URL, and truncates to the caller's budget.

use crate::adapters::SearchAdapter;
use crate::core::types::{CombineStrategy, SearchResult, SearchType, UnifiedSearchOptions};
use futures::future::join_all;
use std::collections::HashMap;
use tracing::warn;
use url::Url;

/// Default per-adapter weights (§4.2 step 3), keyed by `service_name()`.
fn default_weight(service_name: &str) -> f64 {
    match service_name {
        "google" => 1.2,
        "tavily" => 1.1,
        "langsearch" => 1.15,
        "duckduckgo" => 1.0,
        "context7" => 1.3,
        _ => 1.0,
    }
}

/// Documentation-host substrings used to filter a fallback web search when
/// routing `search_documentation` (§4.2 "Categorical routing").
const DOC_HOST_SUBSTRINGS: &[&str] = &[
    "docs.",
    "developer.",
    "readthedocs.io",
    "devdocs.io",
    "pkg.go.dev",
    "crates.io",
    "docs.rs",
    "mdn",
    "api-docs",
];

pub struct UnifiedSearchAggregator {
    adapters: Vec<Box<dyn SearchAdapter>>,
}

impl UnifiedSearchAggregator {
    pub fn new(adapters: Vec<Box<dyn SearchAdapter>>) -> Self {
        Self { adapters }
    }

    /// Step 1: intersect requested sources with available adapters.
    fn selected(&self, sources: &Option<Vec<String>>) -> Vec<&dyn SearchAdapter> {
        self.adapters
            .iter()
            .map(|a| a.as_ref())
            .filter(|a| a.is_available())
            .filter(|a| match sources {
                None => true,
                Some(names) => names.iter().any(|n| n == a.service_name()),
            })
            .collect()
    }

    pub async fn search(&self, query: &str, options: &UnifiedSearchOptions) -> Vec<SearchResult> {
        let chosen = self.selected(&options.sources);
        if chosen.is_empty() {
            return Vec::new();
        }

        let mut per_adapter_options = options.base.clone();
        per_adapter_options.max_results = Some(options.max_results_per_source);

        let futures = chosen.iter().map(|adapter| {
            let opts = per_adapter_options.clone();
            async move {
                match adapter.search(query, &opts).await {
                    Ok(results) => (adapter.service_name().to_string(), results),
                    Err(e) => {
                        warn!(adapter = adapter.service_name(), error = %e, "adapter search failed");
                        (adapter.service_name().to_string(), Vec::new())
                    }
                }
            }
        });

        let per_adapter: Vec<(String, Vec<SearchResult>)> = join_all(futures).await;

        let weights: HashMap<String, f64> = chosen
            .iter()
            .map(|a| {
                let name = a.service_name().to_string();
                let weight = options
                    .weights
                    .get(&name)
                    .copied()
                    .unwrap_or_else(|| default_weight(&name));
                (name, weight)
            })
            .collect();

        let mut combined = combine(per_adapter, &weights, options.combine_strategy);

        if options.deduplicate {
            combined = dedup_preferring_best(combined);
        }

        combined.truncate(options.max_results.max(1));
        combined
    }

    pub async fn search_scholar(&self, query: &str, options: &UnifiedSearchOptions) -> Vec<SearchResult> {
        let mut opts = options.clone();
        opts.base.r#type = Some(SearchType::Scholar);
        opts.sources = Some(
            ["google", "langsearch"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        self.search(query, &opts).await
    }

    pub async fn search_news(&self, query: &str, options: &UnifiedSearchOptions) -> Vec<SearchResult> {
        let mut opts = options.clone();
        opts.base.r#type = Some(SearchType::News);
        opts.sources = Some(
            ["google", "tavily", "langsearch"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        self.search(query, &opts).await
    }

    /// Routes to Context7 + LangSearch[documentation], plus a docs-biased
    /// fallback web search filtered by a curated host-substring allowlist.
    pub async fn search_documentation(&self, query: &str, library: Option<&str>, options: &UnifiedSearchOptions) -> Vec<SearchResult> {
        let doc_query = match library {
            Some(lib) if !lib.trim().is_empty() => format!("{} {}", lib, query),
            _ => query.to_string(),
        };

        let mut opts = options.clone();
        opts.base.r#type = Some(SearchType::Documentation);
        opts.sources = Some(
            ["context7", "langsearch"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        let mut results = self.search(&doc_query, &opts).await;

        if results.is_empty() {
            let fallback_query = format!("{} documentation", doc_query);
            let mut fallback_opts = options.clone();
            fallback_opts.sources = Some(
                ["google", "duckduckgo"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            );
            let web_results = self.search(&fallback_query, &fallback_opts).await;
            results = web_results
                .into_iter()
                .filter(|r| {
                    let lower = r.url.to_lowercase();
                    DOC_HOST_SUBSTRINGS.iter().any(|s| lower.contains(s))
                })
                .collect();
        }

        results
    }
}

fn combine(per_adapter: Vec<(String, Vec<SearchResult>)>, weights: &HashMap<String, f64>, strategy: CombineStrategy) -> Vec<SearchResult> {
    match strategy {
        CombineStrategy::Merge => combine_merge(per_adapter, weights),
        CombineStrategy::Interleave => combine_interleave(per_adapter),
        CombineStrategy::Weighted => combine_weighted(per_adapter, weights),
    }
}

fn combine_merge(per_adapter: Vec<(String, Vec<SearchResult>)>, weights: &HashMap<String, f64>) -> Vec<SearchResult> {
    let mut flat: Vec<SearchResult> = Vec::new();
    for (source, results) in per_adapter {
        let weight = weights.get(&source).copied().unwrap_or(1.0);
        for mut r in results {
            r.metadata.insert("weighted_score".to_string(), serde_json::json!(r.relevance_score * weight));
            flat.push(r);
        }
    }
    flat.sort_by(|a, b| {
        let sa = weighted_score_of(a, weights);
        let sb = weighted_score_of(b, weights);
        sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
    });
    flat
}

fn weighted_score_of(r: &SearchResult, weights: &HashMap<String, f64>) -> f64 {
    let weight = weights.get(&r.source).copied().unwrap_or(1.0);
    r.relevance_score * weight
}

fn combine_interleave(per_adapter: Vec<(String, Vec<SearchResult>)>) -> Vec<SearchResult> {
    let mut queues: Vec<std::vec::IntoIter<SearchResult>> = per_adapter.into_iter().map(|(_, r)| r.into_iter()).collect();
    let mut out = Vec::new();
    loop {
        let mut advanced = false;
        for queue in queues.iter_mut() {
            if let Some(item) = queue.next() {
                out.push(item);
                advanced = true;
            }
        }
        if !advanced {
            break;
        }
    }
    out
}

/// §4.2 step 4 "weighted": group by normalized URL; combined score is the
/// weight-normalized average; representative is the longest-snippet member;
/// metadata.sources lists contributing adapter tags.
fn combine_weighted(per_adapter: Vec<(String, Vec<SearchResult>)>, weights: &HashMap<String, f64>) -> Vec<SearchResult> {
    struct Group {
        representative: SearchResult,
        score_weight_sum: f64,
        weight_sum: f64,
        sources: Vec<String>,
        first_seen_order: usize,
    }

    let mut groups: HashMap<String, Group> = HashMap::new();
    let mut order_counter = 0usize;

    for (source, results) in per_adapter {
        let weight = weights.get(&source).copied().unwrap_or(1.0);
        for r in results {
            let key = normalize_url(&r.url);
            let score_contribution = r.relevance_score * weight;

            match groups.get_mut(&key) {
                Some(group) => {
                    group.score_weight_sum += score_contribution;
                    group.weight_sum += weight;
                    if !group.sources.contains(&source) {
                        group.sources.push(source.clone());
                    }
                    if r.snippet.len() > group.representative.snippet.len() {
                        group.representative = r;
                    }
                }
                None => {
                    groups.insert(
                        key,
                        Group {
                            representative: r,
                            score_weight_sum: score_contribution,
                            weight_sum: weight,
                            sources: vec![source.clone()],
                            first_seen_order: order_counter,
                        },
                    );
                    order_counter += 1;
                }
            }
        }
    }

    let mut entries: Vec<Group> = groups.into_values().collect();
    entries.sort_by_key(|g| g.first_seen_order);

    let mut out: Vec<SearchResult> = entries
        .into_iter()
        .map(|g| {
            let mut r = g.representative;
            r.relevance_score = if g.weight_sum > 0.0 {
                (g.score_weight_sum / g.weight_sum).clamp(0.0, 1.0)
            } else {
                r.relevance_score
            };
            r.metadata.insert("sources".to_string(), serde_json::json!(g.sources));
            r
        })
        .collect();
    out.sort_by(|a, b| b.relevance_score.partial_cmp(&a.relevance_score).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// §4.2 step 5: collapse any duplicates still present (e.g. from
/// merge/interleave, which don't group by URL), preferring higher score or
/// longer snippet.
fn dedup_preferring_best(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut best: HashMap<String, SearchResult> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for r in results {
        let key = normalize_url(&r.url);
        match best.get(&key) {
            None => {
                order.push(key.clone());
                best.insert(key, r);
            }
            Some(existing) => {
                let replace = r.relevance_score > existing.relevance_score
                    || (r.relevance_score == existing.relevance_score && r.snippet.len() > existing.snippet.len());
                if replace {
                    best.insert(key, r);
                }
            }
        }
    }

    order.into_iter().filter_map(|k| best.remove(&k)).collect()
}

/// origin + pathname (trailing slash stripped) + search, fragment discarded.
/// Falls back to lowercase + trailing-slash-strip on parse failure.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => {
            let origin = url.origin().ascii_serialization();
            let path = url.path().trim_end_matches('/');
            let query = url.query().map(|q| format!("?{}", q)).unwrap_or_default();
            format!("{}{}{}", origin, path, query)
        }
        Err(_) => raw.to_lowercase().trim_end_matches('/').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_url_drops_fragment_and_trailing_slash() {
        assert_eq!(
            normalize_url("https://Example.com/page/?q=1#section"),
            "https://example.com/page?q=1"
        );
    }

    #[test]
    fn normalize_url_falls_back_on_unparseable_input() {
        assert_eq!(normalize_url("not a url/"), "not a url");
    }

    #[test]
    fn weighted_combine_averages_duplicate_urls() {
        let google = (
            "google".to_string(),
            vec![SearchResult {
                title: "A".to_string(),
                url: "https://example.com/x".to_string(),
                snippet: "short".to_string(),
                source: "google".to_string(),
                relevance_score: 0.8,
                metadata: Default::default(),
            }],
        );
        let ddg = (
            "duckduckgo".to_string(),
            vec![SearchResult {
                title: "A".to_string(),
                url: "https://example.com/x".to_string(),
                snippet: "a much longer matching snippet".to_string(),
                source: "duckduckgo".to_string(),
                relevance_score: 0.6,
                metadata: Default::default(),
            }],
        );

        let mut weights = HashMap::new();
        weights.insert("google".to_string(), 1.2);
        weights.insert("duckduckgo".to_string(), 1.0);

        let combined = combine_weighted(vec![google, ddg], &weights);
        assert_eq!(combined.len(), 1);
        let expected = (0.8 * 1.2 + 0.6 * 1.0) / (1.2 + 1.0);
        assert!((combined[0].relevance_score - expected).abs() < 1e-9);
        assert_eq!(combined[0].snippet, "a much longer matching snippet");
    }

    #[test]
    fn dedup_preferring_best_keeps_higher_score() {
        let a = SearchResult {
            title: "A".to_string(),
            url: "https://example.com/x".to_string(),
            snippet: "s".to_string(),
            source: "google".to_string(),
            relevance_score: 0.4,
            metadata: Default::default(),
        };
        let mut b = a.clone();
        b.relevance_score = 0.9;
        let out = dedup_preferring_best(vec![a, b]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].relevance_score, 0.9);
    }
}
