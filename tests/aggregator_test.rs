//! Unified Search Aggregator invariants and the literal weighted-fusion
//! scenario from §8.

mod support;

use deep_research_core::adapters::SearchAdapter;
use deep_research_core::core::types::{CombineStrategy, SearchResult, UnifiedSearchOptions};
use deep_research_core::search::UnifiedSearchAggregator;
use support::FakeAdapter;

#[tokio::test]
async fn empty_available_adapter_set_returns_empty_without_throwing() {
    let adapters: Vec<Box<dyn SearchAdapter>> = vec![Box::new(FakeAdapter::new("google", false, vec![]))];
    let aggregator = UnifiedSearchAggregator::new(adapters);

    let results = aggregator.search("anything", &UnifiedSearchOptions::new()).await;

    assert!(results.is_empty());
}

#[tokio::test]
async fn weighted_combine_matches_the_literal_spec_scenario() {
    let google_result = SearchResult {
        title: "Shared page".to_string(),
        url: "https://example.com/shared".to_string(),
        snippet: "short".to_string(),
        source: "google".to_string(),
        relevance_score: 0.8,
        metadata: Default::default(),
    };
    let duckduckgo_result = SearchResult {
        title: "Shared page".to_string(),
        url: "https://example.com/shared".to_string(),
        snippet: "a considerably longer snippet describing the shared page".to_string(),
        source: "duckduckgo".to_string(),
        relevance_score: 0.6,
        metadata: Default::default(),
    };

    let adapters: Vec<Box<dyn SearchAdapter>> = vec![
        Box::new(FakeAdapter::new("google", true, vec![google_result])),
        Box::new(FakeAdapter::new("duckduckgo", true, vec![duckduckgo_result])),
    ];
    let aggregator = UnifiedSearchAggregator::new(adapters);

    let mut options = UnifiedSearchOptions::new();
    options.combine_strategy = CombineStrategy::Weighted;

    let results = aggregator.search("shared", &options).await;

    assert_eq!(results.len(), 1);
    let expected = (0.8 * 1.2 + 0.6 * 1.0) / (1.2 + 1.0);
    assert!((results[0].relevance_score - expected).abs() < 1e-9);
    let sources = results[0].metadata.get("sources").unwrap().as_array().unwrap();
    assert_eq!(sources.len(), 2);
}

#[tokio::test]
async fn deduplication_is_idempotent_under_the_default_strategy() {
    let make_result = |score: f64| SearchResult {
        title: "Dup".to_string(),
        url: "https://example.com/dup/".to_string(),
        snippet: "x".to_string(),
        source: "google".to_string(),
        relevance_score: score,
        metadata: Default::default(),
    };

    let adapters: Vec<Box<dyn SearchAdapter>> = vec![Box::new(FakeAdapter::new(
        "google",
        true,
        vec![make_result(0.5), make_result(0.9)],
    ))];
    let aggregator = UnifiedSearchAggregator::new(adapters);

    let mut options = UnifiedSearchOptions::new();
    options.combine_strategy = CombineStrategy::Merge;

    let once = aggregator.search("dup", &options).await;
    assert_eq!(once.len(), 1);
    assert_eq!(once[0].relevance_score, 0.9);
}
