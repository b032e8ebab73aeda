//! End-to-end orchestrator scenarios (§8), driven entirely by scripted
//! fakes — no network calls.

mod support;

use deep_research_core::adapters::SearchAdapter;
use deep_research_core::conduct_deep_research;
use deep_research_core::core::types::DeepResearchConfig;
use deep_research_core::search::UnifiedSearchAggregator;
use support::{sample_result, FakeAdapter, ScriptedLm};

fn aggregator_with_fakes() -> UnifiedSearchAggregator {
    let adapters: Vec<Box<dyn SearchAdapter>> = vec![
        Box::new(FakeAdapter::new("google", true, vec![sample_result("google", 1)])),
        Box::new(FakeAdapter::new("duckduckgo", true, vec![sample_result("duckduckgo", 1)])),
    ];
    UnifiedSearchAggregator::new(adapters)
}

#[tokio::test]
async fn rejects_query_shorter_than_three_chars() {
    let lm = ScriptedLm::new(vec![]);
    let aggregator = aggregator_with_fakes();
    let config = DeepResearchConfig::default();

    let result = conduct_deep_research("ai", &config, &lm, &aggregator).await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Query must be \u{2265}3 chars"));
    assert_eq!(lm.call_count(), 0);
}

#[tokio::test]
async fn surfaces_clarification_question() {
    let lm = ScriptedLm::new(vec![Ok(r#"{"need_clarification": true, "question": "Which area of AI?"}"#.to_string())]);
    let aggregator = aggregator_with_fakes();
    let config = DeepResearchConfig::default();

    let result = conduct_deep_research("tell me about AI", &config, &lm, &aggregator).await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Clarification needed"));
    assert_eq!(result.details.as_deref(), Some("Which area of AI?"));
}

#[tokio::test]
async fn full_success_scenario_produces_report_with_required_headings() {
    let lm = ScriptedLm::new(vec![
        Ok(r#"{"need_clarification": false}"#.to_string()),
        Ok(r#"{"research_brief": "Research brief about few-shot text-to-sql methods.", "key_questions": ["What are few-shot methods?"], "research_scope": "technical"}"#.to_string()),
        Ok("USE_TOOL: conduct_research(\"few-shot text-to-sql techniques\")".to_string()),
        Ok("USE_TOOL: web_search(\"few-shot text-to-sql\")\nUSE_TOOL: scholar_search(\"few-shot text-to-sql\")".to_string()),
        Ok("Summary: few-shot text-to-sql techniques use in-context examples to guide SQL generation.".to_string()),
        Ok("USE_TOOL: research_complete(\"Completed investigation of few-shot text-to-sql techniques.\")".to_string()),
        Ok("# Research Report\n\n## Executive Summary\nFindings on few-shot text-to-sql.\n\n## Detailed Analysis\n...\n\n## Key Insights\n...\n\n## Practical Recommendations\n...\n\n## Conclusion\nDone.".to_string()),
    ]);
    let aggregator = aggregator_with_fakes();
    let mut config = DeepResearchConfig::default();
    config.max_iterations = 2;

    let result = conduct_deep_research(
        "techniques for few-shot text-to-sql with practical recommendations",
        &config,
        &lm,
        &aggregator,
    )
    .await;

    assert!(result.success);
    assert!(result.research_brief.as_deref().unwrap().contains("few-shot"));
    assert!(result.notes.len() >= 1);
    let report = result.final_report.unwrap();
    assert!(report.contains("Executive Summary"));
    assert!(report.contains("Conclusion"));
}

#[tokio::test]
async fn phase_four_failure_falls_back_to_findings_summary() {
    let lm = ScriptedLm::new(vec![
        Ok(r#"{"need_clarification": false}"#.to_string()),
        Ok(r#"{"research_brief": "Quantum computing and cryptography.", "key_questions": [], "research_scope": "technical"}"#.to_string()),
        Ok("USE_TOOL: research_complete(\"done\")".to_string()),
        Err("upstream LM outage".to_string()),
    ]);
    let aggregator = aggregator_with_fakes();
    let config = DeepResearchConfig::default();

    let result = conduct_deep_research("quantum computing for cryptography", &config, &lm, &aggregator).await;

    assert!(result.success);
    let report = result.final_report.unwrap();
    assert!(report.starts_with("# Research Report"));
    assert!(report.contains("## Findings Summary"));
}

#[tokio::test]
async fn forced_research_fallback_fires_when_supervisor_emits_nothing() {
    let lm = ScriptedLm::new(vec![
        Ok(r#"{"need_clarification": false}"#.to_string()),
        Ok(r#"{"research_brief": "AI agent coordination.", "key_questions": [], "research_scope": "technical"}"#.to_string()),
        Ok("Let me think it over.".to_string()),
        Ok("Let me consider this carefully.".to_string()),
        Ok("Summary: notable developments found for topic one.".to_string()),
        Ok("Let me consider this carefully.".to_string()),
        Ok("Summary: notable developments found for topic two.".to_string()),
        Ok("Let me consider this carefully.".to_string()),
        Ok("Summary: notable developments found for topic three.".to_string()),
        Ok("# Research Report\n\n## Executive Summary\n...\n\n## Conclusion\n...".to_string()),
    ]);
    let aggregator = aggregator_with_fakes();
    let config = DeepResearchConfig::default();

    let result = conduct_deep_research("AI agent coordination methods", &config, &lm, &aggregator).await;

    assert!(result.success);
    assert!(result.notes.len() >= 2);
    assert!(result
        .raw_notes
        .iter()
        .all(|n| n.starts_with("Forced research on:") || n.starts_with("Research on:")));
    assert!(result.raw_notes.iter().any(|n| n.starts_with("Forced research on:")));
}
