//! Research Orchestrator (C4, §4.4): the four-phase pipeline
//! (clarify → brief → multi-agent research → report) and its single public
//! entry point, `conduct_deep_research`.

mod brief;
mod clarify;
mod prompts;
mod report;
mod subagent;
mod supervisor;

use crate::core::error::ResearchError;
use crate::core::types::{DeepResearchConfig, DeepResearchResult, ResearchState, UnifiedSearchOptions};
use crate::lm::LanguageModel;
use crate::search::UnifiedSearchAggregator;
use std::time::Duration;
use tracing::info;

/// `conductDeepResearch(query) → DeepResearchResult` (§6). Races the whole
/// pipeline against `config.timeout_ms`; no partial result is returned if
/// the top-level timeout fires.
pub async fn conduct_deep_research(
    query: &str,
    config: &DeepResearchConfig,
    lm: &dyn LanguageModel,
    aggregator: &UnifiedSearchAggregator,
) -> DeepResearchResult {
    let timeout = Duration::from_millis(config.timeout_ms);

    match tokio::time::timeout(timeout, run_pipeline(query, config, lm, aggregator)).await {
        Ok(result) => result,
        Err(_) => ResearchError::Timeout(config.timeout_ms).into_result(),
    }
}

async fn run_pipeline(query: &str, config: &DeepResearchConfig, lm: &dyn LanguageModel, aggregator: &UnifiedSearchAggregator) -> DeepResearchResult {
    let trimmed = query.trim();
    if trimmed.chars().count() < 3 {
        return ResearchError::InputInvalid.into_result();
    }

    if let Some(question) = clarify::check_clarification(lm, config, trimmed).await {
        return ResearchError::ClarificationRequired { question }.into_result();
    }

    let brief = brief::build_brief(lm, config, trimmed).await;
    info!(brief = %brief.research_brief, "research brief established");

    let mut state = ResearchState::new(trimmed);
    state.research_brief = Some(brief.research_brief.clone());

    let search_options = UnifiedSearchOptions::new();

    supervisor::run_supervisor(&mut state, lm, aggregator, config, &brief, &search_options).await;

    let final_report = report::build_report(lm, config, &brief.research_brief, &state.notes, &state.raw_notes).await;

    DeepResearchResult {
        success: true,
        research_brief: state.research_brief,
        final_report: Some(final_report),
        notes: state.notes,
        raw_notes: state.raw_notes,
        error: None,
        details: None,
    }
}
