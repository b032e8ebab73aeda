//! Supervisor loop (§4.4 "Supervisor loop"): decomposes the brief into
//! sub-topics, delegates them to sub-agents, and terminates on
//! `research_complete`, the forced-research fallback, or the iteration cap.

use crate::core::types::{DeepResearchConfig, ResearchMessage, ResearchState, ToolName, UnifiedSearchOptions};
use crate::lm::LanguageModel;
use crate::search::UnifiedSearchAggregator;
use crate::tools::{dispatch, parse_tool_calls};
use tracing::warn;

use super::brief::ResearchBrief;
use super::prompts::supervisor_system_prompt;
use super::subagent::{run_sub_agent_loop, Runner};

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "of", "to", "in", "on", "for", "and", "or", "about", "with",
    "me", "tell", "i", "you", "please", "what", "how",
];

pub async fn run_supervisor(
    state: &mut ResearchState,
    lm: &dyn LanguageModel,
    aggregator: &UnifiedSearchAggregator,
    config: &DeepResearchConfig,
    brief: &ResearchBrief,
    search_options: &UnifiedSearchOptions,
) {
    let runner = Runner { lm, aggregator, config, search_options };

    let mut conversation = vec![ResearchMessage::system(supervisor_system_prompt(
        &brief.research_brief,
        &brief.key_questions,
        config.max_concurrent_agents,
        config.max_iterations,
    ))];

    for iteration in 1..=config.max_iterations {
        let prompt = render_conversation(&conversation);

        let calls = match lm.generate(&prompt, &config.provider, &config.model).await {
            Ok(completion) => {
                let calls = parse_tool_calls(&completion.content);
                conversation.push(ResearchMessage::assistant(completion.content, calls.clone()));
                calls
            }
            Err(e) => {
                warn!(error = %e, "supervisor LM call failed, treating as no tool calls this iteration");
                Vec::new()
            }
        };

        if calls.is_empty() && iteration == 1 && state.notes.is_empty() {
            run_forced_research_fallback(state, lm, aggregator, config, search_options).await;
            state.research_iterations = iteration;
            break;
        }

        let mut research_complete = false;
        for call in &calls {
            let tool_message = dispatch(call, aggregator, &runner, search_options).await;

            if call.name == ToolName::ConductResearch.as_str() {
                let topic = call.arg_str("research_topic").unwrap_or_default().to_string();
                state.notes.push(tool_message.content.clone());
                state.raw_notes.push(format!("Research on: {}: {}", topic, tool_message.content));
            }
            if call.name == ToolName::ResearchComplete.as_str() {
                research_complete = true;
            }

            conversation.push(tool_message);
        }

        state.research_iterations = iteration;

        if research_complete {
            break;
        }
    }

    state.supervisor_conversation = conversation;
}

async fn run_forced_research_fallback(
    state: &mut ResearchState,
    lm: &dyn LanguageModel,
    aggregator: &UnifiedSearchAggregator,
    config: &DeepResearchConfig,
    search_options: &UnifiedSearchOptions,
) {
    for topic in forced_research_topics(&state.original_query) {
        let summary = run_sub_agent_loop(&topic, lm, aggregator, config, search_options).await;
        state.notes.push(summary.clone());
        state.raw_notes.push(format!("Forced research on: {}: {}", topic, summary));
    }
}

/// Synthesizes 2-3 sub-topics directly from the user query when the
/// supervisor's first call emits nothing to act on (§4.4).
fn forced_research_topics(query: &str) -> Vec<String> {
    let tokens = significant_tokens(query);
    let core = if tokens.is_empty() { query.to_string() } else { tokens.join(" ") };

    let mut topics = vec![
        format!("Current developments in {}", core),
        format!("Practical applications and future trends in {}", core),
    ];

    let lower = query.to_lowercase();
    if lower.contains("ai") || lower.contains("machine learning") || lower.contains("artificial intelligence") {
        topics.push(format!("Key challenges and ethical considerations in {}", core));
    }

    topics.truncate(3);
    topics
}

fn significant_tokens(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .map(|w| w.to_lowercase())
        .filter(|w| w.len() > 2 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

fn render_conversation(conversation: &[ResearchMessage]) -> String {
    conversation
        .iter()
        .map(|m| format!("[{:?}] {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_topics_include_domain_specific_variant_for_ai_queries() {
        let topics = forced_research_topics("AI agent coordination methods");
        assert_eq!(topics.len(), 3);
        assert!(topics[0].starts_with("Current developments in"));
    }

    #[test]
    fn forced_topics_cap_at_two_without_domain_match() {
        let topics = forced_research_topics("renewable energy storage");
        assert_eq!(topics.len(), 2);
    }
}
