//! Sub-agent loop (§4.4 "Sub-agent loop"): one bounded loop per
//! `conduct_research` topic, delegated to by the supervisor loop.

use crate::core::types::{ResearchMessage, SUB_AGENT_MAX_ITERATIONS};
use crate::core::types::{DeepResearchConfig, UnifiedSearchOptions};
use crate::lm::LanguageModel;
use crate::search::UnifiedSearchAggregator;
use crate::tools::{dispatch, format_search_results, parse_tool_calls, SubAgentRunner};
use async_trait::async_trait;
use tracing::warn;

use super::prompts::{compression_prompt, coverage_nudge, sub_agent_system_prompt};

/// Implements `SubAgentRunner` by recursing into another `run_sub_agent_loop`
/// call — the observable recursion the spec describes for nested
/// `conduct_research` invocations, modeled as ordinary async recursion
/// through a trait-object indirection rather than unbounded stack growth.
pub struct Runner<'a> {
    pub lm: &'a dyn LanguageModel,
    pub aggregator: &'a UnifiedSearchAggregator,
    pub config: &'a DeepResearchConfig,
    pub search_options: &'a UnifiedSearchOptions,
}

#[async_trait]
impl<'a> SubAgentRunner for Runner<'a> {
    async fn run_sub_agent(&self, topic: &str) -> String {
        run_sub_agent_loop(topic, self.lm, self.aggregator, self.config, self.search_options).await
    }
}

pub async fn run_sub_agent_loop(
    topic: &str,
    lm: &dyn LanguageModel,
    aggregator: &UnifiedSearchAggregator,
    config: &DeepResearchConfig,
    search_options: &UnifiedSearchOptions,
) -> String {
    let runner = Runner { lm, aggregator, config, search_options };

    let mut conversation = vec![ResearchMessage::system(sub_agent_system_prompt(topic))];
    let mut web_searched = false;
    let mut scholar_searched = false;

    for iteration in 1..=SUB_AGENT_MAX_ITERATIONS {
        let prompt = render_conversation(&conversation);
        let completion = match lm.generate(&prompt, &config.provider, &config.model).await {
            Ok(c) => c,
            Err(e) => {
                warn!(topic, error = %e, "sub-agent LM call failed");
                break;
            }
        };

        let calls = parse_tool_calls(&completion.content);
        conversation.push(ResearchMessage::assistant(completion.content.clone(), calls.clone()));

        if calls.is_empty() {
            let coverage_satisfied = web_searched || scholar_searched;
            if coverage_satisfied || iteration >= 2 {
                return completion.content;
            }

            let forced_results = aggregator
                .search(
                    topic,
                    &UnifiedSearchOptions {
                        sources: Some(vec!["duckduckgo".to_string()]),
                        ..search_options.clone()
                    },
                )
                .await;
            web_searched = true;
            conversation.push(ResearchMessage::tool(
                format_search_results("Web", &forced_results),
                format!("forced_{}", iteration),
                "web_search",
            ));
            conversation.push(ResearchMessage::user("Please summarize the findings above for this topic."));
            continue;
        }

        for call in &calls {
            if call.name == "web_search" {
                web_searched = true;
            }
            if call.name == "scholar_search" {
                scholar_searched = true;
            }
            let tool_message = dispatch(call, aggregator, &runner, search_options).await;
            conversation.push(tool_message);
        }

        if iteration > 2 && !web_searched && !scholar_searched {
            conversation.push(coverage_nudge());
        }
    }

    match lm
        .generate(&compression_prompt(topic, &conversation), &config.provider, &config.model)
        .await
    {
        Ok(completion) => completion.content,
        Err(e) => {
            warn!(topic, error = %e, "sub-agent compression pass failed, falling back to raw transcript");
            conversation
                .iter()
                .filter(|m| matches!(m.role, crate::core::types::Role::Tool))
                .map(|m| m.content.clone())
                .collect::<Vec<_>>()
                .join("\n\n")
        }
    }
}

fn render_conversation(conversation: &[ResearchMessage]) -> String {
    conversation
        .iter()
        .map(|m| format!("[{:?}] {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
