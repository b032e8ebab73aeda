//! Tool-call dispatch (§4.3 "Dispatch"). Routes each parsed `ToolCall` to
//! the unified aggregator, an echo, or a sub-agent recursion, and produces
//! exactly one tool-role `ResearchMessage` per call.

use super::format::format_search_results;
use crate::core::types::{ResearchMessage, ToolCall, ToolName, UnifiedSearchOptions};
use crate::search::UnifiedSearchAggregator;
use async_trait::async_trait;

/// Breaks the dependency cycle between the tool dispatcher and the
/// orchestrator: `conduct_research` needs to recurse into the sub-agent
/// loop, which lives in the orchestrator and itself depends on dispatch.
#[async_trait]
pub trait SubAgentRunner: Send + Sync {
    async fn run_sub_agent(&self, topic: &str) -> String;
}

pub async fn dispatch(
    call: &ToolCall,
    aggregator: &UnifiedSearchAggregator,
    runner: &dyn SubAgentRunner,
    base_options: &UnifiedSearchOptions,
) -> ResearchMessage {
    let content = match ToolName::from_str(&call.name) {
        Some(ToolName::WebSearch) => {
            let query = call.arg_str("query").unwrap_or_default();
            let mut options = base_options.clone();
            options.sources = Some(
                ["google", "duckduckgo", "tavily", "langsearch"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            );
            let results = aggregator.search(query, &options).await;
            format_search_results("Web", &results)
        }
        Some(ToolName::ScholarSearch) => {
            let query = call.arg_str("query").unwrap_or_default();
            let results = aggregator.search_scholar(query, base_options).await;
            format_search_results("Scholar", &results)
        }
        Some(ToolName::NewsSearch) => {
            let query = call.arg_str("query").unwrap_or_default();
            let results = aggregator.search_news(query, base_options).await;
            format_search_results("News", &results)
        }
        Some(ToolName::DocSearch) => {
            let query = call.arg_str("query").unwrap_or_default();
            let library = call.arg_str("library");
            let results = aggregator.search_documentation(query, library, base_options).await;
            format_search_results("Documentation", &results)
        }
        Some(ToolName::Think) => {
            format!("Thinking: {}", call.arg_str("thoughts").unwrap_or_default())
        }
        Some(ToolName::ConductResearch) => {
            let topic = call.arg_str("research_topic").unwrap_or_default();
            runner.run_sub_agent(topic).await
        }
        Some(ToolName::ResearchComplete) => {
            call.arg_str("summary").unwrap_or_default().to_string()
        }
        None => format!("Unknown tool: {}", call.name),
    };

    ResearchMessage::tool(content, call.id.clone(), call.name.clone())
}
