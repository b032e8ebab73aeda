//! Deterministic prompt templates for the four orchestrator phases (§4.4).

use crate::core::types::ResearchMessage;
use crate::tools::tool_prompt_block;

pub fn clarify_prompt(query: &str) -> String {
    format!(
        "You are the clarification gate of a research assistant. Given the user's question below, \
decide whether it is specific enough to research directly.\n\n\
Question: {query}\n\n\
Respond with ONLY a JSON object of the exact shape:\n\
{{\"need_clarification\": boolean, \"question\": string (only if true), \"verification\": string}}\n"
    )
}

pub fn brief_prompt(query: &str) -> String {
    format!(
        "You are planning a research investigation for the question below.\n\n\
Question: {query}\n\n\
Respond with ONLY a JSON object of the exact shape:\n\
{{\"research_brief\": string, \"key_questions\": string[], \"research_scope\": string}}\n"
    )
}

pub fn supervisor_system_prompt(brief: &str, key_questions: &[String], max_concurrent_agents: u32, max_iterations: u32) -> String {
    let questions = if key_questions.is_empty() {
        "(none extracted)".to_string()
    } else {
        key_questions
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}. {}", i + 1, q))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are the supervisor of a multi-agent research effort.\n\n\
Research brief: {brief}\n\n\
Key questions:\n{questions}\n\n\
You may delegate sub-topics to research sub-agents via `conduct_research`, up to roughly {max_concurrent_agents} \
at a time (advisory), across at most {max_iterations} supervisor iterations. When you believe the research is \
sufficient, call `research_complete` with a summary of what was learned.\n\n{tools}",
        tools = tool_prompt_block(),
    )
}

pub fn sub_agent_system_prompt(topic: &str) -> String {
    format!(
        "You are a focused research sub-agent investigating one topic.\n\nTopic: {topic}\n\n\
Use the available search tools to gather evidence, then summarize your findings for this topic. \
Cover both general web sources and scholarly sources where relevant.\n\n{tools}",
        tools = tool_prompt_block(),
    )
}

pub fn coverage_nudge() -> ResearchMessage {
    ResearchMessage::user(
        "You have not yet searched both the general web and scholarly sources for this topic. \
Please invoke web_search and scholar_search before summarizing.",
    )
}

pub fn compression_prompt(topic: &str, conversation: &[ResearchMessage]) -> String {
    let transcript = conversation
        .iter()
        .map(|m| format!("[{:?}] {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "The sub-agent below ran out of iterations while researching the topic \"{topic}\" without \
producing a final summary. Distill the conversation into a concise, structured summary of findings \
for this topic.\n\nConversation:\n{transcript}\n"
    )
}

pub fn report_prompt(brief: &str, notes: &[String]) -> String {
    let joined_notes = notes.join("\n\n---\n\n");
    format!(
        "Write a research report based on the brief and findings below.\n\n\
Research brief: {brief}\n\nFindings:\n{joined_notes}\n\n\
Structure the report with exactly these five sections, as Markdown headings: \
\"## Executive Summary\", \"## Detailed Analysis\", \"## Key Insights\", \
\"## Practical Recommendations\", \"## Conclusion\".\n"
    )
}

/// Deterministic fallback report when the phase-4 LM call fails (§4.4).
pub fn fallback_report(raw_notes: &[String]) -> String {
    let body = if raw_notes.is_empty() {
        "No findings were recorded.".to_string()
    } else {
        raw_notes.join("\n\n")
    };
    format!("# Research Report\n\n## Findings Summary\n\n{}\n", body)
}
