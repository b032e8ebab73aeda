//! The closed tool catalog (§3, §4.3) and the deterministic prompt block
//! appended to every LM call describing it.

use crate::core::types::ToolName;

pub struct ToolSpec {
    pub name: ToolName,
    pub signature: &'static str,
    pub description: &'static str,
}

pub fn catalog() -> &'static [ToolSpec] {
    &[
        ToolSpec {
            name: ToolName::WebSearch,
            signature: "web_search(\"query\")",
            description: "Search the general web for a query.",
        },
        ToolSpec {
            name: ToolName::ScholarSearch,
            signature: "scholar_search(\"query\")",
            description: "Search academic/scholarly sources for a query.",
        },
        ToolSpec {
            name: ToolName::NewsSearch,
            signature: "news_search(\"query\")",
            description: "Search recent news coverage for a query.",
        },
        ToolSpec {
            name: ToolName::DocSearch,
            signature: "doc_search(\"query\")",
            description: "Search technical documentation for a query.",
        },
        ToolSpec {
            name: ToolName::Think,
            signature: "think(\"thoughts\")",
            description: "Record a private reasoning note; has no side effect.",
        },
        ToolSpec {
            name: ToolName::ConductResearch,
            signature: "conduct_research(\"research_topic\")",
            description: "Delegate a sub-topic to a focused research sub-agent and return its summary.",
        },
        ToolSpec {
            name: ToolName::ResearchComplete,
            signature: "research_complete(\"summary\")",
            description: "Signal that research is complete, with a final summary.",
        },
    ]
}

/// The deterministic block appended to every LM prompt in the orchestrator
/// (§4.3 "Prompt templating"). Syntax is textual: `USE_TOOL: name(args)`.
pub fn tool_prompt_block() -> String {
    let mut block = String::from(
        "Available tools. To invoke one, write a line of the exact form:\nUSE_TOOL: tool_name(argument)\n\n",
    );
    for spec in catalog() {
        block.push_str(&format!("- {} — {}\n", spec.signature, spec.description));
    }
    block
}
