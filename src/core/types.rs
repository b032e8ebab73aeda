use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────────────────────────────────────
// Search data model (§3)
// ─────────────────────────────────────────────────────────────────────────────

fn default_relevance_score() -> f64 {
    0.5
}

/// A single hit from any search provider.
///
/// `url` is the identity key for deduplication once normalized (lowercased,
/// trailing slash stripped, fragment removed — see `search::normalize_url`).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    pub source: String,
    #[serde(default = "default_relevance_score")]
    pub relevance_score: f64,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: String::new(),
            source: source.into(),
            relevance_score: default_relevance_score(),
            metadata: HashMap::new(),
        }
    }
}

/// The category a search is restricted to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Web,
    Scholar,
    News,
    Documentation,
    Code,
    Images,
}

impl Default for SearchType {
    fn default() -> Self {
        SearchType::Web
    }
}

/// Request shape for a single-adapter search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub max_results: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub r#type: Option<SearchType>,
    pub language: Option<String>,
    pub date_restrict: Option<String>,
    pub site_search: Option<String>,
    pub file_type: Option<String>,
}

impl SearchOptions {
    pub fn max_results_or_default(&self) -> usize {
        self.max_results.unwrap_or(10)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms.unwrap_or(10_000))
    }
}

/// How the aggregator combines per-adapter result sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineStrategy {
    Merge,
    Interleave,
    Weighted,
}

impl Default for CombineStrategy {
    fn default() -> Self {
        CombineStrategy::Weighted
    }
}

/// Request shape for an aggregator-level search, extending `SearchOptions`.
#[derive(Debug, Clone, Default)]
pub struct UnifiedSearchOptions {
    pub base: SearchOptions,
    /// Enabled provider tags. `None` means "use every registered, available adapter".
    pub sources: Option<Vec<String>>,
    pub combine_strategy: CombineStrategy,
    pub weights: HashMap<String, f64>,
    pub deduplicate: bool,
    pub max_results_per_source: usize,
    pub max_results: usize,
}

impl UnifiedSearchOptions {
    pub fn new() -> Self {
        Self {
            base: SearchOptions::default(),
            sources: None,
            combine_strategy: CombineStrategy::default(),
            weights: HashMap::new(),
            deduplicate: true,
            max_results_per_source: 10,
            max_results: 20,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversation / tool-call model (§3)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

/// A single conversation turn exchanged with the LM.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResearchMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ResearchMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            tool_call_id: None,
            name: None,
        }
    }

    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
        }
    }
}

/// The closed tool catalog (§3, §4.3).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    WebSearch,
    ScholarSearch,
    NewsSearch,
    DocSearch,
    Think,
    ConductResearch,
    ResearchComplete,
}

impl ToolName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::WebSearch => "web_search",
            ToolName::ScholarSearch => "scholar_search",
            ToolName::NewsSearch => "news_search",
            ToolName::DocSearch => "doc_search",
            ToolName::Think => "think",
            ToolName::ConductResearch => "conduct_research",
            ToolName::ResearchComplete => "research_complete",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "web_search" => Some(ToolName::WebSearch),
            "scholar_search" => Some(ToolName::ScholarSearch),
            "news_search" => Some(ToolName::NewsSearch),
            "doc_search" => Some(ToolName::DocSearch),
            "think" => Some(ToolName::Think),
            "conduct_research" => Some(ToolName::ConductResearch),
            "research_complete" => Some(ToolName::ResearchComplete),
            _ => None,
        }
    }

    pub fn all() -> &'static [ToolName] {
        &[
            ToolName::WebSearch,
            ToolName::ScholarSearch,
            ToolName::NewsSearch,
            ToolName::DocSearch,
            ToolName::Think,
            ToolName::ConductResearch,
            ToolName::ResearchComplete,
        ]
    }

    /// The conventional parameter name a bare string argument binds to (§4.3).
    pub fn conventional_arg(&self) -> &'static str {
        match self {
            ToolName::WebSearch | ToolName::ScholarSearch | ToolName::NewsSearch | ToolName::DocSearch => "query",
            ToolName::ConductResearch => "research_topic",
            ToolName::ResearchComplete => "summary",
            ToolName::Think => "thoughts",
        }
    }
}

/// A structured invocation of a named tool, extracted from LM text output.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: HashMap<String, serde_json::Value>) -> Self {
        Self {
            id: format!("call_{}", uuid::Uuid::new_v4()),
            name: name.into(),
            arguments,
        }
    }

    pub fn arg_str(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Orchestration accumulator (§3)
// ─────────────────────────────────────────────────────────────────────────────

/// Orchestration accumulator, exclusively owned by one `conduct_deep_research`
/// invocation; never shared across invocations.
#[derive(Debug, Clone, Default)]
pub struct ResearchState {
    pub original_query: String,
    pub research_brief: Option<String>,
    pub notes: Vec<String>,
    pub raw_notes: Vec<String>,
    pub supervisor_conversation: Vec<ResearchMessage>,
    pub research_iterations: u32,
}

impl ResearchState {
    pub fn new(original_query: impl Into<String>) -> Self {
        Self {
            original_query: original_query.into(),
            ..Default::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Terminal output (§3)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeepResearchResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_brief: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_report: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raw_notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl DeepResearchResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            research_brief: None,
            final_report: None,
            notes: Vec::new(),
            raw_notes: Vec::new(),
            error: Some(error.into()),
            details: None,
        }
    }

    pub fn failure_with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            success: false,
            research_brief: None,
            final_report: None,
            notes: Vec::new(),
            raw_notes: Vec::new(),
            error: Some(error.into()),
            details: Some(details.into()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Invocation configuration (§3, §6)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDepth {
    Basic,
    Advanced,
}

impl Default for SearchDepth {
    fn default() -> Self {
        SearchDepth::Basic
    }
}

/// Immutable per-invocation orchestrator configuration.
#[derive(Debug, Clone)]
pub struct DeepResearchConfig {
    pub provider: String,
    pub model: String,
    /// Supervisor iteration cap (typ. 2-6).
    pub max_iterations: u32,
    /// Advisory hint surfaced in the supervisor system prompt only.
    pub max_concurrent_agents: u32,
    pub search_depth: SearchDepth,
    /// Overall wall-clock budget for the whole invocation.
    pub timeout_ms: u64,
}

impl Default for DeepResearchConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_iterations: 3,
            max_concurrent_agents: 3,
            search_depth: SearchDepth::Basic,
            timeout_ms: 180_000,
        }
    }
}

/// The sub-agent loop is bounded independently of the supervisor (§4.4).
pub const SUB_AGENT_MAX_ITERATIONS: u32 = 5;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Completion {
    pub content: String,
}
