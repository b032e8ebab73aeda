// ---------------------------------------------------------------------------
// ResearchAggregatorConfig — construction-time adapter credentials.
//
// Mirrors the `ShadowDeepResearchConfig::resolve_*` pattern: every field is
// resolved as builder-value -> environment variable -> documented default,
// read once at aggregator-construction time (never inside a call — see
// spec.md §9's design note on ambient state).
// ---------------------------------------------------------------------------

/// Credentials and endpoints for the five search adapters (§4.1, §6).
///
/// Adapters missing required credentials are simply not registered by
/// `UnifiedSearchAggregator::from_config` — DuckDuckGo and Context7 need no
/// credentials and are always registered.
#[derive(Clone, Debug, Default)]
pub struct ResearchAggregatorConfig {
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,
    pub tavily_api_key: Option<String>,
    pub langsearch_api_key: Option<String>,
    pub context7_base_url: Option<String>,
}

impl ResearchAggregatorConfig {
    /// Builds a config by resolving every field from its environment variable.
    ///
    /// Call this once at process start; do not call it per-request — adapter
    /// availability is meant to be a construction-time fact, not something
    /// re-read on every search.
    pub fn from_env() -> Self {
        Self {
            google_api_key: non_empty_env("GOOGLE_CSE_API_KEY"),
            google_cse_id: non_empty_env("GOOGLE_CSE_ID"),
            tavily_api_key: non_empty_env("TAVILY_API_KEY"),
            langsearch_api_key: non_empty_env("LANGSEARCH_API_KEY"),
            context7_base_url: non_empty_env("CONTEXT7_BASE_URL"),
        }
    }

    pub fn google_available(&self) -> bool {
        self.google_api_key.is_some() && self.google_cse_id.is_some()
    }

    pub fn tavily_available(&self) -> bool {
        self.tavily_api_key.is_some()
    }

    pub fn langsearch_available(&self) -> bool {
        self.langsearch_api_key.is_some()
    }

    pub fn context7_base_url_or_default(&self) -> String {
        self.context7_base_url
            .clone()
            .unwrap_or_else(|| "https://context7.com/api".to_string())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Resolves the OpenAI-compatible endpoint for the default `LanguageModel`
/// implementation: JSON-free, env-var-only (the core never reads a config
/// file — that belongs to the surrounding application, which is out of
/// scope per spec.md §1).
#[derive(Clone, Debug)]
pub struct OpenAiCompatibleConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl OpenAiCompatibleConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("OPENAI_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            api_key: non_empty_env("OPENAI_API_KEY"),
        }
    }
}
