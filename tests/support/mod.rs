//! Shared fakes for end-to-end orchestrator tests (§8). No network calls:
//! the LM and every adapter are scripted in-memory.

use async_trait::async_trait;
use deep_research_core::adapters::SearchAdapter;
use deep_research_core::core::error::{AdapterError, LmError};
use deep_research_core::core::types::{Completion, SearchOptions, SearchResult};
use deep_research_core::lm::LanguageModel;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Replays a fixed queue of responses, one per call; the last response
/// repeats once the queue is exhausted so a sub-agent loop that overruns
/// its planned script still terminates instead of panicking.
pub struct ScriptedLm {
    responses: Mutex<Vec<Result<String, String>>>,
    calls: AtomicUsize,
}

impl ScriptedLm {
    pub fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for ScriptedLm {
    async fn generate(&self, _prompt: &str, _provider: &str, _model: &str) -> Result<Completion, LmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.responses.lock().unwrap();
        let next = if queue.len() > 1 { queue.remove(0) } else { queue.first().cloned().unwrap_or(Ok(String::new())) };
        match next {
            Ok(content) => Ok(Completion { content }),
            Err(message) => Err(LmError::CallFailed(message)),
        }
    }
}

/// A search adapter that returns a fixed result set (or errors) regardless
/// of query, and can be toggled unavailable.
pub struct FakeAdapter {
    name: &'static str,
    available: bool,
    results: Vec<SearchResult>,
}

impl FakeAdapter {
    pub fn new(name: &'static str, available: bool, results: Vec<SearchResult>) -> Self {
        Self { name, available, results }
    }
}

#[async_trait]
impl SearchAdapter for FakeAdapter {
    async fn search(&self, _query: &str, _options: &SearchOptions) -> Result<Vec<SearchResult>, AdapterError> {
        Ok(self.results.clone())
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn service_name(&self) -> &str {
        self.name
    }
}

pub fn sample_result(source: &str, n: usize) -> SearchResult {
    SearchResult {
        title: format!("{} result {}", source, n),
        url: format!("https://example.com/{}/{}", source, n),
        snippet: format!("Snippet about topic from {} #{}", source, n),
        source: source.to_string(),
        relevance_score: 0.7,
        metadata: Default::default(),
    }
}
