use thiserror::Error;

/// Errors a single search adapter can raise (§4.1, §7 `AdapterFailed`).
///
/// The aggregator catches every variant per-adapter; only `Cancelled` is
/// special-cased by the shared adapter base (treated as an empty, successful
/// result rather than propagated).
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("adapter call cancelled (timeout)")]
    Cancelled,
    #[error("upstream blocked the request: {reason}")]
    Blocked { reason: String },
    #[error("transient network error: {0}")]
    Transient(String),
    #[error("fatal adapter error: {0}")]
    Fatal(String),
}

/// Errors the injected `LanguageModel` collaborator can raise.
#[derive(Debug, Error)]
pub enum LmError {
    #[error("language model call failed: {0}")]
    CallFailed(String),
    #[error("language model response was empty")]
    EmptyResponse,
}

/// Top-level error taxonomy for the orchestrator (§7).
///
/// Every degradation path described in spec.md §7 produces a typed fallback
/// artifact instead of reaching this enum — `ResearchError` is reserved for
/// the handful of conditions that are allowed to fail the whole invocation:
/// `InputInvalid`, `ClarificationRequired`, the invocation-level `Timeout`,
/// and anything truly unexpected (`Uncaught`).
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("Query must be \u{2265}3 chars")]
    InputInvalid,

    #[error("Clarification needed")]
    ClarificationRequired { question: String },

    #[error("research timed out after {0}ms")]
    Timeout(u64),

    #[error(transparent)]
    Uncaught(#[from] anyhow::Error),
}

impl ResearchError {
    /// Maps this error onto the `DeepResearchResult` failure shape (§3, §6).
    pub fn into_result(self) -> crate::core::types::DeepResearchResult {
        use crate::core::types::DeepResearchResult;
        match self {
            ResearchError::InputInvalid => DeepResearchResult::failure("Query must be \u{2265}3 chars"),
            ResearchError::ClarificationRequired { question } => {
                DeepResearchResult::failure_with_details("Clarification needed", question)
            }
            ResearchError::Timeout(ms) => {
                DeepResearchResult::failure(format!("research timed out after {}ms", ms))
            }
            ResearchError::Uncaught(e) => DeepResearchResult::failure(e.to_string()),
        }
    }
}
