//! Phase 1 — Clarify (§4.4). Degrades to "proceed, no clarification needed"
//! on any JSON parse failure or LM call failure.

use crate::core::types::DeepResearchConfig;
use crate::lm::LanguageModel;
use serde::Deserialize;
use tracing::warn;

use super::prompts::clarify_prompt;

#[derive(Debug, Deserialize)]
struct ClarificationResponse {
    need_clarification: bool,
    #[serde(default)]
    question: Option<String>,
}

/// Returns `Some(question)` only when the LM explicitly flagged the query
/// as needing clarification; every other outcome (parse failure, LM
/// failure, `need_clarification: false`) is `None`.
pub async fn check_clarification(lm: &dyn LanguageModel, config: &DeepResearchConfig, query: &str) -> Option<String> {
    let prompt = clarify_prompt(query);

    let completion = match lm.generate(&prompt, &config.provider, &config.model).await {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "clarify phase LM call failed, proceeding without clarification");
            return None;
        }
    };

    match serde_json::from_str::<ClarificationResponse>(completion.content.trim()) {
        Ok(parsed) if parsed.need_clarification => {
            Some(parsed.question.unwrap_or_else(|| "Could you clarify your question?".to_string()))
        }
        Ok(_) => None,
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_need_clarification_true() {
        let parsed: ClarificationResponse =
            serde_json::from_str(r#"{"need_clarification": true, "question": "Which area?"}"#).unwrap();
        assert!(parsed.need_clarification);
        assert_eq!(parsed.question.as_deref(), Some("Which area?"));
    }
}
