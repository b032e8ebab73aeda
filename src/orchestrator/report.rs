//! Phase 4 — Report (§4.4). Falls back to a deterministic report on LM
//! failure so a successful invocation always yields a non-empty report.

use crate::core::types::DeepResearchConfig;
use crate::lm::LanguageModel;
use tracing::warn;

use super::prompts::{fallback_report, report_prompt};

pub async fn build_report(lm: &dyn LanguageModel, config: &DeepResearchConfig, brief: &str, notes: &[String], raw_notes: &[String]) -> String {
    let prompt = report_prompt(brief, notes);

    match lm.generate(&prompt, &config.provider, &config.model).await {
        Ok(completion) if !completion.content.trim().is_empty() => completion.content,
        Ok(_) => {
            warn!("report phase LM call returned empty content, using fallback report");
            fallback_report(raw_notes)
        }
        Err(e) => {
            warn!(error = %e, "report phase LM call failed, using fallback report");
            fallback_report(raw_notes)
        }
    }
}
