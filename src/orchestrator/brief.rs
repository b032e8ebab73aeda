//! Phase 2 — Brief (§4.4). On JSON failure, salvages a brief from the raw
//! text and heuristically extracts question-like lines.

use crate::core::types::DeepResearchConfig;
use crate::lm::LanguageModel;
use serde::Deserialize;
use tracing::warn;

use super::prompts::brief_prompt;

pub struct ResearchBrief {
    pub research_brief: String,
    pub key_questions: Vec<String>,
    #[allow(dead_code)]
    pub research_scope: String,
}

#[derive(Debug, Deserialize)]
struct BriefResponse {
    research_brief: String,
    #[serde(default)]
    key_questions: Vec<String>,
    #[serde(default)]
    research_scope: String,
}

const QUESTION_PREFIXES: &[&str] = &["what", "how", "why", "when", "where"];
const MAX_SALVAGED_QUESTIONS: usize = 5;
const DEFAULT_SCOPE: &str = "General exploratory research scoped to the original question.";

pub async fn build_brief(lm: &dyn LanguageModel, config: &DeepResearchConfig, query: &str) -> ResearchBrief {
    let prompt = brief_prompt(query);

    let completion = match lm.generate(&prompt, &config.provider, &config.model).await {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "brief phase LM call failed, salvaging from query");
            return ResearchBrief {
                research_brief: query.to_string(),
                key_questions: Vec::new(),
                research_scope: DEFAULT_SCOPE.to_string(),
            };
        }
    };

    match serde_json::from_str::<BriefResponse>(completion.content.trim()) {
        Ok(parsed) => ResearchBrief {
            research_brief: parsed.research_brief,
            key_questions: parsed.key_questions,
            research_scope: if parsed.research_scope.trim().is_empty() {
                DEFAULT_SCOPE.to_string()
            } else {
                parsed.research_scope
            },
        },
        Err(_) => ResearchBrief {
            research_brief: completion.content.clone(),
            key_questions: salvage_question_lines(&completion.content),
            research_scope: DEFAULT_SCOPE.to_string(),
        },
    }
}

fn salvage_question_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| line.ends_with('?'))
        .filter(|line| {
            let lower = line.to_lowercase();
            QUESTION_PREFIXES.iter().any(|p| lower.starts_with(p))
        })
        .take(MAX_SALVAGED_QUESTIONS)
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salvages_question_prefixed_lines_capped_at_five() {
        let text = "What is X?\nIrrelevant line.\nHow does Y work?\nWhy does Z matter?\n\
When will W ship?\nWhere is V deployed?\nWhat about another one?";
        let qs = salvage_question_lines(text);
        assert_eq!(qs.len(), 5);
        assert_eq!(qs[0], "What is X?");
    }
}
