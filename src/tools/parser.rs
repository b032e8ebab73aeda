//! Permissive parser turning LM free-text output into typed `ToolCall`s
//! (§4.3). Three complementary patterns are tried in order, and the first
//! that yields any match wins — this avoids double-parsing the same
//! invocation under two patterns at once.

use crate::core::types::{ToolCall, ToolName};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "of", "to", "in", "on", "for",
    "and", "or", "that", "this", "with", "will", "would", "should", "i", "you", "we", "let",
    "lets", "me", "my", "your", "it", "as", "by", "at", "from", "about", "into", "can", "could",
];

fn use_tool_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*USE_TOOL:\s*(\w+)\((.*?)\)\s*$").unwrap())
}

fn bare_call_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(web_search|scholar_search|news_search|doc_search|think|conduct_research|research_complete)\((.*?)\)").unwrap()
    })
}

fn colon_call_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(web_search|scholar_search|news_search|doc_search|think|conduct_research|research_complete):\s*(.+)$").unwrap()
    })
}

/// Parses `text` into a sequence of tool calls, applying the forced-progress
/// guard when nothing parses but the text still expresses research intent.
pub fn parse_tool_calls(text: &str) -> Vec<ToolCall> {
    let calls = parse_explicit_markers(text)
        .or_else(|| parse_bare_calls(text))
        .or_else(|| parse_colon_calls(text))
        .unwrap_or_default();

    if !calls.is_empty() {
        return calls;
    }

    forced_progress_guard(text).into_iter().collect()
}

fn parse_explicit_markers(text: &str) -> Option<Vec<ToolCall>> {
    build_from_matches(use_tool_regex().captures_iter(text))
}

fn parse_bare_calls(text: &str) -> Option<Vec<ToolCall>> {
    build_from_matches(bare_call_regex().captures_iter(text))
}

fn parse_colon_calls(text: &str) -> Option<Vec<ToolCall>> {
    build_from_matches(colon_call_regex().captures_iter(text))
}

fn build_from_matches<'t, I>(captures: I) -> Option<Vec<ToolCall>>
where
    I: Iterator<Item = regex::Captures<'t>>,
{
    let mut out = Vec::new();
    for caps in captures {
        let name = caps.get(1)?.as_str();
        let args_raw = caps.get(2).map(|m| m.as_str()).unwrap_or("").trim();
        let Some(tool_name) = ToolName::from_str(name) else {
            continue;
        };
        if let Some(call) = build_call(tool_name, args_raw) {
            out.push(call);
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Binds `args_raw` to arguments per §4.3(i)-(iii): a single quoted string
/// binds to the tool's conventional parameter; otherwise a JSON object is
/// attempted; otherwise the whole string is the conventional parameter.
/// Calls missing their required (conventional) argument are rejected.
fn build_call(tool_name: ToolName, args_raw: &str) -> Option<ToolCall> {
    let conventional = tool_name.conventional_arg();
    let mut arguments: HashMap<String, serde_json::Value> = HashMap::new();

    if let Some(quoted) = unwrap_quoted_string(args_raw) {
        arguments.insert(conventional.to_string(), serde_json::Value::String(quoted));
    } else if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(args_raw) {
        for (k, v) in map {
            arguments.insert(k, v);
        }
    } else if !args_raw.is_empty() {
        arguments.insert(conventional.to_string(), serde_json::Value::String(args_raw.to_string()));
    }

    let has_required = arguments
        .get(conventional)
        .and_then(|v| v.as_str())
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false);

    if !has_required {
        return None;
    }

    Some(ToolCall::new(tool_name.as_str(), arguments))
}

fn unwrap_quoted_string(s: &str) -> Option<String> {
    let s = s.trim();
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return Some(s[1..s.len() - 1].to_string());
        }
    }
    None
}

/// §4.3 "Forced-progress guard": if parsing yields no calls but the text
/// mentions research/search intent, synthesize one `web_search` call from
/// the first such line.
fn forced_progress_guard(text: &str) -> Option<ToolCall> {
    let lower = text.to_lowercase();
    if !lower.contains("research") && !lower.contains("search") {
        return None;
    }

    let line = text
        .lines()
        .find(|line| {
            let l = line.to_lowercase();
            l.contains("research") || l.contains("search")
        })
        .unwrap_or(text);

    let query: String = line
        .split(|c: char| !c.is_alphanumeric())
        .map(|w| w.to_lowercase())
        .filter(|w| w.len() > 2 && !STOPWORDS.contains(&w.as_str()))
        .take(3)
        .collect::<Vec<_>>()
        .join(" ");

    if query.trim().is_empty() {
        return None;
    }

    let mut arguments = HashMap::new();
    arguments.insert("query".to_string(), serde_json::Value::String(query));
    Some(ToolCall::new(ToolName::WebSearch.as_str(), arguments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_explicit_use_tool_marker() {
        let text = "I should look this up.\nUSE_TOOL: web_search(\"rust async runtimes\")\n";
        let calls = parse_tool_calls(text);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "web_search");
        assert_eq!(calls[0].arg_str("query"), Some("rust async runtimes"));
    }

    #[test]
    fn parses_bare_call_when_no_marker_present() {
        let calls = parse_tool_calls("Let me check: scholar_search(\"few-shot text-to-sql\")");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "scholar_search");
    }

    #[test]
    fn parses_colon_form() {
        let calls = parse_tool_calls("news_search: latest developments in fusion energy");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].arg_str("query"), Some("latest developments in fusion energy"));
    }

    #[test]
    fn rejects_json_call_missing_required_argument() {
        let calls = parse_tool_calls("USE_TOOL: web_search({\"not_query\": \"x\"})");
        assert!(calls.is_empty());
    }

    #[test]
    fn forced_progress_guard_fires_on_bare_research_intent() {
        let calls = parse_tool_calls("I think we should research quantum error correction methods further.");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "web_search");
    }

    #[test]
    fn forced_progress_guard_is_silent_without_intent_words() {
        let calls = parse_tool_calls("Here is a plain sentence with no tool mention at all.");
        assert!(calls.is_empty());
    }
}
