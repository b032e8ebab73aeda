//! Markdown-like formatting contract for search results fed back to the LM
//! as tool-role message content (§4.4 "Result-formatting contract").

use crate::core::types::SearchResult;

const MAX_SHOWN: usize = 8;

pub fn format_search_results(label: &str, results: &[SearchResult]) -> String {
    let header = format!("## {} Search Results ({} found)", label, results.len());

    if results.is_empty() {
        return format!("{}\n\nNo {} results found.", header, label.to_lowercase());
    }

    let mut out = String::new();
    out.push_str(&header);
    out.push_str("\n\n");

    for (i, r) in results.iter().take(MAX_SHOWN).enumerate() {
        out.push_str(&format!(
            "{}. {}\n   URL: {}\n   Source: {}\n   Relevance: {:.0}%\n   {}\n\n",
            i + 1,
            r.title,
            r.url,
            r.source,
            r.relevance_score * 100.0,
            if r.snippet.trim().is_empty() { "(no snippet)" } else { r.snippet.trim() }
        ));
    }

    if results.len() > MAX_SHOWN {
        out.push_str(&format!("...and {} more results not shown.\n", results.len() - MAX_SHOWN));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_results_yield_explicit_message() {
        let out = format_search_results("Web", &[]);
        assert!(out.contains("No web results found."));
    }

    #[test]
    fn truncates_to_eight_with_trailing_note() {
        let results: Vec<SearchResult> = (0..12)
            .map(|i| SearchResult::new(format!("Title {}", i), format!("https://example.com/{}", i), "google"))
            .collect();
        let out = format_search_results("Web", &results);
        assert!(out.contains("...and 4 more results not shown."));
        assert!(out.contains("Title 0"));
        assert!(!out.contains("Title 8"));
    }
}
