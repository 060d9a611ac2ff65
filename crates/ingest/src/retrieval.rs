//! Keyword fragment retrieval.
//!
//! Text is cut on every literal `.` (abbreviations and decimals included) and
//! each piece is kept when it contains the query as a plain substring. There
//! is no ranking: matches come back in document order.

use tutor_core::config::RetrievalConfig;

/// Returned as the only fragment when nothing matches.
pub const NO_RELEVANT_INFORMATION: &str = "No relevant information found in the content.";

/// Return up to `config.max_fragments` period-delimited fragments of `text`
/// that contain `query` (case-insensitive) and are longer than
/// `config.min_fragment_chars` characters once trimmed.
pub fn retrieve(query: &str, text: &str, config: &RetrievalConfig) -> Vec<String> {
    let query = query.to_lowercase();

    let matches: Vec<String> = text
        .split('.')
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() > config.min_fragment_chars)
        .filter(|fragment| fragment.to_lowercase().contains(&query))
        .take(config.max_fragments)
        .map(str::to_string)
        .collect();

    if matches.is_empty() {
        tracing::debug!("No fragment matched query '{}'", query);
        return vec![NO_RELEVANT_INFORMATION.to_string()];
    }

    matches
}

/// True when `fragments` is the single no-match marker.
pub fn is_sentinel(fragments: &[String]) -> bool {
    matches!(fragments, [only] if only == NO_RELEVANT_INFORMATION)
}
