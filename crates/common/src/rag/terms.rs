//! Search-term extraction from raw queries
//!
//! Lower-case, split on whitespace, drop short tokens and function words,
//! keep input order, cap at three. No stemming and no normalization beyond
//! case folding: retrieval matches substrings, so the tokens go to the
//! store as-is.

/// Function words that carry no lexical signal for retrieval
pub const STOP_WORDS: &[&str] = &[
    "what", "is", "the", "according", "to", "how", "does", "in", "of", "and", "or",
];

/// Maximum number of terms handed to retrieval
pub const MAX_TERMS: usize = 3;

/// Extract up to [`MAX_TERMS`] salient search terms from a query.
///
/// Pure function of its input: the same query always yields the same
/// terms. An empty result is legal and means retrieval runs its
/// empty-term policy instead of erroring.
pub fn extract_key_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .take(MAX_TERMS)
        .collect()
}
