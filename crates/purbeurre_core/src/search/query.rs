//! Query normalization.
//!
//! # Invariants
//! - Output is lowercase ASCII: accents are decomposed (NFD) and the
//!   combining marks dropped, other non-ASCII code points are dropped too.
//! - French stop words never survive cleaning.
//! - The same folding is applied to stored names (`name_folded`), so a
//!   cleaned query word is always comparable with stored text.

use unicode_normalization::UnicodeNormalization;

/// Words carrying no search meaning.
pub const STOP_WORDS: &[&str] = &[
    "a", "de", "des", "un", "une", "tout", "tous", "les", "la", "le", "qui", "que", "quoi", "ce",
    "ces", "sans", "avec",
];

/// Lowercases `text` and strips accents and other non-ASCII characters.
pub fn fold_text(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(char::is_ascii)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Cleans a free-text query: folds it, then drops stop words.
///
/// Remaining words are joined by a single space. Returns an empty string
/// when nothing meaningful is left.
pub fn clean_query(query: &str) -> String {
    query_words(query).join(" ")
}

/// Returns the meaningful words of a query, in input order.
pub fn query_words(query: &str) -> Vec<String> {
    fold_text(query)
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}
