//! Utility functions for string processing.

use unicode_normalization::UnicodeNormalization;

/// Normalize a string for search: strip diacritics, lowercase, collapse whitespace.
///
/// This matches the exporter's "simple" encoder closely enough that query
/// terms line up with indexed terms:
/// - "Café" → "cafe"
/// - "naïve  install" → "naive install"
///
/// # Algorithm
///
/// 1. NFD normalize (decompose characters into base + combining marks)
/// 2. Filter out combining marks
/// 3. Lowercase
/// 4. Collapse whitespace
pub fn normalize(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a query into index terms.
///
/// Normalizes, splits on anything that isn't alphanumeric, and drops terms
/// shorter than `min_len` characters (the index never stored those).
/// Duplicates are removed, first occurrence wins.
pub fn tokenize(value: &str, min_len: usize) -> Vec<String> {
    let normalized = normalize(value);
    let mut terms: Vec<String> = Vec::new();
    for term in normalized.split(|c: char| !c.is_alphanumeric()) {
        if term.chars().count() < min_len.max(1) {
            continue;
        }
        if !terms.iter().any(|t| t == term) {
            terms.push(term.to_string());
        }
    }
    terms
}

/// Check if a character is a combining mark (diacritic).
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}
