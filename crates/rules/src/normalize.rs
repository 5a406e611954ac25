use unicode_normalization::UnicodeNormalization;

/// Canonicalize a raw OCR token list into one comparison string.
///
/// Tokens are NFKC-normalized (full-width forms, composed jamo and the like
/// collapse to their canonical shapes), joined with single spaces, and runs
/// of whitespace inside tokens are collapsed.
pub fn normalize_tokens(tokens: &[String]) -> String {
    let joined: Vec<String> = tokens
        .iter()
        .map(|t| t.nfkc().collect::<String>())
        .collect();
    joined
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
