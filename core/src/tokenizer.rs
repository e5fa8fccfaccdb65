use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Anything that is not a letter, digit, underscore or whitespace.
    static ref STRIP: Regex = Regex::new(r"[^\p{L}\p{N}_\s]").expect("valid regex");
}

/// Canonical form of a piece of text: NFKC, lowercase, punctuation removed, trimmed.
///
/// Internal whitespace is kept, so a multi-word input stays multi-word.
/// Returns an empty string when nothing retainable is left.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.nfkc().collect::<String>().to_lowercase();
    STRIP.replace_all(&lowered, "").trim().to_string()
}

/// Split on whitespace runs, normalize each piece and drop the empty ones.
///
/// Order of appearance and duplicates are preserved.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(normalize)
        .filter(|t| !t.is_empty())
        .collect()
}
