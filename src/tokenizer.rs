//! Word tokenizer used for every candidate and reference.

use std::sync::OnceLock;

use regex::Regex;

/// Lowercases `text`, drops everything that is neither a word character
/// nor whitespace, and splits on whitespace runs.
///
/// A word character is a letter, a number or the underscore. Combining
/// marks (Devanagari vowel signs, anusvara) are not, and are dropped.
///
/// ```
/// use bleu_eval::tokenize;
///
/// assert_eq!(tokenize("The cat, sat!"), vec!["the", "cat", "sat"]);
/// assert!(tokenize("?!").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    static PUNCT: OnceLock<Regex> = OnceLock::new();
    let punct = PUNCT.get_or_init(|| Regex::new(r"[^\p{L}\p{N}_\s]").expect("punctuation pattern is valid"));

    let lowered = text.to_lowercase();
    punct
        .replace_all(&lowered, "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
