//! Contiguous n-gram windows over token sequences.

use std::collections::HashMap;

/// A borrowed window of `n` tokens; equality and hashing go by content.
pub type Ngram<'a> = &'a [String];

/// Frequency table of n-grams.
pub type NgramCounts<'a> = HashMap<Ngram<'a>, usize>;

/// Default highest n-gram order.
pub const MAX_NGRAM: usize = 4;

/// Largest order a caller may ask for.
pub const MAX_ORDER: usize = 32;

/// All windows of length `n`, left to right, duplicates kept.
///
/// Fewer than `n` tokens (or `n == 0`) yields no windows.
pub fn get_ngrams(tokens: &[String], n: usize) -> Vec<Ngram<'_>> {
    if n == 0 {
        return Vec::new();
    }
    tokens.windows(n).collect()
}

pub fn count_ngrams(tokens: &[String], n: usize) -> NgramCounts<'_> {
    get_ngrams(tokens, n)
        .into_iter()
        .fold(HashMap::new(), |mut acc, ngram| {
            *acc.entry(ngram).or_insert(0) += 1;
            acc
        })
}
