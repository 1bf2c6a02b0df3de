//! Clipped ("modified") n-gram precision.

use std::collections::HashMap;

use crate::ngram::{count_ngrams, NgramCounts};

/// Precision of the candidate's order-`n` n-grams against `references`.
///
/// Each candidate n-gram earns at most as many matches as the most
/// generous single reference contains it. Returns 0.0 when the candidate
/// has no n-grams of this order.
pub fn modified_precision(candidate: &[String], references: &[Vec<String>], n: usize) -> f64 {
    let (clipped, total) = clipped_counts(candidate, references, n);
    if total == 0 {
        return 0.0;
    }
    clipped as f64 / total as f64
}

/// Returns `(clipped_counts, total_counts)` for order `n`.
pub fn clipped_counts(candidate: &[String], references: &[Vec<String>], n: usize) -> (usize, usize) {
    let candidate_counts = count_ngrams(candidate, n);
    if candidate_counts.is_empty() {
        return (0, 0);
    }

    let ceilings = max_reference_counts(references, n);

    candidate_counts
        .iter()
        .fold((0, 0), |(clipped, total), (ngram, &count)| {
            let ceiling = ceilings.get(ngram).copied().unwrap_or(0);
            (clipped + count.min(ceiling), total + count)
        })
}

/// Highest count of each n-gram seen in any one reference.
fn max_reference_counts(references: &[Vec<String>], n: usize) -> NgramCounts<'_> {
    let mut ceilings: NgramCounts<'_> = HashMap::new();
    for reference in references {
        for (ngram, count) in count_ngrams(reference, n) {
            let entry = ceilings.entry(ngram).or_insert(0);
            *entry = (*entry).max(count);
        }
    }
    ceilings
}
