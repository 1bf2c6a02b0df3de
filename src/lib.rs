//! Sentence BLEU against one or more reference translations.
//!
//! The scoring path is pure: [`tokenize`] each side, count clipped n-gram
//! matches per order, and combine them with the brevity penalty in
//! [`calculate_bleu`]. The remaining modules drive that core from a
//! translation provider, an evaluation suite, line-aligned corpus files
//! and a noise-injection probe.

pub mod bleu;
pub mod brevity;
pub mod corpus;
pub mod distort;
pub mod error;
pub mod ngram;
pub mod precision;
pub mod suite;
pub mod tokenizer;
pub mod translate;

pub use bleu::{
    calculate_bleu, evaluate, prepare_references, score_tokens, BleuConfig, BleuResult, PrecisionDetails, Quality,
};
pub use brevity::{brevity_penalty, closest_reference_length};
pub use error::{BleuError, Result};
pub use ngram::{count_ngrams, get_ngrams, Ngram, MAX_NGRAM, MAX_ORDER};
pub use precision::{clipped_counts, modified_precision};
pub use tokenizer::tokenize;
pub use translate::{
    translate_and_evaluate, RecordedTranslator, Translation, TranslationEvaluation, TranslationRequest, Translator,
};
