//! Sentence-level BLEU: clipped precisions for orders 1..=N, combined by
//! geometric mean and scaled by the brevity penalty.

use std::fmt;

use log::debug;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::brevity::brevity_penalty;
use crate::error::{BleuError, Result};
use crate::ngram::{MAX_NGRAM, MAX_ORDER};
use crate::precision::modified_precision;
use crate::tokenizer::tokenize;

/// Scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BleuConfig {
    /// Highest n-gram order, inclusive.
    pub max_n: usize,
}

impl Default for BleuConfig {
    fn default() -> Self {
        Self { max_n: MAX_NGRAM }
    }
}

impl BleuConfig {
    pub fn new(max_n: usize) -> Result<Self> {
        let config = Self { max_n };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_n == 0 {
            return Err(BleuError::invalid("maximum n-gram order must be at least 1"));
        }
        if self.max_n > MAX_ORDER {
            return Err(BleuError::invalid(format!(
                "maximum n-gram order {} exceeds {MAX_ORDER}",
                self.max_n
            )));
        }
        Ok(())
    }
}

/// Per-order precision, reported in increasing order of n.
///
/// Serialises as a JSON object keyed `"1-gram"`, `"2-gram"`, ...
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecisionDetails(Vec<(String, f64)>);

impl PrecisionDetails {
    fn push(&mut self, n: usize, precision: f64) {
        self.0.push((format!("{n}-gram"), precision));
    }

    /// Rounded precision for order `n`.
    pub fn order(&self, n: usize) -> Option<f64> {
        self.get(&format!("{n}-gram"))
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|(l, _)| l == label).map(|&(_, p)| p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(l, p)| (l.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PrecisionDetails {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, precision) in &self.0 {
            map.serialize_entry(label, precision)?;
        }
        map.end()
    }
}

impl fmt::Display for PrecisionDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(l, p)| format!("{l}:{p:?}")).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Outcome of one scoring call. Scores are rounded to four decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BleuResult {
    pub bleu_score: f64,
    pub brevity_penalty: f64,
    pub precision_details: PrecisionDetails,
    pub candidate_length: usize,
    /// Token count of the first reference, whichever reference was closest.
    pub reference_length: usize,
}

impl BleuResult {
    pub fn quality(&self) -> Quality {
        Quality::from_score(self.bleu_score)
    }
}

/// Coarse reading of a BLEU score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Quality {
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            Self::Poor
        } else if score < 0.5 {
            Self::Fair
        } else if score < 0.7 {
            Self::Good
        } else {
            Self::Excellent
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor Quality",
            Self::Fair => "Fair Quality",
            Self::Good => "Good Quality",
            Self::Excellent => "Excellent Quality",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Four-decimal rounding of the exact value, ties to even.
pub(crate) fn round4(value: f64) -> f64 {
    format!("{value:.4}").parse().unwrap_or(value)
}

/// Tokenizes `candidate` and every reference, then scores them.
///
/// ```
/// use bleu_eval::calculate_bleu;
///
/// let result = calculate_bleu("the cat sat on the mat", &["the cat sat on the mat"], 4).unwrap();
/// assert_eq!(result.bleu_score, 1.0);
/// ```
pub fn calculate_bleu<S: AsRef<str>>(candidate: &str, references: &[S], max_n: usize) -> Result<BleuResult> {
    let config = BleuConfig::new(max_n)?;
    let candidate_tokens = tokenize(candidate);
    let reference_tokens: Vec<Vec<String>> = references.iter().map(|r| tokenize(r.as_ref())).collect();
    score_tokens(&candidate_tokens, &reference_tokens, &config)
}

/// Scores pre-tokenized input.
pub fn score_tokens(candidate: &[String], references: &[Vec<String>], config: &BleuConfig) -> Result<BleuResult> {
    config.validate()?;
    if references.is_empty() {
        return Err(BleuError::invalid("at least one reference translation is required"));
    }
    if candidate.is_empty() {
        return Err(BleuError::DegenerateLength);
    }

    let candidate_length = candidate.len();
    let reference_lengths: Vec<usize> = references.iter().map(Vec::len).collect();

    let mut precisions = Vec::with_capacity(config.max_n);
    let mut precision_details = PrecisionDetails::default();
    for n in 1..=config.max_n {
        let precision = modified_precision(candidate, references, n);
        debug!("{n}-gram precision = {precision}");
        precisions.push(precision);
        precision_details.push(n, round4(precision));
    }

    let bp = brevity_penalty(candidate_length, &reference_lengths)?;
    debug!("candidate_length={candidate_length} reference_lengths={reference_lengths:?} bp={bp}");

    let bleu_score = if precisions.iter().all(|&p| p > 0.0) {
        let mean_log = precisions.iter().map(|p| p.ln()).sum::<f64>() / config.max_n as f64;
        let score = bp * mean_log.exp();
        if !score.is_finite() {
            return Err(BleuError::computation(format!("non-finite BLEU score {score}")));
        }
        score
    } else {
        0.0
    };

    Ok(BleuResult {
        bleu_score: round4(bleu_score),
        brevity_penalty: round4(bp),
        precision_details,
        candidate_length,
        reference_length: reference_lengths[0],
    })
}

/// Trims references and drops the blank ones; fails if none are left.
pub fn prepare_references<S: AsRef<str>>(references: &[S]) -> Result<Vec<String>> {
    let prepared: Vec<String> = references
        .iter()
        .map(|r| r.as_ref().trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();
    if prepared.is_empty() {
        return Err(BleuError::invalid("at least one reference translation is required"));
    }
    Ok(prepared)
}

/// Checked entry point: validates raw caller input before scoring.
pub fn evaluate<S: AsRef<str>>(candidate: &str, references: &[S], config: &BleuConfig) -> Result<BleuResult> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return Err(BleuError::invalid("candidate translation is required"));
    }
    let references = prepare_references(references)?;
    calculate_bleu(candidate, &references, config.max_n)
}
