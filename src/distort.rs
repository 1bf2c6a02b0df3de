//! Noise injection for probing how BLEU reacts to damaged candidates.

use log::debug;
use rand::prelude::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::bleu::{score_tokens, BleuConfig, BleuResult};
use crate::error::{BleuError, Result};
use crate::tokenizer::tokenize;

pub const UNK: &str = "<unk>";

/// Ratios the `distort` command walks through by default.
pub const DEFAULT_RATIOS: [f64; 3] = [0.1, 0.2, 0.3];

/// Overwrites `round(len * ratio)` randomly picked positions with `<unk>`.
/// Positions are drawn with replacement, so fewer may actually change.
/// `ratio` is clamped to `[0, 1]`.
pub fn distort_tokens<R: Rng + ?Sized>(tokens: &[String], ratio: f64, rng: &mut R) -> Vec<String> {
    let mut distorted = tokens.to_vec();
    let draws = (tokens.len() as f64 * ratio.clamp(0.0, 1.0)).round() as usize;
    for _ in 0..draws {
        if let Some(token) = distorted.choose_mut(rng) {
            *token = UNK.to_string();
        }
    }
    distorted
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistortionPoint {
    pub ratio: f64,
    pub candidate: String,
    pub result: BleuResult,
}

/// Scores the untouched candidate (ratio 0) and one distorted copy per ratio.
pub fn distortion_curve<S, R>(
    candidate: &str,
    references: &[S],
    ratios: &[f64],
    config: &BleuConfig,
    rng: &mut R,
) -> Result<Vec<DistortionPoint>>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    if let Some(ratio) = ratios.iter().find(|r| !(0.0..=1.0).contains(*r)) {
        return Err(BleuError::invalid(format!("distortion ratio {ratio} is outside [0, 1]")));
    }

    let candidate_tokens = tokenize(candidate);
    let reference_tokens: Vec<Vec<String>> = references.iter().map(|r| tokenize(r.as_ref())).collect();

    let mut curve = Vec::with_capacity(ratios.len() + 1);
    for &ratio in std::iter::once(&0.0).chain(ratios) {
        let tokens = if ratio > 0.0 {
            distort_tokens(&candidate_tokens, ratio, rng)
        } else {
            candidate_tokens.clone()
        };
        let result = score_tokens(&tokens, &reference_tokens, config)?;
        debug!("ratio {ratio}: bleu {}", result.bleu_score);
        curve.push(DistortionPoint {
            ratio,
            candidate: tokens.join(" "),
            result,
        });
    }
    Ok(curve)
}
