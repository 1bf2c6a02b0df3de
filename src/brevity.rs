//! Brevity penalty against the closest reference length.

use crate::error::{BleuError, Result};

/// Reference length with the smallest distance to `candidate_length`.
/// Ties go to the earliest reference.
pub fn closest_reference_length(candidate_length: usize, reference_lengths: &[usize]) -> Option<usize> {
    reference_lengths
        .iter()
        .copied()
        .min_by_key(|&len| len.abs_diff(candidate_length))
}

/// `1.0` when the candidate is at least as long as the closest reference,
/// otherwise `exp(1 - r / c)`.
///
/// Fails with [`BleuError::DegenerateLength`] for an empty candidate and
/// [`BleuError::InvalidInput`] when there are no references.
pub fn brevity_penalty(candidate_length: usize, reference_lengths: &[usize]) -> Result<f64> {
    let closest = closest_reference_length(candidate_length, reference_lengths)
        .ok_or_else(|| BleuError::invalid("at least one reference length is required"))?;

    if candidate_length >= closest {
        return Ok(1.0);
    }
    if candidate_length == 0 {
        return Err(BleuError::DegenerateLength);
    }
    Ok((1.0 - closest as f64 / candidate_length as f64).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longer_candidate_is_not_penalised() {
        assert_eq!(brevity_penalty(7, &[6]).ok(), Some(1.0));
        assert_eq!(brevity_penalty(6, &[6]).ok(), Some(1.0));
    }

    #[test]
    fn shorter_candidate_is_penalised() {
        let bp = brevity_penalty(3, &[6]).ok();
        assert_eq!(bp, Some((1.0f64 - 2.0).exp()));
    }

    #[test]
    fn picks_closest_reference() {
        // 5 is closer to 4 than 10 is
        assert_eq!(closest_reference_length(4, &[10, 5]), Some(5));
        let bp = brevity_penalty(4, &[10, 5]).ok();
        assert_eq!(bp, Some((1.0f64 - 5.0 / 4.0).exp()));
    }

    #[test]
    fn ties_go_to_first_reference() {
        assert_eq!(closest_reference_length(5, &[6, 4]), Some(6));
        assert_eq!(closest_reference_length(5, &[4, 6]), Some(4));
    }

    #[test]
    fn empty_candidate_is_degenerate() {
        assert!(matches!(brevity_penalty(0, &[3]), Err(BleuError::DegenerateLength)));
    }

    #[test]
    fn no_references_is_invalid() {
        assert!(matches!(
            brevity_penalty(3, &[]),
            Err(BleuError::InvalidInput { .. })
        ));
    }
}
