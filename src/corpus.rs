//! Line-aligned hypothesis/reference files, scored sentence by sentence.
//!
//! References are read from `STEM` if it exists, otherwise from `STEM0`,
//! `STEM1`, ... until the first missing or empty file.

use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::bleu::{calculate_bleu, prepare_references, BleuConfig, BleuResult};
use crate::error::{BleuError, Result};

fn read_lines(path: &Path) -> Result<Vec<String>> {
    Ok(fs::read_to_string(path)?.lines().map(str::to_string).collect())
}

/// One entry per reference file, each holding one line per sentence.
pub fn load_references(stem: &Path) -> Result<Vec<Vec<String>>> {
    if stem.is_file() {
        return Ok(vec![read_lines(stem)?]);
    }

    let mut references = Vec::new();
    loop {
        let path = PathBuf::from(format!("{}{}", stem.display(), references.len()));
        if !path.is_file() {
            break;
        }
        let lines = read_lines(&path)?;
        if lines.is_empty() {
            break;
        }
        references.push(lines);
    }

    if references.is_empty() {
        return Err(BleuError::invalid(format!(
            "no reference files found for {}",
            stem.display()
        )));
    }
    Ok(references)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceScore {
    /// Zero-based line number.
    pub line: usize,
    pub result: BleuResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLine {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorpusReport {
    pub scores: Vec<SentenceScore>,
    pub skipped: Vec<SkippedLine>,
}

impl CorpusReport {
    /// Mean sentence BLEU over scored lines.
    pub fn average_bleu(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().map(|s| s.result.bleu_score).sum::<f64>() / self.scores.len() as f64
    }
}

/// Scores each hypothesis line against the same line of every reference.
///
/// Lines that cannot be scored (blank hypothesis, no usable reference,
/// hypothesis with no tokens) are recorded as skipped; I/O errors abort.
pub fn score_lines<R: BufRead>(
    hypotheses: R,
    references: &[Vec<String>],
    config: &BleuConfig,
) -> Result<CorpusReport> {
    let mut report = CorpusReport::default();

    for (line_no, hypothesis) in hypotheses.lines().enumerate() {
        let hypothesis = hypothesis?;
        let refs: Vec<&str> = references
            .iter()
            .filter_map(|lines| lines.get(line_no).map(String::as_str))
            .collect();

        let scored = if hypothesis.trim().is_empty() {
            Err(BleuError::invalid("candidate translation is required"))
        } else {
            prepare_references(&refs).and_then(|refs| calculate_bleu(&hypothesis, &refs, config.max_n))
        };

        match scored {
            Ok(result) => report.scores.push(SentenceScore {
                line: line_no,
                result,
            }),
            Err(err) if err.is_input_error() => {
                warn!("skipping line {line_no}: {err}");
                report.skipped.push(SkippedLine {
                    line: line_no,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }

        if line_no % 10000 == 0 {
            info!("processing sentence: {line_no}");
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn refs(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn scores_each_line_against_aligned_references() {
        let references = vec![
            refs(&["the cat sat on the mat", "a b c d"]),
            refs(&["there is a cat on the mat", "w x y z"]),
        ];
        let hyps = Cursor::new("the cat sat on the mat\nq r s t\n");
        let report = score_lines(hyps, &references, &BleuConfig::default()).unwrap();
        assert_eq!(report.scores.len(), 2);
        assert_eq!(report.scores[0].result.bleu_score, 1.0);
        assert_eq!(report.scores[1].result.bleu_score, 0.0);
        assert_eq!(report.average_bleu(), 0.5);
    }

    #[test]
    fn blank_and_unreferenced_lines_are_skipped() {
        let references = vec![refs(&["one two three four", "five six"])];
        let hyps = Cursor::new("one two three four\n\n!!!\nseven\n");
        let report = score_lines(hyps, &references, &BleuConfig::default()).unwrap();
        assert_eq!(report.scores.len(), 1);
        let skipped: Vec<usize> = report.skipped.iter().map(|s| s.line).collect();
        assert_eq!(skipped, vec![1, 2, 3]);
    }

    #[test]
    fn loads_single_reference_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref");
        fs::write(&path, "a b\nc d\n").unwrap();
        let loaded = load_references(&path).unwrap();
        assert_eq!(loaded, vec![refs(&["a b", "c d"])]);
    }

    #[test]
    fn loads_numbered_reference_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ref0"), "a b\n").unwrap();
        fs::write(dir.path().join("ref1"), "c d\n").unwrap();
        fs::write(dir.path().join("ref3"), "never read\n").unwrap();
        let loaded = load_references(&dir.path().join("ref")).unwrap();
        assert_eq!(loaded, vec![refs(&["a b"]), refs(&["c d"])]);
    }

    #[test]
    fn missing_references_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_references(&dir.path().join("nothing")).unwrap_err();
        assert!(matches!(err, BleuError::InvalidInput { .. }));
    }
}
