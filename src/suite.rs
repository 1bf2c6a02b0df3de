//! Batch evaluation over a list of translation cases.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::bleu::{BleuConfig, BleuResult};
use crate::error::{BleuError, Result};
use crate::translate::{translate_and_evaluate, RecordedTranslator, TranslationRequest, Translator};

const SOURCE_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteCase {
    pub name: String,
    #[serde(flatten)]
    pub request: TranslationRequest,
    pub references: Vec<String>,
    /// Translation recorded ahead of time, replayed when running offline.
    #[serde(default)]
    pub translation: Option<String>,
}

/// On-disk suite layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteFile {
    #[serde(default)]
    pub config: BleuConfig,
    pub cases: Vec<SuiteCase>,
}

impl SuiteFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let suite: Self = serde_json::from_str(&text)?;
        suite.config.validate()?;
        Ok(suite)
    }

    /// Provider replaying every case's recorded translation.
    pub fn recorded_translator(&self) -> RecordedTranslator {
        let mut translator = RecordedTranslator::new();
        for case in &self.cases {
            match &case.translation {
                Some(text) => translator.record(&case.request.source_text, &case.request.target_lang, text),
                None => warn!("case {:?} has no recorded translation", case.name),
            }
        }
        translator
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CaseStatus {
    Perfect,
    Pass,
    Low,
    Fail,
}

impl CaseStatus {
    pub fn from_score(score: f64) -> Self {
        if score == 1.0 {
            Self::Perfect
        } else if score > 0.5 {
            Self::Pass
        } else if score > 0.0 {
            Self::Low
        } else {
            Self::Fail
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Perfect => "PERFECT",
            Self::Pass => "PASS",
            Self::Low => "LOW",
            Self::Fail => "FAIL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseOutcome {
    pub name: String,
    pub source_text: String,
    pub translation: Option<String>,
    pub bleu: Option<BleuResult>,
    pub status: CaseStatus,
    pub error: Option<String>,
}

impl CaseOutcome {
    pub fn score(&self) -> f64 {
        self.bleu.as_ref().map_or(0.0, |b| b.bleu_score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    pub outcomes: Vec<CaseOutcome>,
    pub total: usize,
    pub succeeded: usize,
    /// Sum of scores over all cases, failures counting as zero.
    pub average_bleu: f64,
}

fn run_case<T: Translator + ?Sized>(translator: &T, case: &SuiteCase, config: &BleuConfig) -> CaseOutcome {
    let result = translate_and_evaluate(translator, &case.request, &case.references, config).and_then(|eval| {
        let bleu = eval
            .bleu_evaluation
            .ok_or_else(|| BleuError::invalid("at least one reference translation is required"))?;
        Ok((eval.translated_text, bleu))
    });

    match result {
        Ok((translation, bleu)) => CaseOutcome {
            name: case.name.clone(),
            source_text: case.request.source_text.clone(),
            translation: Some(translation),
            status: CaseStatus::from_score(bleu.bleu_score),
            bleu: Some(bleu),
            error: None,
        },
        Err(err) => {
            warn!("case {:?} failed: {err}", case.name);
            CaseOutcome {
                name: case.name.clone(),
                source_text: case.request.source_text.clone(),
                translation: None,
                bleu: None,
                status: CaseStatus::Fail,
                error: Some(err.to_string()),
            }
        }
    }
}

/// Runs every case. Individual failures are recorded, never propagated.
pub fn run_suite<T: Translator + ?Sized>(translator: &T, cases: &[SuiteCase], config: &BleuConfig) -> SuiteReport {
    let outcomes: Vec<CaseOutcome> = cases.iter().map(|case| run_case(translator, case, config)).collect();

    let total = outcomes.len();
    let succeeded = outcomes.iter().filter(|o| o.error.is_none()).count();
    let average_bleu = if total == 0 {
        0.0
    } else {
        outcomes.iter().map(CaseOutcome::score).sum::<f64>() / total as f64
    };
    info!("suite finished: {succeeded}/{total} cases scored");

    SuiteReport {
        outcomes,
        total,
        succeeded,
        average_bleu,
    }
}

fn truncate_source(source: &str) -> String {
    if source.chars().count() > SOURCE_WIDTH {
        let head: String = source.chars().take(SOURCE_WIDTH - 3).collect();
        format!("{head}...")
    } else {
        source.to_string()
    }
}

/// Fixed-width text table followed by the summary lines.
pub fn render_report(report: &SuiteReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(120);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<25} | {:<40} | {:<8} | {:<10} | DETAILS",
        "LANGUAGE PAIR", "SOURCE TEXT", "BLEU", "STATUS"
    );
    let _ = writeln!(out, "{rule}");

    for outcome in &report.outcomes {
        let source = truncate_source(&outcome.source_text);
        match (&outcome.bleu, &outcome.error) {
            (Some(bleu), _) => {
                let _ = writeln!(
                    out,
                    "{:<25} | {:<40} | {:<8.4} | {:<10} | {}",
                    outcome.name,
                    source,
                    bleu.bleu_score,
                    outcome.status.as_str(),
                    bleu.precision_details
                );
            }
            (None, err) => {
                let _ = writeln!(
                    out,
                    "{:<25} | {:<40} | {:<8} | {:<10} | {}",
                    outcome.name,
                    source,
                    "ERROR",
                    outcome.status.as_str(),
                    err.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    let _ = writeln!(out, "{}", "-".repeat(120));
    let _ = writeln!(out, "Total Tests: {}", report.total);
    let _ = writeln!(out, "Successful Executions: {}/{}", report.succeeded, report.total);
    let _ = writeln!(out, "Average BLEU Score: {:.4}", report.average_bleu);
    let _ = writeln!(out, "{}", "=".repeat(80));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(name: &str, source: &str, refs: &[&str], translation: Option<&str>) -> SuiteCase {
        SuiteCase {
            name: name.to_string(),
            request: TranslationRequest::new(source).langs("en", "fr"),
            references: refs.iter().map(|r| r.to_string()).collect(),
            translation: translation.map(str::to_string),
        }
    }

    fn suite() -> SuiteFile {
        SuiteFile {
            config: BleuConfig::default(),
            cases: vec![
                case(
                    "perfect",
                    "Machine translation is useful.",
                    &["La traduction automatique est utile."],
                    Some("La traduction automatique est utile."),
                ),
                case(
                    "miss",
                    "I love learning new languages.",
                    &["Me encanta aprender nuevos idiomas."],
                    Some("w x y z q"),
                ),
                case("unrecorded", "Thank you very much.", &["Muito obrigado."], None),
            ],
        }
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(CaseStatus::from_score(1.0), CaseStatus::Perfect);
        assert_eq!(CaseStatus::from_score(0.51), CaseStatus::Pass);
        assert_eq!(CaseStatus::from_score(0.5), CaseStatus::Low);
        assert_eq!(CaseStatus::from_score(0.0), CaseStatus::Fail);
    }

    #[test]
    fn runs_every_case_and_averages_over_total() {
        let suite = suite();
        let translator = suite.recorded_translator();
        assert_eq!(translator.len(), 2);

        let report = run_suite(&translator, &suite.cases, &suite.config);
        assert_eq!(report.total, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.outcomes[0].status, CaseStatus::Perfect);
        assert_eq!(report.outcomes[1].status, CaseStatus::Fail);
        assert_eq!(report.outcomes[2].status, CaseStatus::Fail);
        assert!(report.outcomes[2].error.is_some());
        assert!((report.average_bleu - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn missing_references_is_a_failed_case() {
        let cases = vec![case("no refs", "Machine translation is useful.", &[" "], Some("x"))];
        let mut translator = RecordedTranslator::new();
        translator.record("Machine translation is useful.", "fr", "x");
        let report = run_suite(&translator, &cases, &BleuConfig::default());
        assert_eq!(report.succeeded, 0);
        assert_eq!(report.outcomes[0].status, CaseStatus::Fail);
    }

    #[test]
    fn long_sources_are_truncated() {
        let long = "a".repeat(50);
        let cut = truncate_source(&long);
        assert_eq!(cut.chars().count(), 40);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_source("short"), "short");
    }

    #[test]
    fn report_lists_precisions_and_summary() {
        let suite = suite();
        let report = run_suite(&suite.recorded_translator(), &suite.cases, &suite.config);
        let text = render_report(&report);
        assert!(text.contains("1-gram:1.0, 2-gram:1.0, 3-gram:1.0, 4-gram:1.0"));
        assert!(text.contains("Successful Executions: 2/3"));
        assert!(text.contains("Average BLEU Score: 0.3333"));
    }

    #[test]
    fn parses_suite_json() {
        let json = r#"{
            "config": {"max_n": 2},
            "cases": [{
                "name": "English to German",
                "source_text": "This is a test of the system.",
                "target_lang": "de",
                "references": ["Dies ist ein Test des Systems."],
                "translation": "Dies ist ein Test des Systems."
            }]
        }"#;
        let suite: SuiteFile = serde_json::from_str(json).unwrap();
        assert_eq!(suite.config.max_n, 2);
        assert_eq!(suite.cases[0].request.source_lang, "en");
        assert_eq!(suite.cases[0].request.target_lang, "de");
    }
}
