//! Translation provider seam and the translate-then-score flow.

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::bleu::{calculate_bleu, prepare_references, BleuConfig, BleuResult};
use crate::error::{BleuError, Result};

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "hi".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub source_text: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

impl TranslationRequest {
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
        }
    }

    pub fn langs(mut self, source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        self.source_lang = source_lang.into();
        self.target_lang = target_lang.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// Anything that can turn a request into a translation.
///
/// Callers construct one and pass it in; there is no global client.
pub trait Translator {
    fn translate(&self, request: &TranslationRequest) -> Result<Translation>;
}

/// Offline provider that replays translations recorded ahead of time,
/// keyed by source text and target language.
#[derive(Debug, Clone, Default)]
pub struct RecordedTranslator {
    recorded: HashMap<(String, String), String>,
}

impl RecordedTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        source_text: impl Into<String>,
        target_lang: impl Into<String>,
        translated_text: impl Into<String>,
    ) {
        self.recorded.insert(
            (source_text.into().trim().to_string(), target_lang.into()),
            translated_text.into(),
        );
    }

    pub fn len(&self) -> usize {
        self.recorded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty()
    }
}

impl Translator for RecordedTranslator {
    fn translate(&self, request: &TranslationRequest) -> Result<Translation> {
        let key = (request.source_text.trim().to_string(), request.target_lang.clone());
        let translated_text = self.recorded.get(&key).ok_or_else(|| {
            BleuError::computation(format!(
                "no recorded {} translation for {:?}",
                request.target_lang, request.source_text
            ))
        })?;
        Ok(Translation {
            translated_text: translated_text.clone(),
            source_lang: request.source_lang.clone(),
            target_lang: request.target_lang.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationEvaluation {
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
    /// Present only when at least one non-blank reference was given.
    pub bleu_evaluation: Option<BleuResult>,
}

/// Translates `request` and, if references are supplied, scores the result.
pub fn translate_and_evaluate<T, S>(
    translator: &T,
    request: &TranslationRequest,
    references: &[S],
    config: &BleuConfig,
) -> Result<TranslationEvaluation>
where
    T: Translator + ?Sized,
    S: AsRef<str>,
{
    if request.source_text.trim().is_empty() {
        return Err(BleuError::invalid("source text is required"));
    }

    let translation = translator.translate(request)?;
    info!(
        "translated {} -> {}: {:?}",
        translation.source_lang, translation.target_lang, translation.translated_text
    );

    let bleu_evaluation = match prepare_references(references) {
        Ok(references) => Some(calculate_bleu(&translation.translated_text, &references, config.max_n)?),
        Err(_) => {
            debug!("no usable references, skipping BLEU");
            None
        }
    };

    Ok(TranslationEvaluation {
        translated_text: translation.translated_text,
        source_lang: translation.source_lang,
        target_lang: translation.target_lang,
        bleu_evaluation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> RecordedTranslator {
        let mut t = RecordedTranslator::new();
        t.record(
            "Machine translation is useful.",
            "fr",
            "La traduction automatique est utile.",
        );
        t
    }

    #[test]
    fn recorded_translation_is_replayed() {
        let request = TranslationRequest::new(" Machine translation is useful. ").langs("en", "fr");
        let out = translator().translate(&request).unwrap();
        assert_eq!(out.translated_text, "La traduction automatique est utile.");
        assert_eq!(out.target_lang, "fr");
    }

    #[test]
    fn unknown_request_fails() {
        let request = TranslationRequest::new("Machine translation is useful.").langs("en", "de");
        assert!(matches!(
            translator().translate(&request),
            Err(BleuError::Computation { .. })
        ));
    }

    #[test]
    fn scores_when_references_present() {
        let request = TranslationRequest::new("Machine translation is useful.").langs("en", "fr");
        let refs = [
            "La traduction automatique est utile.",
            "La traduction par machine est pratique.",
        ];
        let out = translate_and_evaluate(&translator(), &request, &refs, &BleuConfig::default()).unwrap();
        let bleu = out.bleu_evaluation.unwrap();
        assert_eq!(bleu.bleu_score, 1.0);
    }

    #[test]
    fn skips_scoring_without_references() {
        let request = TranslationRequest::new("Machine translation is useful.").langs("en", "fr");
        let out = translate_and_evaluate(&translator(), &request, &["  "], &BleuConfig::default()).unwrap();
        assert!(out.bleu_evaluation.is_none());
    }

    #[test]
    fn blank_source_is_rejected() {
        let request = TranslationRequest::new("  ");
        let refs: [&str; 0] = [];
        let err = translate_and_evaluate(&translator(), &request, &refs, &BleuConfig::default()).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn request_defaults_from_json() {
        let request: TranslationRequest = serde_json::from_str(r#"{"source_text":"hi"}"#).unwrap();
        assert_eq!(request.source_lang, "en");
        assert_eq!(request.target_lang, "hi");
    }
}
