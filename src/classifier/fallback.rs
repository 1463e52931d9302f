use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    domain::{ClassificationResult, Confidence, Epoch},
    tasks::generation::GenerationTracker,
};

use super::script::{truncate_chars, ScriptCounts};

pub const DEFAULT_SAMPLE_LEN: usize = 200;
const MIN_ACCEPT_PERCENTAGE: f64 = 40.0;
const HIGH_CONFIDENCE_PERCENTAGE: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LanguageCandidate {
    pub language: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DetectionReport {
    #[serde(default)]
    pub languages: Vec<LanguageCandidate>,
}

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("language detector is not configured")]
    Unavailable,
    #[error("language detector request failed: {0}")]
    Request(String),
    #[error("language detector returned malformed output: {0}")]
    Malformed(String),
}

/// External probabilistic language guesser. `Ok(None)` means it declined to answer.
pub trait LanguageDetector: Send + Sync {
    fn detect_language<'a>(
        &'a self,
        sample: &'a str,
    ) -> BoxFuture<'a, Result<Option<DetectionReport>, DetectorError>>;
}

pub type SharedDetector = Arc<dyn LanguageDetector>;

/// Wraps the external detector so that every failure mode collapses into "no result".
pub struct FallbackDetector {
    detector: Option<SharedDetector>,
    generation: Arc<GenerationTracker>,
    sample_len: usize,
}

impl FallbackDetector {
    pub fn new(
        detector: Option<SharedDetector>,
        generation: Arc<GenerationTracker>,
        sample_len: usize,
    ) -> Self {
        Self {
            detector,
            generation,
            sample_len,
        }
    }

    /// Returns `None` when the detector is missing, fails, declines, or when `epoch` stops
    /// being current before it answers.
    pub async fn detect(&self, text: &str, epoch: Epoch) -> Option<DetectionReport> {
        let Some(detector) = self.detector.as_ref() else {
            tracing::debug!(target: "fallback", "detector unavailable");
            return None;
        };
        if !self.generation.is_current(epoch) {
            return None;
        }

        let sample = truncate_chars(text, self.sample_len);
        let mut listener = self.generation.subscribe();
        let outcome = tokio::select! {
            res = detector.detect_language(sample) => res,
            _ = listener.superseded(epoch) => {
                tracing::trace!(target: "fallback", epoch, "generation superseded during detection");
                return None;
            }
        };

        if !self.generation.is_current(epoch) {
            tracing::trace!(target: "fallback", epoch, "discarding stale detection");
            return None;
        }

        match outcome {
            Ok(report) => report,
            Err(err) => {
                tracing::debug!(target: "fallback", error = %err, "detector failed");
                None
            }
        }
    }
}

/// Turns a detector report into a verdict, refusing answers that contradict the script
/// evidence of the full original text.
pub fn resolve(report: &DetectionReport, original: &str) -> ClassificationResult {
    let Some(best) = report
        .languages
        .iter()
        .fold(None::<&LanguageCandidate>, |best, candidate| match best {
            Some(current) if current.percentage >= candidate.percentage => Some(current),
            _ => Some(candidate),
        })
    else {
        return ClassificationResult::unknown();
    };

    let code = normalize_code(&best.language);
    let counts = ScriptCounts::of(original);
    let contradicted = match code.as_str() {
        "ja" => counts.kana() == 0,
        "ko" => counts.hangul == 0,
        _ => false,
    };

    if contradicted {
        tracing::debug!(
            target: "fallback",
            lang = %code,
            percentage = best.percentage,
            "detector verdict rejected by script evidence"
        );
        return ClassificationResult::unknown();
    }
    if code.is_empty() || best.percentage < MIN_ACCEPT_PERCENTAGE {
        return ClassificationResult::unknown();
    }

    let confidence = if best.percentage >= HIGH_CONFIDENCE_PERCENTAGE {
        Confidence::High
    } else {
        Confidence::Medium
    };
    ClassificationResult::known(code, confidence)
}

fn normalize_code(raw: &str) -> String {
    raw.split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}
