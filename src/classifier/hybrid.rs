use std::sync::Arc;

use crate::{
    domain::{ClassificationResult, Epoch},
    tasks::generation::GenerationTracker,
};

use super::{
    cache::ClassificationCache,
    fallback::{self, FallbackDetector},
    heuristic::{self, Verdict},
};

/// Script heuristic first, cached results next, external detector last.
pub struct HybridClassifier {
    cache: ClassificationCache,
    fallback: FallbackDetector,
    generation: Arc<GenerationTracker>,
}

impl HybridClassifier {
    pub fn new(
        cache: ClassificationCache,
        fallback: FallbackDetector,
        generation: Arc<GenerationTracker>,
    ) -> Self {
        Self {
            cache,
            fallback,
            generation,
        }
    }

    pub fn cache(&self) -> &ClassificationCache {
        &self.cache
    }

    pub async fn classify(&self, text: &str, epoch: Epoch) -> ClassificationResult {
        let key = self.cache.key_for(text);
        if let Some(hit) = self.cache.get(&key) {
            return hit;
        }

        let result = match heuristic::classify(text) {
            Verdict::Language(lang, confidence) => ClassificationResult::known(lang, confidence),
            Verdict::Unknown => ClassificationResult::unknown(),
            Verdict::Uncertain => {
                let Some(report) = self.fallback.detect(text, epoch).await else {
                    // transient or stale: answer unknown without remembering it
                    return ClassificationResult::unknown();
                };
                if !self.generation.is_current(epoch) {
                    return ClassificationResult::unknown();
                }
                fallback::resolve(&report, text)
            }
        };

        tracing::trace!(
            target: "classifier",
            lang = %result.lang,
            confidence = ?result.confidence,
            "classified"
        );
        self.cache.insert(key, result.clone());
        result
    }
}
