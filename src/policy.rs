use crate::domain::{ClassificationResult, Confidence, Settings};

/// Decides whether a classified item should be hidden or collapsed.
pub fn should_filter(result: &ClassificationResult, settings: &Settings) -> bool {
    if result.is_unknown {
        return settings.hide_unknown;
    }
    if result.confidence == Confidence::Low && !settings.hide_unknown {
        return false;
    }
    !settings.allows(&result.lang)
}
