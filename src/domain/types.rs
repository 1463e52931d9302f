use serde::{Deserialize, Serialize};

use super::{item::ItemId, settings::FilterMode};

/// Generation token captured by every asynchronous operation and queued item.
pub type Epoch = u64;

pub const UNKNOWN_LANG: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub lang: String,
    pub is_unknown: bool,
    pub confidence: Confidence,
}

impl ClassificationResult {
    pub fn known(lang: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            lang: lang.into(),
            is_unknown: false,
            confidence,
        }
    }

    pub fn unknown() -> Self {
        Self {
            lang: UNKNOWN_LANG.to_string(),
            is_unknown: true,
            confidence: Confidence::Low,
        }
    }
}

/// What the renderer is asked to do with a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDecision {
    pub item_id: ItemId,
    pub filtered: bool,
    pub mode: FilterMode,
    pub display_label: String,
}

/// Point-in-time view of the scheduler for status reporting.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct QueueSnapshot {
    pub queued: usize,
    pub draining: bool,
    pub debouncing: bool,
}

pub fn display_label(result: &ClassificationResult) -> String {
    if result.is_unknown {
        return "Unknown".to_string();
    }
    match result.lang.as_str() {
        "ko" => "Korean".to_string(),
        "ja" => "Japanese".to_string(),
        "zh" => "Chinese".to_string(),
        "en" => "English".to_string(),
        UNKNOWN_LANG => "Unknown".to_string(),
        other => other.to_uppercase(),
    }
}
