use std::collections::HashMap;

use parking_lot::Mutex;

use crate::domain::ClassificationResult;

use super::script::{normalize, truncate_chars};

pub const DEFAULT_KEY_LEN: usize = 100;

/// Text-prefix keyed memo of classification results. Keys are deliberately lossy: two texts
/// sharing the same normalized prefix share an entry.
#[derive(Debug)]
pub struct ClassificationCache {
    key_len: usize,
    entries: Mutex<HashMap<String, ClassificationResult>>,
}

impl ClassificationCache {
    pub fn new(key_len: usize) -> Self {
        Self {
            key_len,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn key_for(&self, text: &str) -> String {
        truncate_chars(&normalize(text), self.key_len).to_string()
    }

    pub fn get(&self, key: &str) -> Option<ClassificationResult> {
        self.entries.lock().get(key).cloned()
    }

    pub fn insert(&self, key: String, result: ClassificationResult) {
        self.entries.lock().insert(key, result);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        let dropped = entries.len();
        entries.clear();
        tracing::debug!(target: "classifier", dropped, "classification cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ClassificationCache {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Confidence;

    #[test]
    fn texts_sharing_a_long_prefix_share_an_entry() {
        let cache = ClassificationCache::new(10);
        let base = "abcdefghij";
        let key = cache.key_for(&format!("{base} first tail"));
        cache.insert(key, ClassificationResult::known("en", Confidence::High));
        let other = cache.key_for(&format!("{base} second tail"));
        assert!(cache.get(&other).is_some());
    }

    #[test]
    fn key_ignores_urls_and_padding() {
        let cache = ClassificationCache::default();
        assert_eq!(cache.key_for("  좋아요 https://a.b/c "), cache.key_for("좋아요"));
    }

    #[test]
    fn clear_drops_every_entry() {
        let cache = ClassificationCache::default();
        cache.insert("a".into(), ClassificationResult::unknown());
        cache.insert("b".into(), ClassificationResult::unknown());
        cache.clear();
        assert!(cache.is_empty());
    }
}
