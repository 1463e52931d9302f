use std::collections::{HashSet, VecDeque};

use crate::domain::{ItemId, SharedItem};

/// Discovery-ordered queue of items waiting for classification. An item is admitted at
/// most once and never when it is already marked processed. Items handed out in a batch
/// stay known to the queue until they are settled.
#[derive(Default)]
pub struct ItemQueue {
    items: VecDeque<SharedItem>,
    known: HashSet<ItemId>,
}

impl ItemQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the survivors of deduplication and returns how many were admitted.
    pub fn extend(&mut self, items: impl IntoIterator<Item = SharedItem>) -> usize {
        let mut added = 0;
        for item in items {
            if item.is_processed() || !self.known.insert(item.id()) {
                continue;
            }
            self.items.push_back(item);
            added += 1;
        }
        added
    }

    pub fn take_batch(&mut self, size: usize) -> Vec<SharedItem> {
        let take = size.min(self.items.len());
        self.items.drain(..take).collect()
    }

    /// Forgets an item that left the queue in a batch.
    pub fn settle(&mut self, id: ItemId) {
        self.known.remove(&id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.known.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
