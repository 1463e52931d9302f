use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use parking_lot::Mutex;

use crate::{
    domain::{ChangeWatcher, ItemHandle, ItemId, SharedItem},
    pipeline::Command,
};

/// One comment read from the feed.
#[derive(Debug)]
pub struct Comment {
    id: ItemId,
    text: String,
    processed: AtomicBool,
}

impl Comment {
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            processed: AtomicBool::new(false),
        }
    }
}

impl ItemHandle for Comment {
    fn id(&self) -> ItemId {
        self.id
    }

    fn text(&self) -> Option<String> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn is_processed(&self) -> bool {
        self.processed.load(Ordering::Acquire)
    }

    fn set_processed(&self, processed: bool) {
        self.processed.store(processed, Ordering::Release);
    }
}

/// The observed collection: every comment seen on the current page.
#[derive(Debug, Default)]
pub struct CommentFeed {
    next_id: AtomicU64,
    comments: Mutex<Vec<Arc<Comment>>>,
}

impl CommentFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, text: impl Into<String>) -> Arc<Comment> {
        let id = ItemId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let comment = Arc::new(Comment::new(id, text));
        self.comments.lock().push(comment.clone());
        comment
    }

    /// Drops every comment; ids keep increasing so old decisions never alias new ones.
    pub fn clear(&self) {
        self.comments.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.comments.lock().len()
    }
}

impl ChangeWatcher for CommentFeed {
    fn discover(&self) -> Vec<SharedItem> {
        self.comments
            .lock()
            .iter()
            .map(|comment| comment.clone() as SharedItem)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub enum HostInput {
    Comment(String),
    Command(Command),
}
