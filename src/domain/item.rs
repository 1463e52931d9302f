use std::{fmt, sync::Arc};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A discovered content node. The pipeline only relies on identity, the processed marker
/// and text extraction.
pub trait ItemHandle: Send + Sync {
    fn id(&self) -> ItemId;
    fn text(&self) -> Option<String>;
    fn is_processed(&self) -> bool;
    fn set_processed(&self, processed: bool);
}

pub type SharedItem = Arc<dyn ItemHandle>;

/// Source of every item currently present in the observed collection.
pub trait ChangeWatcher: Send + Sync {
    fn discover(&self) -> Vec<SharedItem>;
}
