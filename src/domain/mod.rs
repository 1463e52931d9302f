pub mod item;
pub mod settings;
pub mod types;

pub use item::{ChangeWatcher, ItemHandle, ItemId, SharedItem};
pub use settings::{FilterMode, Settings, SettingsStore};
pub use types::{
    display_label, ClassificationResult, Confidence, Epoch, FilterDecision, QueueSnapshot,
};
