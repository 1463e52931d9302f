mod console;

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{FilterDecision, ItemId};

pub use console::ConsoleRenderer;

/// Per-item presentation state driven by user toggles, independent of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleState {
    Collapsed,
    Expanded,
}

impl ToggleState {
    pub fn flipped(self) -> Self {
        match self {
            ToggleState::Collapsed => ToggleState::Expanded,
            ToggleState::Expanded => ToggleState::Collapsed,
        }
    }
}

/// Presentation side of the pipeline. Receives decisions, never classifies.
pub trait Renderer: Send + Sync {
    fn apply(&self, decision: FilterDecision);
    fn clear(&self, item: ItemId);
    fn clear_all(&self);
    /// Flips a filtered item between collapsed and expanded. `None` when the item has no
    /// active filter decision.
    fn toggle(&self, item: ItemId) -> Option<ToggleState>;
}

pub type SharedRenderer = Arc<dyn Renderer>;
