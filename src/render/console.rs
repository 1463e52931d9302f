use std::{
    collections::HashMap,
    io::{self, Write},
};

use parking_lot::Mutex;
use serde::Serialize;

use crate::domain::{FilterDecision, FilterMode, ItemId};

use super::{Renderer, ToggleState};

#[derive(Debug, Clone)]
struct Applied {
    decision: FilterDecision,
    toggle: ToggleState,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum RenderEvent<'a> {
    Decision {
        decision: &'a FilterDecision,
        state: Option<ToggleState>,
    },
    Cleared {
        item_id: ItemId,
    },
    Toggled {
        item_id: ItemId,
        state: ToggleState,
    },
}

/// Writes one JSON line per presentation change to stdout.
pub struct ConsoleRenderer {
    applied: Mutex<HashMap<ItemId, Applied>>,
    quiet: bool,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self {
            applied: Mutex::new(HashMap::new()),
            quiet: false,
        }
    }

    /// Tracks state without printing anything.
    pub fn quiet() -> Self {
        Self {
            applied: Mutex::new(HashMap::new()),
            quiet: true,
        }
    }

    pub fn decision(&self, item: ItemId) -> Option<FilterDecision> {
        self.applied.lock().get(&item).map(|a| a.decision.clone())
    }

    pub fn filtered_count(&self) -> usize {
        self.applied
            .lock()
            .values()
            .filter(|a| a.decision.filtered)
            .count()
    }

    fn emit(&self, event: &RenderEvent<'_>) {
        if self.quiet {
            return;
        }
        match serde_json::to_string(event) {
            Ok(line) => {
                let mut stdout = io::stdout().lock();
                if let Err(err) = writeln!(stdout, "{line}") {
                    tracing::warn!(target: "render", error = %err, "판정 결과 출력 실패");
                }
            }
            Err(err) => {
                tracing::warn!(target: "render", error = %err, "판정 결과 직렬화 실패");
            }
        }
    }
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for ConsoleRenderer {
    fn apply(&self, decision: FilterDecision) {
        let state = decision.filtered.then_some(ToggleState::Collapsed);
        if decision.filtered {
            tracing::info!(
                target: "render",
                item = %decision.item_id,
                label = %decision.display_label,
                mode = ?decision.mode,
                "댓글 필터링"
            );
        }
        self.emit(&RenderEvent::Decision {
            decision: &decision,
            state,
        });
        self.applied.lock().insert(
            decision.item_id,
            Applied {
                decision,
                toggle: ToggleState::Collapsed,
            },
        );
    }

    fn clear(&self, item: ItemId) {
        if self.applied.lock().remove(&item).is_some() {
            self.emit(&RenderEvent::Cleared { item_id: item });
        }
    }

    fn clear_all(&self) {
        let cleared: Vec<ItemId> = self.applied.lock().drain().map(|(id, _)| id).collect();
        for item_id in cleared {
            self.emit(&RenderEvent::Cleared { item_id });
        }
    }

    fn toggle(&self, item: ItemId) -> Option<ToggleState> {
        let state = {
            let mut applied = self.applied.lock();
            let entry = applied.get_mut(&item).filter(|a| a.decision.filtered)?;
            // hidden items have nothing to expand into
            if entry.decision.mode == FilterMode::Hide {
                return None;
            }
            entry.toggle = entry.toggle.flipped();
            entry.toggle
        };
        tracing::debug!(target: "render", item = %item, state = ?state, "toggled");
        self.emit(&RenderEvent::Toggled {
            item_id: item,
            state,
        });
        Some(state)
    }
}
