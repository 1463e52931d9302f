use std::collections::BTreeSet;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Hide,
    #[default]
    Collapse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub enabled: bool,
    pub allowed_langs: BTreeSet<String>,
    pub mode: FilterMode,
    pub hide_unknown: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_langs: ["ko".to_string()].into_iter().collect(),
            mode: FilterMode::Collapse,
            hide_unknown: false,
        }
    }
}

impl Settings {
    pub fn allows(&self, lang: &str) -> bool {
        self.allowed_langs.contains(lang)
    }
}

/// Holds the latest pushed settings snapshot; no history is kept.
#[derive(Debug, Default)]
pub struct SettingsStore {
    current: RwLock<Settings>,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            current: RwLock::new(settings),
        }
    }

    pub fn snapshot(&self) -> Settings {
        self.current.read().clone()
    }

    pub fn replace(&self, settings: Settings) {
        *self.current.write() = settings;
    }
}
