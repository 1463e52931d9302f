use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::domain::Settings;

/// JSON-backed settings snapshot in the data directory.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Defaults overlaid with whatever the stored snapshot provides. A missing file yields
    /// the defaults; an unreadable one is an error.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            tracing::info!(
                target: "storage",
                path = %self.path.display(),
                "저장된 설정이 없어 기본값을 사용합니다"
            );
            return Ok(Settings::default());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read settings {}", self.path.display()))?;
        let settings = serde_json::from_str(&raw)
            .with_context(|| format!("invalid settings file {}", self.path.display()))?;
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let encoded = serde_json::to_string_pretty(settings)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encoded)
            .with_context(|| format!("failed to write settings {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace settings {}", self.path.display()))?;
        Ok(())
    }
}
