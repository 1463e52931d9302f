use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub timezone: Tz,
    pub cerebras: CerebrasConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone)]
pub struct CerebrasConfig {
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
    pub settings_filename: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file_name: String,
}

/// Timing and sizing knobs of the classification pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub debounce: Duration,
    pub batch_size: usize,
    pub batch_yield: Duration,
    pub fallback_sample_len: usize,
    pub cache_key_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(200),
            batch_size: 20,
            batch_yield: Duration::from_millis(10),
            fallback_sample_len: 200,
            cache_key_len: 100,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
