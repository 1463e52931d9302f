use std::{env, str::FromStr, time::Duration};

use chrono_tz::Tz;

use super::env::{
    AppConfig, CerebrasConfig, ConfigError, DirectoryConfig, LoggingConfig, PipelineConfig,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timezone = parse_timezone(env::var("FILTER_TIMEZONE").ok())?;

        let cerebras = CerebrasConfig {
            api_key: env::var("CEREBRAS_API_KEY").ok().filter(|v| !v.is_empty()),
            model: env::var("CEREBRAS_MODEL").unwrap_or_else(|_| "gpt-oss-120b".to_string()),
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            settings_filename: env::var("SETTINGS_FILENAME")
                .unwrap_or_else(|_| "settings.json".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            file_name: env::var("LOG_FILE").unwrap_or_else(|_| "filter.log".to_string()),
        };

        let defaults = PipelineConfig::default();
        let pipeline = PipelineConfig {
            debounce: parse_millis("DEBOUNCE_MS").unwrap_or(defaults.debounce),
            batch_size: parse_num::<usize>("BATCH_SIZE")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.batch_size),
            batch_yield: parse_millis("BATCH_YIELD_MS").unwrap_or(defaults.batch_yield),
            fallback_sample_len: parse_num::<usize>("FALLBACK_SAMPLE_LEN")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.fallback_sample_len),
            cache_key_len: parse_num::<usize>("CACHE_KEY_LEN")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.cache_key_len),
        };

        Ok(Self {
            timezone,
            cerebras,
            directories,
            logging,
            pipeline,
        })
    }
}

fn parse_timezone(raw: Option<String>) -> Result<Tz, ConfigError> {
    match raw.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(name) => name.parse::<Tz>().map_err(|err| ConfigError::Invalid {
            key: "FILTER_TIMEZONE",
            reason: err.to_string(),
        }),
        None => Ok(chrono_tz::Asia::Seoul),
    }
}

fn parse_num<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse::<T>().ok())
}

fn parse_millis(key: &str) -> Option<Duration> {
    parse_num::<u64>(key).map(Duration::from_millis)
}
