use std::io;

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::AppConfig, infrastructure::directories::ResolvedPaths};

static INIT: OnceCell<()> = OnceCell::new();
static GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// HTTP client internals only matter when the detector misbehaves.
const NOISY_TARGETS: &[&str] = &["hyper=warn", "hyper_util=warn", "reqwest=warn", "rustls=warn"];

/// `RUST_LOG` wins; otherwise the configured level with the HTTP stack turned down.
pub fn build_env_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::try_new(directives(level.trim()))
        .unwrap_or_else(|_| EnvFilter::new(directives("info")))
}

fn directives(level: &str) -> String {
    let mut parts = vec![level];
    parts.extend_from_slice(NOISY_TARGETS);
    parts.join(",")
}

/// Console output goes to stderr; stdout carries decisions and command replies.
pub fn init_tracing(config: &AppConfig, paths: &ResolvedPaths) -> Result<()> {
    INIT.get_or_try_init::<_, anyhow::Error>(|| {
        let file_appender =
            tracing_appender::rolling::daily(&paths.logs_dir, &config.logging.file_name);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let _ = GUARD.set(guard);

        tracing_subscriber::registry()
            .with(build_env_filter(&config.logging.level))
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_target(true)
                    .with_ansi(false),
            )
            .init();

        tracing::info!(
            logs = %paths.logs_dir.display(),
            file = %config.logging.file_name,
            data = %paths.data_dir.display(),
            "로그 초기화 완료"
        );
        Ok(())
    })?;
    Ok(())
}
