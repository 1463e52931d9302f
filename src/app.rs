use std::{sync::Arc, time::Duration};

use anyhow::Result;
use reqwest::Client;

use crate::{
    ai::CerebrasDetector,
    classifier::SharedDetector,
    config::AppConfig,
    host::{CommentFeed, HostService},
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
    pipeline::FilterCore,
    render::ConsoleRenderer,
    storage::SettingsFile,
};

const INITIAL_CONTEXT: &str = "stdin";

pub struct CommentFilterApp {
    _paths: ResolvedPaths,
    core: Arc<FilterCore>,
    host: HostService,
    shutdown: Shutdown,
    drain_timeout: Duration,
}

impl CommentFilterApp {
    pub fn initialize(config: AppConfig, paths: ResolvedPaths, shutdown: Shutdown) -> Result<Self> {
        let settings_file = SettingsFile::new(paths.settings_path.clone());
        let settings = settings_file.load()?;

        let detector: Option<SharedDetector> = match config.cerebras.api_key {
            Some(_) => {
                let http_client = Client::builder()
                    .user_agent(format!("langgate/{}", env!("CARGO_PKG_VERSION")))
                    .build()?;
                Some(Arc::new(CerebrasDetector::new(
                    http_client,
                    config.cerebras.clone(),
                )))
            }
            None => {
                tracing::warn!(
                    target: "fallback",
                    "CEREBRAS_API_KEY가 없어 애매한 댓글은 unknown으로 처리합니다"
                );
                None
            }
        };

        let feed = Arc::new(CommentFeed::new());
        let renderer = Arc::new(ConsoleRenderer::new());
        let drain_timeout = config.pipeline.debounce * 10 + Duration::from_secs(5);
        let core = Arc::new(FilterCore::new(
            settings,
            detector,
            renderer,
            feed.clone(),
            config.pipeline.clone(),
            INITIAL_CONTEXT,
        ));
        let host = HostService::new(core.clone(), feed, settings_file, config.timezone);

        Ok(Self {
            _paths: paths,
            core,
            host,
            shutdown,
            drain_timeout,
        })
    }

    pub async fn run(self) -> Result<()> {
        let CommentFilterApp {
            _paths: _,
            core,
            host,
            shutdown,
            drain_timeout,
        } = self;

        let epoch = core.activate();
        tracing::info!(generation = epoch, "댓글 언어 필터 시작");

        let result = host.run(shutdown.subscribe()).await;
        if let Err(err) = &result {
            tracing::error!(target: "host", error = %err, "입력 처리 루프 오류");
        }

        if !shutdown.subscribe().is_triggered() && !host.wait_idle(drain_timeout).await {
            tracing::warn!(
                target: "scheduler",
                "대기 중인 댓글을 {:?} 내에 처리하지 못했습니다",
                drain_timeout
            );
        }
        shutdown.trigger();

        tracing::info!(status = ?core.status().queue, "댓글 언어 필터 종료 완료");
        result
    }
}
