//! The filter core: one context value owning settings, cache, generation tracking and the
//! scheduler, driven by host commands.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::{
    classifier::{ClassificationCache, FallbackDetector, HybridClassifier, SharedDetector},
    config::PipelineConfig,
    domain::{ChangeWatcher, Epoch, ItemId, QueueSnapshot, Settings, SettingsStore, SharedItem},
    render::{SharedRenderer, ToggleState},
    tasks::{GenerationTracker, IncrementalScheduler},
};

#[derive(Debug, Clone)]
pub enum Command {
    SettingsUpdated(Settings),
    Rescan,
    Ping,
    Navigate(String),
    Toggle(ItemId),
    Status,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PingReply {
    pub timestamp: DateTime<Utc>,
    pub context: String,
    pub generation: Epoch,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub context: String,
    pub generation: Epoch,
    pub queue: QueueSnapshot,
    pub cached: usize,
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reply", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CommandReply {
    Reprocessed { generation: Epoch },
    Navigated { generation: Epoch },
    Pong(PingReply),
    Toggled { item_id: ItemId, state: Option<ToggleState> },
    Status(StatusReport),
}

pub struct FilterCore {
    context: RwLock<String>,
    settings: Arc<SettingsStore>,
    generation: Arc<GenerationTracker>,
    classifier: Arc<HybridClassifier>,
    scheduler: Arc<IncrementalScheduler>,
    renderer: SharedRenderer,
    watcher: Arc<dyn ChangeWatcher>,
}

impl FilterCore {
    pub fn new(
        settings: Settings,
        detector: Option<SharedDetector>,
        renderer: SharedRenderer,
        watcher: Arc<dyn ChangeWatcher>,
        config: PipelineConfig,
        context: impl Into<String>,
    ) -> Self {
        let generation = Arc::new(GenerationTracker::new());
        let settings = Arc::new(SettingsStore::new(settings));
        let classifier = Arc::new(HybridClassifier::new(
            ClassificationCache::new(config.cache_key_len),
            FallbackDetector::new(detector, generation.clone(), config.fallback_sample_len),
            generation.clone(),
        ));
        let scheduler = Arc::new(IncrementalScheduler::new(
            generation.clone(),
            classifier.clone(),
            settings.clone(),
            renderer.clone(),
            config,
        ));
        Self {
            context: RwLock::new(context.into()),
            settings,
            generation,
            classifier,
            scheduler,
            renderer,
            watcher,
        }
    }

    /// Starts the first generation and picks up everything already present.
    pub fn activate(&self) -> Epoch {
        let epoch = self.begin_generation();
        let queued = self.scheduler.enqueue(self.watcher.discover(), epoch);
        tracing::info!(target: "core", epoch, queued, "필터 코어 활성화");
        epoch
    }

    /// Reports items that just appeared in the observed collection.
    pub fn discovered(&self, items: Vec<SharedItem>) -> usize {
        self.scheduler.enqueue(items, self.generation.current())
    }

    /// The host moved to another page or context; the watcher already reflects it.
    pub fn navigate(&self, context: impl Into<String>) -> Epoch {
        let context = context.into();
        *self.context.write() = context.clone();
        let epoch = self.begin_generation();
        self.classifier.cache().clear();
        self.renderer.clear_all();
        let queued = self.scheduler.enqueue(self.watcher.discover(), epoch);
        tracing::info!(target: "core", epoch, queued, context = %context, "페이지 이동 감지, 새 세대 시작");
        epoch
    }

    pub fn apply_settings(&self, settings: Settings) -> Epoch {
        tracing::info!(
            target: "core",
            enabled = settings.enabled,
            allowed = ?settings.allowed_langs,
            mode = ?settings.mode,
            hide_unknown = settings.hide_unknown,
            "설정이 변경되었습니다"
        );
        self.settings.replace(settings);
        self.reprocess_all()
    }

    /// Forgets every decision and classification and starts over under a new generation.
    pub fn reprocess_all(&self) -> Epoch {
        let epoch = self.begin_generation();
        let items = self.watcher.discover();
        for item in &items {
            item.set_processed(false);
            self.renderer.clear(item.id());
        }
        self.classifier.cache().clear();
        let queued = self.scheduler.enqueue(items, epoch);
        tracing::info!(target: "core", epoch, queued, "전체 댓글 재분류 시작");
        epoch
    }

    pub fn ping(&self) -> PingReply {
        PingReply {
            timestamp: Utc::now(),
            context: self.context.read().clone(),
            generation: self.generation.current(),
        }
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            context: self.context.read().clone(),
            generation: self.generation.current(),
            queue: self.scheduler.snapshot(),
            cached: self.classifier.cache().len(),
            settings: self.settings.snapshot(),
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings.snapshot()
    }

    pub fn handle(&self, command: Command) -> CommandReply {
        match command {
            Command::SettingsUpdated(settings) => CommandReply::Reprocessed {
                generation: self.apply_settings(settings),
            },
            Command::Rescan => CommandReply::Reprocessed {
                generation: self.reprocess_all(),
            },
            Command::Ping => CommandReply::Pong(self.ping()),
            Command::Navigate(context) => CommandReply::Navigated {
                generation: self.navigate(context),
            },
            Command::Toggle(item_id) => CommandReply::Toggled {
                item_id,
                state: self.renderer.toggle(item_id),
            },
            Command::Status => CommandReply::Status(self.status()),
        }
    }

    fn begin_generation(&self) -> Epoch {
        let epoch = self.generation.bump();
        self.scheduler.reset_all();
        epoch
    }
}
