use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::{task::JoinHandle, time::sleep};

use crate::{
    classifier::HybridClassifier,
    config::PipelineConfig,
    domain::{display_label, Epoch, FilterDecision, QueueSnapshot, SettingsStore, SharedItem},
    policy::should_filter,
    render::SharedRenderer,
};

use super::{generation::GenerationTracker, queue::ItemQueue};

#[derive(Default)]
struct SchedulerState {
    queue: ItemQueue,
    draining: Option<Epoch>,
    debounce: Option<JoinHandle<()>>,
}

/// Collects discovered items, waits for discovery bursts to settle, then classifies them
/// in fixed-size batches. Work belonging to a superseded generation never reaches the
/// renderer.
pub struct IncrementalScheduler {
    state: Mutex<SchedulerState>,
    generation: Arc<GenerationTracker>,
    classifier: Arc<HybridClassifier>,
    settings: Arc<SettingsStore>,
    renderer: SharedRenderer,
    config: PipelineConfig,
}

impl IncrementalScheduler {
    pub fn new(
        generation: Arc<GenerationTracker>,
        classifier: Arc<HybridClassifier>,
        settings: Arc<SettingsStore>,
        renderer: SharedRenderer,
        config: PipelineConfig,
    ) -> Self {
        Self {
            state: Mutex::new(SchedulerState::default()),
            generation,
            classifier,
            settings,
            renderer,
            config,
        }
    }

    /// Queues newly discovered items and restarts the debounce timer. Returns how many
    /// items were admitted.
    pub fn enqueue(self: &Arc<Self>, items: Vec<SharedItem>, epoch: Epoch) -> usize {
        if !self.generation.is_current(epoch) {
            tracing::trace!(target: "scheduler", epoch, "ignoring enqueue for stale generation");
            return 0;
        }
        if !self.settings.snapshot().enabled {
            return 0;
        }

        let mut state = self.state.lock();
        let added = state.queue.extend(items);
        if added == 0 {
            return 0;
        }

        if let Some(pending) = state.debounce.take() {
            pending.abort();
        }
        let this = self.clone();
        let delay = self.config.debounce;
        state.debounce = Some(tokio::spawn(async move {
            sleep(delay).await;
            this.start_drain(epoch);
        }));

        tracing::debug!(
            target: "scheduler",
            added,
            queued = state.queue.len(),
            epoch,
            "items enqueued"
        );
        added
    }

    /// Cancels the pending debounce and forgets queued work and the draining flag.
    pub fn reset_all(&self) {
        let mut state = self.state.lock();
        if let Some(pending) = state.debounce.take() {
            pending.abort();
        }
        let dropped = state.queue.len();
        state.queue.clear();
        state.draining = None;
        tracing::debug!(target: "scheduler", dropped, "scheduler reset");
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        let state = self.state.lock();
        QueueSnapshot {
            queued: state.queue.len(),
            draining: state.draining.is_some(),
            debouncing: state
                .debounce
                .as_ref()
                .is_some_and(|handle| !handle.is_finished()),
        }
    }

    fn start_drain(self: &Arc<Self>, epoch: Epoch) {
        {
            let mut state = self.state.lock();
            if state.draining.is_some() {
                // the running drain picks up everything already queued
                return;
            }
            if !self.generation.is_current(epoch) || state.queue.is_empty() {
                return;
            }
            state.draining = Some(epoch);
        }
        tokio::spawn(self.clone().drain(epoch));
    }

    async fn drain(self: Arc<Self>, epoch: Epoch) {
        let mut processed = 0usize;
        loop {
            let batch = {
                let mut state = self.state.lock();
                if state.draining != Some(epoch) {
                    // a reset took over; the queue belongs to someone else now
                    return;
                }
                if !self.generation.is_current(epoch) {
                    state.queue.clear();
                    state.draining = None;
                    tracing::debug!(target: "scheduler", epoch, "drain abandoned for stale generation");
                    return;
                }
                let batch = state.queue.take_batch(self.config.batch_size);
                if batch.is_empty() {
                    state.draining = None;
                    break;
                }
                batch
            };

            processed += batch.len();
            let ids: Vec<_> = batch.iter().map(|item| item.id()).collect();
            join_all(batch.into_iter().map(|item| self.process_item(item, epoch))).await;

            let more = {
                let mut state = self.state.lock();
                if state.draining == Some(epoch) {
                    for id in ids {
                        state.queue.settle(id);
                    }
                }
                !state.queue.is_empty()
            };
            if more && self.generation.is_current(epoch) {
                sleep(self.config.batch_yield).await;
            }
        }
        tracing::debug!(target: "scheduler", processed, epoch, "drain finished");
    }

    async fn process_item(&self, item: SharedItem, epoch: Epoch) {
        let Some(text) = item.text().filter(|text| !text.trim().is_empty()) else {
            item.set_processed(true);
            return;
        };

        let result = self.classifier.classify(&text, epoch).await;
        if !self.generation.is_current(epoch) {
            return;
        }

        let settings = self.settings.snapshot();
        let decision = FilterDecision {
            item_id: item.id(),
            filtered: should_filter(&result, &settings),
            mode: settings.mode,
            display_label: display_label(&result),
        };
        self.renderer.apply(decision);
        item.set_processed(true);
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use futures::{future::BoxFuture, FutureExt};

    use super::*;
    use crate::{
        classifier::{
            fallback::{DetectionReport, DetectorError, LanguageCandidate, LanguageDetector},
            ClassificationCache, FallbackDetector,
        },
        domain::{ItemHandle, ItemId, Settings},
        render::{Renderer, ToggleState},
        tasks::queue::tests::TestItem,
    };

    #[derive(Default)]
    struct RecordingRenderer {
        decisions: Mutex<Vec<FilterDecision>>,
    }

    impl RecordingRenderer {
        fn filtered(&self, id: u64) -> Option<bool> {
            self.decisions
                .lock()
                .iter()
                .rev()
                .find(|d| d.item_id == ItemId(id))
                .map(|d| d.filtered)
        }

        fn count(&self) -> usize {
            self.decisions.lock().len()
        }
    }

    impl Renderer for RecordingRenderer {
        fn apply(&self, decision: FilterDecision) {
            self.decisions.lock().push(decision);
        }

        fn clear(&self, item: ItemId) {
            self.decisions.lock().retain(|d| d.item_id != item);
        }

        fn clear_all(&self) {
            self.decisions.lock().clear();
        }

        fn toggle(&self, _item: ItemId) -> Option<ToggleState> {
            None
        }
    }

    /// Answers "ko" after bumping the generation, simulating navigation mid-call.
    struct BumpingDetector {
        generation: Arc<GenerationTracker>,
        calls: AtomicUsize,
    }

    impl LanguageDetector for BumpingDetector {
        fn detect_language<'a>(
            &'a self,
            _sample: &'a str,
        ) -> BoxFuture<'a, Result<Option<DetectionReport>, DetectorError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::task::yield_now().await;
                self.generation.bump();
                Ok(Some(DetectionReport {
                    languages: vec![LanguageCandidate {
                        language: "ko".into(),
                        percentage: 90.0,
                    }],
                }))
            }
            .boxed()
        }
    }

    fn fast_config() -> PipelineConfig {
        PipelineConfig {
            debounce: Duration::from_millis(20),
            batch_size: 2,
            batch_yield: Duration::from_millis(1),
            ..PipelineConfig::default()
        }
    }

    struct Harness {
        scheduler: Arc<IncrementalScheduler>,
        generation: Arc<GenerationTracker>,
        renderer: Arc<RecordingRenderer>,
        classifier: Arc<HybridClassifier>,
    }

    fn harness(allowed: &[&str], detector: Option<Arc<dyn LanguageDetector>>) -> Harness {
        let generation = Arc::new(GenerationTracker::new());
        harness_with(allowed, detector, generation)
    }

    fn harness_with(
        allowed: &[&str],
        detector: Option<Arc<dyn LanguageDetector>>,
        generation: Arc<GenerationTracker>,
    ) -> Harness {
        harness_configured(allowed, detector, generation, fast_config())
    }

    fn harness_configured(
        allowed: &[&str],
        detector: Option<Arc<dyn LanguageDetector>>,
        generation: Arc<GenerationTracker>,
        config: PipelineConfig,
    ) -> Harness {
        let classifier = Arc::new(HybridClassifier::new(
            ClassificationCache::new(config.cache_key_len),
            FallbackDetector::new(detector, generation.clone(), config.fallback_sample_len),
            generation.clone(),
        ));
        let settings = Arc::new(SettingsStore::new(Settings {
            allowed_langs: allowed.iter().map(|s| s.to_string()).collect(),
            ..Settings::default()
        }));
        let renderer = Arc::new(RecordingRenderer::default());
        let scheduler = Arc::new(IncrementalScheduler::new(
            generation.clone(),
            classifier.clone(),
            settings,
            renderer.clone(),
            config,
        ));
        Harness {
            scheduler,
            generation,
            renderer,
            classifier,
        }
    }

    async fn settle() {
        sleep(Duration::from_millis(150)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn drains_and_applies_decisions() {
        let h = harness(&["en"], None);
        let epoch = h.generation.bump();
        let korean = TestItem::shared(1, Some("한글댓글예시 ㅋㅋㅋㅋ"));
        let english = TestItem::shared(2, Some("hello world, nice video!"));
        let emoji = TestItem::shared(3, Some("😂😂"));
        let items: Vec<SharedItem> = vec![
            korean.clone() as SharedItem,
            english.clone() as SharedItem,
            emoji.clone() as SharedItem,
        ];

        assert_eq!(h.scheduler.enqueue(items, epoch), 3);
        settle().await;

        assert_eq!(h.renderer.filtered(1), Some(true));
        assert_eq!(h.renderer.filtered(2), Some(false));
        assert_eq!(h.renderer.filtered(3), Some(false));
        assert!(korean.is_processed() && english.is_processed() && emoji.is_processed());
        assert!(!h.scheduler.snapshot().draining);
    }

    #[tokio::test(start_paused = true)]
    async fn items_without_text_are_marked_but_not_rendered() {
        let h = harness(&["en"], None);
        let epoch = h.generation.bump();
        let empty = TestItem::shared(1, None);
        let blank = TestItem::shared(2, Some("   "));
        h.scheduler
            .enqueue(vec![empty.clone() as SharedItem, blank.clone() as SharedItem], epoch);
        settle().await;

        assert!(empty.is_processed() && blank.is_processed());
        assert_eq!(h.renderer.count(), 0);
        assert!(h.classifier.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_enqueues_is_processed_once_per_item() {
        let h = harness(&["en"], None);
        let epoch = h.generation.bump();
        let item = TestItem::shared(1, Some("hello there friend"));
        for _ in 0..5 {
            h.scheduler.enqueue(vec![item.clone() as SharedItem], epoch);
        }
        let others: Vec<SharedItem> = (2..=6)
            .map(|id| TestItem::shared(id, Some("another english comment")) as SharedItem)
            .collect();
        h.scheduler.enqueue(others, epoch);
        settle().await;

        assert_eq!(h.renderer.count(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_enqueue_is_ignored() {
        let h = harness(&["en"], None);
        let stale = h.generation.bump();
        h.generation.bump();
        let item = TestItem::shared(1, Some("hello world"));
        assert_eq!(h.scheduler.enqueue(vec![item.clone() as SharedItem], stale), 0);
        settle().await;
        assert!(!item.is_processed());
        assert_eq!(h.renderer.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn processed_marker_survives_further_enqueues() {
        let h = harness(&["en"], None);
        let epoch = h.generation.bump();
        let item = TestItem::shared(1, Some("hello world"));
        h.scheduler.enqueue(vec![item.clone() as SharedItem], epoch);
        settle().await;
        assert!(item.is_processed());

        assert_eq!(h.scheduler.enqueue(vec![item.clone() as SharedItem], epoch), 0);
        settle().await;
        assert!(item.is_processed());
        assert_eq!(h.renderer.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn generation_bump_during_fallback_suppresses_side_effects() {
        let generation = Arc::new(GenerationTracker::new());
        let detector = Arc::new(BumpingDetector {
            generation: generation.clone(),
            calls: AtomicUsize::new(0),
        });
        let h = harness_with(&["en"], Some(detector.clone()), generation);
        let epoch = h.generation.bump();
        let ambiguous = TestItem::shared(1, Some("ㅋあいう"));
        h.scheduler.enqueue(vec![ambiguous.clone() as SharedItem], epoch);
        settle().await;

        assert_eq!(detector.calls.load(Ordering::SeqCst), 1);
        assert!(!ambiguous.is_processed());
        assert_eq!(h.renderer.count(), 0);
        assert!(h.classifier.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_generation_mid_drain_discards_later_batches() {
        let generation = Arc::new(GenerationTracker::new());
        let detector = Arc::new(BumpingDetector {
            generation: generation.clone(),
            calls: AtomicUsize::new(0),
        });
        let h = harness_with(&["en"], Some(detector.clone()), generation);
        let epoch = h.generation.bump();
        let items: Vec<Arc<TestItem>> = (1..=4)
            .map(|id| TestItem::shared(id, Some("ㅋあいう")))
            .collect();
        let queued = h
            .scheduler
            .enqueue(items.iter().map(|item| item.clone() as SharedItem).collect(), epoch);
        assert_eq!(queued, 4);
        settle().await;

        // only the first batch of two ever reached the detector
        assert_eq!(detector.calls.load(Ordering::SeqCst), 2);
        assert!(items.iter().all(|item| !item.is_processed()));
        assert_eq!(h.renderer.count(), 0);
        let snapshot = h.scheduler.snapshot();
        assert_eq!(snapshot.queued, 0);
        assert!(!snapshot.draining);
    }

    #[tokio::test(start_paused = true)]
    async fn enqueue_burst_restarts_the_debounce_timer() {
        let config = PipelineConfig {
            debounce: Duration::from_millis(50),
            ..fast_config()
        };
        let h = harness_configured(&["en"], None, Arc::new(GenerationTracker::new()), config);
        let epoch = h.generation.bump();

        for id in 1..=4 {
            let item = TestItem::shared(id, Some("hello again friends"));
            h.scheduler.enqueue(vec![item as SharedItem], epoch);
            sleep(Duration::from_millis(30)).await;
        }
        // 120ms since the first enqueue but only 30ms since the last one
        assert_eq!(h.renderer.count(), 0);
        assert!(h.scheduler.snapshot().debouncing);

        sleep(Duration::from_millis(30)).await;
        assert_eq!(h.renderer.count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_pending_debounce() {
        let h = harness(&["en"], None);
        let epoch = h.generation.bump();
        let item = TestItem::shared(1, Some("hello world"));
        h.scheduler.enqueue(vec![item.clone() as SharedItem], epoch);
        h.scheduler.reset_all();
        settle().await;

        assert!(!item.is_processed());
        assert_eq!(h.scheduler.snapshot().queued, 0);
    }
}
