//! Ticker refresh engine
//!
//! `TickerRefresher::refresh` runs one cycle: fetch, format, render.
//! `Scheduler` runs it once the document is ready and then on a fixed
//! interval until shutdown. One task, no overlapping cycles.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::core::{render_loop, NumberLocale, TickerRow};
use crate::infrastructure::config::{DurationPolicy, TickerConfig};
use crate::infrastructure::metrics::RefreshMetrics;
use crate::rest::TickerSource;
use crate::view::{ReadyState, TickerView, TrackContent};
use crate::log_render;

/// Result of one refresh cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Page has no ticker elements
    Skipped,
    /// Row rendered with this many entries
    Rendered { items: usize },
    /// Payload produced nothing to show; container hidden
    Empty,
    /// Fetch or parse failed; placeholder restored
    Failed,
}

/// Refresher settings
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    /// Placeholder when the container has no `data-loading` attribute
    pub loading_label: String,
    /// Locale when the document has no language
    pub default_locale: NumberLocale,
    pub duration: DurationPolicy,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self::from(&TickerConfig::default())
    }
}

impl From<&TickerConfig> for RefreshSettings {
    fn from(config: &TickerConfig) -> Self {
        Self {
            loading_label: config.loading_label.clone(),
            default_locale: config.number_locale(),
            duration: config.duration,
        }
    }
}

/// One fetch-format-render pipeline over a source and a view
pub struct TickerRefresher<S, V> {
    source: S,
    view: V,
    settings: RefreshSettings,
    metrics: Arc<RefreshMetrics>,
}

impl<S: TickerSource, V: TickerView> TickerRefresher<S, V> {
    pub fn new(source: S, view: V, settings: RefreshSettings) -> Self {
        Self {
            source,
            view,
            settings,
            metrics: Arc::new(RefreshMetrics::new()),
        }
    }

    /// Share an existing metrics collector
    pub fn with_metrics(mut self, metrics: Arc<RefreshMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> Arc<RefreshMetrics> {
        self.metrics.clone()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Run one refresh cycle
    ///
    /// Never fails: fetch or parse errors restore the loading placeholder
    /// and are reported as `RefreshOutcome::Failed`.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        self.metrics.record_cycle();

        if !self.view.has_ticker() {
            self.metrics.record_skipped();
            return RefreshOutcome::Skipped;
        }

        let loading = self.loading_label();
        self.view.set_track(TrackContent::Text(loading.clone()));

        let payload = match self.source.fetch().await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Ticker refresh failed: {}", e);
                self.metrics.record_failure();
                self.view.set_track(TrackContent::Text(loading));
                return RefreshOutcome::Failed;
            }
        };

        let locale = NumberLocale::resolve(self.view.lang().as_deref(), self.settings.default_locale);
        let row = TickerRow::build(&payload.items, locale);

        if row.is_empty() {
            log_render!(tracing::Level::INFO, "Ticker payload empty, hiding container");
            self.metrics.record_empty();
            self.view.set_visible(false);
            return RefreshOutcome::Empty;
        }

        let text_len = row.to_text().chars().count();
        self.view.set_track(TrackContent::Markup(render_loop(&row)));
        self.view.set_visible(true);
        self.view.set_duration(self.settings.duration.duration_for(text_len));

        log_render!(
            tracing::Level::INFO,
            "Rendered {} ticker items (as_of: {:?})",
            row.len(),
            payload.as_of()
        );
        self.metrics.record_rendered(row.len());

        RefreshOutcome::Rendered { items: row.len() }
    }

    /// `data-loading` attribute, else the configured label
    fn loading_label(&self) -> String {
        self.view
            .loading_label()
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| self.settings.loading_label.clone())
    }
}

/// Periodic driver for a refresher
pub struct Scheduler<S, V> {
    refresher: TickerRefresher<S, V>,
    interval: Duration,
}

impl<S: TickerSource, V: TickerView> Scheduler<S, V> {
    pub fn new(refresher: TickerRefresher<S, V>, interval: Duration) -> Self {
        Self { refresher, interval }
    }

    /// Run until `shutdown` flips to true (or its sender is dropped)
    ///
    /// The first cycle waits for `ready` to leave `Loading`; later cycles
    /// follow the interval. A slow cycle delays the next tick.
    pub async fn run(
        mut self,
        mut ready: watch::Receiver<ReadyState>,
        mut shutdown: watch::Receiver<bool>,
    ) -> TickerRefresher<S, V> {
        if !ready.borrow().is_ready() {
            tracing::debug!("Document loading, deferring first ticker refresh");
            tokio::select! {
                result = ready.wait_for(ReadyState::is_ready) => {
                    if result.is_err() {
                        tracing::warn!("Readiness signal dropped before document was ready");
                        return self.refresher;
                    }
                }
                _ = shutdown.wait_for(|stop| *stop) => return self.refresher,
            }
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("Ticker scheduler running every {:?}", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.refresher.refresh().await;
                    tracing::debug!("Refresh cycle finished: {:?}", outcome);
                }
                _ = shutdown.wait_for(|stop| *stop) => break,
            }
        }

        let snapshot = self.refresher.metrics.snapshot();
        tracing::info!(
            "Ticker scheduler stopped after {} cycles ({} rendered, {} failed)",
            snapshot.cycles,
            snapshot.rendered,
            snapshot.failures
        );

        self.refresher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MarketItem, TickerPayload};
    use crate::rest::FetchError;
    use crate::test_utils::{sample_items, SAMPLE_PAYLOAD_JSON};
    use crate::view::MemoryView;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Source replaying scripted responses; repeats the last one
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<TickerPayload, FetchError>>>,
        calls: Arc<Mutex<u32>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<TickerPayload, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Arc::new(Mutex::new(0)),
            }
        }

        fn ok(items: Vec<MarketItem>) -> Self {
            Self::new(vec![Ok(TickerPayload::new(items))])
        }

        fn failing() -> Self {
            Self::new(vec![Err(FetchError::Network("connection refused".to_string()))])
        }
    }

    impl TickerSource for ScriptedSource {
        async fn fetch(&self) -> Result<TickerPayload, FetchError> {
            *self.calls.lock() += 1;
            let mut responses = self.responses.lock();
            let next = if responses.len() > 1 {
                responses.pop_front()
            } else {
                responses.front().map(|r| match r {
                    Ok(p) => Ok(p.clone()),
                    Err(e) => Err(FetchError::Network(e.to_string())),
                })
            };
            next.unwrap_or_else(|| Err(FetchError::Network("no script".to_string())))
        }
    }

    fn refresher(source: ScriptedSource, view: MemoryView) -> TickerRefresher<ScriptedSource, MemoryView> {
        TickerRefresher::new(source, view, RefreshSettings::default())
    }

    #[tokio::test]
    async fn test_bitcoin_end_to_end() {
        let view = MemoryView::new();
        let item = MarketItem::new("BTC")
            .with_name("Bitcoin")
            .with_price(64123.4)
            .with_change(2.15);
        let mut refresher = refresher(ScriptedSource::ok(vec![item]), view.clone());

        assert_eq!(refresher.refresh().await, RefreshOutcome::Rendered { items: 1 });

        let state = view.snapshot();
        assert!(state.visible);
        assert_eq!(state.duration, Some(Duration::from_secs(45)));

        let track = view.track_str();
        assert!(matches!(state.track, Some(TrackContent::Markup(_))));
        assert_eq!(track.matches("₿").count(), 2);
        assert_eq!(track.matches("64,123.40").count(), 2);
        assert_eq!(track.matches("+2.15%").count(), 2);
        let (first, second) = track.split_at(track.len() / 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_items_hide_container() {
        let view = MemoryView::new();
        let mut refresher = refresher(ScriptedSource::ok(Vec::new()), view.clone());

        assert_eq!(refresher.refresh().await, RefreshOutcome::Empty);

        let state = view.snapshot();
        assert!(!state.visible);
        assert_eq!(state.track, Some(TrackContent::Text("Loading…".to_string())));
        assert_eq!(state.duration, None);
    }

    #[tokio::test]
    async fn test_all_blank_items_hide_container() {
        let blank = TickerPayload::from_slice(br#"{"items": [{}, {"symbol": "", "name": "  "}]}"#).unwrap();
        assert_eq!(blank.items.len(), 2);

        let view = MemoryView::new();
        let source = ScriptedSource::new(vec![Ok(TickerPayload::new(sample_items())), Ok(blank)]);
        let mut refresher = refresher(source, view.clone());

        assert!(matches!(refresher.refresh().await, RefreshOutcome::Rendered { .. }));
        assert!(view.snapshot().visible);

        assert_eq!(refresher.refresh().await, RefreshOutcome::Empty);
        let state = view.snapshot();
        assert!(!state.visible);
        assert_eq!(state.track, Some(TrackContent::Text("Loading…".to_string())));
    }

    #[tokio::test]
    async fn test_fetch_failure_restores_placeholder() {
        let view = MemoryView::new().with_loading_attr("Yuklanmoqda…");
        let mut refresher = refresher(ScriptedSource::failing(), view.clone());

        assert_eq!(refresher.refresh().await, RefreshOutcome::Failed);

        let state = view.snapshot();
        assert!(state.visible);
        assert_eq!(state.track, Some(TrackContent::Text("Yuklanmoqda…".to_string())));
        assert_eq!(state.track_writes, 2);
        assert_eq!(refresher.metrics().snapshot().failures, 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_hidden_container_hidden() {
        let view = MemoryView::new();
        let source = ScriptedSource::new(vec![
            Ok(TickerPayload::new(Vec::new())),
            Err(FetchError::Http(502)),
        ]);
        let mut refresher = refresher(source, view.clone());

        assert_eq!(refresher.refresh().await, RefreshOutcome::Empty);
        assert_eq!(refresher.refresh().await, RefreshOutcome::Failed);
        assert!(!view.snapshot().visible);
    }

    #[tokio::test]
    async fn test_missing_ticker_is_noop() {
        let view = MemoryView::without_ticker();
        let source = ScriptedSource::ok(sample_items());
        let calls = source.calls.clone();
        let mut refresher = refresher(source, view.clone());

        assert_eq!(refresher.refresh().await, RefreshOutcome::Skipped);
        assert_eq!(*calls.lock(), 0);
        assert_eq!(view.snapshot().track_writes, 0);
    }

    #[test]
    fn test_refresh_outside_runtime() {
        let view = MemoryView::new();
        let mut refresher = refresher(ScriptedSource::ok(sample_items()), view.clone());

        let outcome = tokio_test::block_on(refresher.refresh());
        assert_eq!(outcome, RefreshOutcome::Rendered { items: 3 });
        assert_eq!(refresher.view().snapshot().track_writes, 2);
    }

    #[tokio::test]
    async fn test_document_lang_selects_locale() {
        let view = MemoryView::new().with_lang("ru");
        let mut refresher = refresher(ScriptedSource::ok(sample_items()), view.clone());

        refresher.refresh().await;
        assert!(view.track_str().contains("64\u{a0}123,40"));
    }

    #[tokio::test]
    async fn test_recovers_after_failure() {
        let view = MemoryView::new();
        let payload = TickerPayload::from_slice(SAMPLE_PAYLOAD_JSON.as_bytes()).unwrap();
        let source = ScriptedSource::new(vec![
            Err(FetchError::Parse("expected value".to_string())),
            Ok(payload),
        ]);
        let mut refresher = refresher(source, view.clone());

        assert_eq!(refresher.refresh().await, RefreshOutcome::Failed);
        assert_eq!(refresher.refresh().await, RefreshOutcome::Rendered { items: 3 });
        assert!(view.track_str().contains("12,651"));
    }

    #[tokio::test]
    async fn test_proportional_duration() {
        let view = MemoryView::new();
        let settings = RefreshSettings {
            duration: DurationPolicy::Proportional {
                chars_per_second: 6.0,
                min_secs: 25,
                max_secs: 70,
            },
            ..RefreshSettings::default()
        };
        let mut refresher = TickerRefresher::new(ScriptedSource::ok(sample_items()), view.clone(), settings);

        refresher.refresh().await;
        assert_eq!(view.snapshot().duration, Some(Duration::from_secs(25)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_runs_immediately_then_on_interval() {
        let source = ScriptedSource::ok(sample_items());
        let calls = source.calls.clone();
        let scheduler = Scheduler::new(refresher(source, MemoryView::new()), Duration::from_secs(300));

        let (_ready_tx, ready_rx) = watch::channel(ReadyState::Interactive);
        let (stop_tx, stop_rx) = watch::channel(false);

        let (refresher, ()) = tokio::join!(scheduler.run(ready_rx, stop_rx), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            assert_eq!(*calls.lock(), 1);

            tokio::time::sleep(Duration::from_secs(300)).await;
            assert_eq!(*calls.lock(), 2);

            stop_tx.send(true).unwrap();
        });

        assert_eq!(refresher.metrics().snapshot().rendered, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_defers_until_ready() {
        let source = ScriptedSource::ok(sample_items());
        let calls = source.calls.clone();
        let scheduler = Scheduler::new(refresher(source, MemoryView::new()), Duration::from_secs(300));

        let (ready_tx, ready_rx) = watch::channel(ReadyState::Loading);
        let (stop_tx, stop_rx) = watch::channel(false);

        tokio::join!(scheduler.run(ready_rx, stop_rx), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            assert_eq!(*calls.lock(), 0);

            ready_tx.send(ReadyState::Interactive).unwrap();
            tokio::time::sleep(Duration::from_secs(1)).await;
            assert_eq!(*calls.lock(), 1);

            stop_tx.send(true).unwrap();
        });
    }

    #[tokio::test]
    async fn test_scheduler_stops_when_shutdown_dropped() {
        let source = ScriptedSource::ok(sample_items());
        let scheduler = Scheduler::new(refresher(source, MemoryView::new()), Duration::from_secs(300));

        let (_ready_tx, ready_rx) = watch::channel(ReadyState::Complete);
        let (stop_tx, stop_rx) = watch::channel(false);
        drop(stop_tx);

        let refresher = scheduler.run(ready_rx, stop_rx).await;
        assert!(refresher.metrics().snapshot().cycles <= 1);
    }
}
