//! In-memory page
//!
//! Clones share one `PageState` behind a mutex, so the refresher can own
//! one handle while callers inspect what was rendered through another.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::{TickerView, TrackContent};

/// Snapshot of the ticker elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub has_container: bool,
    pub has_track: bool,
    /// Container `data-loading` attribute
    pub loading_attr: Option<String>,
    /// Document `lang` attribute
    pub lang: Option<String>,
    pub visible: bool,
    pub track: Option<TrackContent>,
    pub duration: Option<Duration>,
    /// Number of track writes so far
    pub track_writes: u64,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            has_container: true,
            has_track: true,
            loading_attr: None,
            lang: None,
            visible: true,
            track: None,
            duration: None,
            track_writes: 0,
        }
    }
}

/// Shared in-memory ticker page
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    state: Arc<Mutex<PageState>>,
}

impl MemoryView {
    /// Page with both ticker elements present
    pub fn new() -> Self {
        Self::default()
    }

    /// Page without a ticker (no container, no track)
    pub fn without_ticker() -> Self {
        Self::from_state(PageState {
            has_container: false,
            has_track: false,
            ..PageState::default()
        })
    }

    pub fn from_state(state: PageState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Set the container's `data-loading` attribute
    pub fn with_loading_attr(self, label: impl Into<String>) -> Self {
        self.state.lock().loading_attr = Some(label.into());
        self
    }

    /// Set the document language
    pub fn with_lang(self, lang: impl Into<String>) -> Self {
        self.state.lock().lang = Some(lang.into());
        self
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> PageState {
        self.state.lock().clone()
    }

    /// Current track content as a string, empty if never written
    pub fn track_str(&self) -> String {
        self.state
            .lock()
            .track
            .as_ref()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default()
    }
}

impl TickerView for MemoryView {
    fn has_ticker(&self) -> bool {
        let state = self.state.lock();
        state.has_container && state.has_track
    }

    fn loading_label(&self) -> Option<String> {
        self.state.lock().loading_attr.clone()
    }

    fn lang(&self) -> Option<String> {
        self.state.lock().lang.clone()
    }

    fn set_track(&mut self, content: TrackContent) {
        let mut state = self.state.lock();
        state.track = Some(content);
        state.track_writes += 1;
    }

    fn set_visible(&mut self, visible: bool) {
        self.state.lock().visible = visible;
    }

    fn set_duration(&mut self, duration: Duration) {
        self.state.lock().duration = Some(duration);
    }
}
