//! Render targets
//!
//! `TickerView` models the two page elements the ticker touches: the outer
//! container (visibility, `data-loading`, duration property) and the inner
//! track (text or markup). Implementations:
//! - MemoryView: shared in-memory page, inspectable by callers
//! - HtmlFileView: writes the ticker fragment to a file on every change

pub mod html_file;
pub mod memory;

pub use html_file::HtmlFileView;
pub use memory::{MemoryView, PageState};

use std::time::Duration;

/// CSS custom property carrying the marquee duration
pub const DURATION_PROPERTY: &str = "--uz-ticker-duration";

/// Document readiness, as a browser reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    Loading,
    Interactive,
    #[default]
    Complete,
}

impl ReadyState {
    /// DOM is usable (interactive or complete)
    #[inline]
    pub const fn is_ready(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// Track content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackContent {
    /// Plain text (loading placeholder)
    Text(String),
    /// Rendered two-sequence markup
    Markup(String),
}

impl TrackContent {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Markup(s) => s,
        }
    }
}

/// DOM-like render target for the ticker
pub trait TickerView {
    /// Both container and track exist
    fn has_ticker(&self) -> bool;

    /// Container's `data-loading` attribute, if set
    fn loading_label(&self) -> Option<String>;

    /// Document language attribute, if set
    fn lang(&self) -> Option<String>;

    fn set_track(&mut self, content: TrackContent);

    fn set_visible(&mut self, visible: bool);

    /// Set the marquee animation duration
    fn set_duration(&mut self, duration: Duration);
}

/// Format a duration as a CSS seconds value: `45s`
pub fn css_seconds(duration: Duration) -> String {
    format!("{}s", duration.as_secs())
}
