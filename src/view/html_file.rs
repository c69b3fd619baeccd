//! HTML fragment file target
//!
//! Keeps container/track state in memory and rewrites the fragment file
//! after every change, so a static page can include the current ticker.
//! Writes go to a temp file first, then rename over the target.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{css_seconds, TickerView, TrackContent, DURATION_PROPERTY};
use crate::core::row::escape_html;
use crate::log_render;

/// Ticker fragment written to disk
#[derive(Debug, Clone)]
pub struct HtmlFileView {
    path: PathBuf,
    lang: Option<String>,
    loading_attr: Option<String>,
    visible: bool,
    track: Option<TrackContent>,
    duration: Option<Duration>,
}

impl HtmlFileView {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lang: None,
            loading_attr: None,
            visible: true,
            track: None,
            duration: None,
        }
    }

    /// Document language used for number formatting
    pub fn with_lang(mut self, lang: Option<String>) -> Self {
        self.lang = lang.filter(|l| !l.trim().is_empty());
        self
    }

    /// `data-loading` attribute on the container
    pub fn with_loading_attr(mut self, label: Option<String>) -> Self {
        self.loading_attr = label;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fragment markup for the current state
    pub fn render(&self) -> String {
        let mut out = String::from(r#"<div id="uzTicker" class="uz-ticker""#);

        if let Some(label) = &self.loading_attr {
            out.push_str(r#" data-loading=""#);
            out.push_str(&escape_html(label));
            out.push('"');
        }
        if let Some(duration) = self.duration {
            out.push_str(&format!(
                r#" style="{}: {}""#,
                DURATION_PROPERTY,
                css_seconds(duration)
            ));
        }
        if !self.visible {
            out.push_str(" hidden");
        }
        out.push_str(">\n  <div id=\"uzTickerTrack\" class=\"uz-ticker__track\">");

        match &self.track {
            Some(TrackContent::Text(text)) => out.push_str(&escape_html(text)),
            Some(TrackContent::Markup(markup)) => out.push_str(markup),
            None => {}
        }

        out.push_str("</div>\n</div>\n");
        out
    }

    /// Write the fragment to disk
    ///
    /// Synchronous: a few KB once per refresh interval, called on the runtime
    /// thread. Stays plain `std::fs` so it also works on a current-thread runtime.
    pub fn flush(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, self.render())?;
        fs::rename(&tmp, &self.path)
    }

    fn flush_logged(&self) {
        if let Err(e) = self.flush() {
            log_render!(
                tracing::Level::WARN,
                "Failed to write ticker fragment {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

impl TickerView for HtmlFileView {
    fn has_ticker(&self) -> bool {
        true
    }

    fn loading_label(&self) -> Option<String> {
        self.loading_attr.clone()
    }

    fn lang(&self) -> Option<String> {
        self.lang.clone()
    }

    fn set_track(&mut self, content: TrackContent) {
        self.track = Some(content);
        self.flush_logged();
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.flush_logged();
    }

    fn set_duration(&mut self, duration: Duration) {
        self.duration = Some(duration);
        self.flush_logged();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("uz-ticker-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_render_loading_text_is_escaped() {
        let mut view = HtmlFileView::new(temp_path("escape.html"))
            .with_loading_attr(Some("Yuklanmoqda…".to_string()));
        view.track = Some(TrackContent::Text("<Loading>".to_string()));

        let html = view.render();
        assert!(html.contains(r#"data-loading="Yuklanmoqda…""#));
        assert!(html.contains("&lt;Loading&gt;"));
        assert!(!html.contains(" hidden"));
    }

    #[test]
    fn test_writes_file_on_change() {
        let path = temp_path("ticker.html");
        let mut view = HtmlFileView::new(&path);

        view.set_track(TrackContent::Markup("<span>x</span>".to_string()));
        view.set_duration(Duration::from_secs(45));
        view.set_visible(false);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("<span>x</span>"));
        assert!(written.contains("--uz-ticker-duration: 45s"));
        assert!(written.contains(" hidden"));

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[tokio::test]
    async fn test_flush_on_current_thread_runtime() {
        let dir = std::env::temp_dir().join(format!("uz-ticker-rt-{}", std::process::id()));
        let path = dir.join("ticker.html");
        let mut view = HtmlFileView::new(&path);

        view.set_track(TrackContent::Text("Loading…".to_string()));
        tokio::task::yield_now().await;
        view.set_visible(true);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Loading…"));
        assert!(!path.with_extension("tmp").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_blank_lang_is_ignored() {
        let view = HtmlFileView::new("x.html").with_lang(Some(" ".to_string()));
        assert!(view.lang().is_none());
    }
}
