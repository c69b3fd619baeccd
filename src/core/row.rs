//! Ticker row building and seamless-loop rendering
//!
//! A row is the ordered list of non-blank display entries. The marquee
//! renders the row twice, back to back, so the scroll animation can wrap
//! without a visible jump.

use super::display::DisplayItem;
use super::market_item::MarketItem;
use super::number_format::NumberLocale;

/// Separator between entries in plain-text form
pub const TEXT_SEPARATOR: &str = "   •   ";

/// Class of one rendered sequence; the loop holds exactly two
pub const SEQUENCE_CLASS: &str = "uz-ticker__seq";

const SEPARATOR_MARKUP: &str = r#"<span class="uz-ticker__sep">•</span>"#;

/// Formatted entries of one poll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerRow {
    entries: Vec<DisplayItem>,
}

impl TickerRow {
    /// Format every item and drop the ones with nothing to show
    pub fn build(items: &[MarketItem], locale: NumberLocale) -> Self {
        let entries = items
            .iter()
            .map(|item| DisplayItem::from_item(item, locale))
            .filter(|display| !display.is_blank())
            .collect();
        Self { entries }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[DisplayItem] {
        &self.entries
    }

    /// `Bitcoin: 64,123.40 (+2.15%)   •   Gold: 2,301.10`
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(DisplayItem::to_text)
            .collect::<Vec<_>>()
            .join(TEXT_SEPARATOR)
    }

    /// One sequence of entry markup, HTML-escaped
    ///
    /// Every entry is followed by a separator, the last one included, so two
    /// adjacent sequences join with the same gap as entries inside one.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        out.push_str(r#"<span class=""#);
        out.push_str(SEQUENCE_CLASS);
        out.push_str(r#"">"#);

        for entry in &self.entries {
            push_entry_markup(&mut out, entry);
            out.push_str(SEPARATOR_MARKUP);
        }

        out.push_str("</span>");
        out
    }
}

fn push_entry_markup(out: &mut String, entry: &DisplayItem) {
    out.push_str(r#"<span class="uz-ticker__item">"#);

    if !entry.badge.is_empty() {
        out.push_str(r#"<span class="uz-ticker__badge">"#);
        out.push_str(&escape_html(&entry.badge));
        out.push_str("</span>");
    }

    out.push_str(r#"<span class="uz-ticker__name">"#);
    out.push_str(&escape_html(&entry.label));
    out.push_str("</span>");

    if !entry.price.is_empty() {
        out.push_str(r#"<span class="uz-ticker__price">"#);
        out.push_str(&escape_html(&entry.price));
        out.push_str("</span>");
    }

    if !entry.change.is_empty() {
        let class = entry.direction.css_class();
        if class.is_empty() {
            out.push_str(r#"<span class="uz-ticker__chg">"#);
        } else {
            out.push_str(r#"<span class="uz-ticker__chg "#);
            out.push_str(class);
            out.push_str(r#"">"#);
        }
        out.push_str(&escape_html(&entry.change));
        out.push_str("</span>");
    }

    out.push_str("</span>");
}

/// `(row) -> (row, row)`
pub fn seamless_loop<T: Clone>(row: T) -> (T, T) {
    (row.clone(), row)
}

/// Two identical adjacent sequences, ready for the track
pub fn render_loop(row: &TickerRow) -> String {
    let (first, second) = seamless_loop(row.to_markup());
    let mut out = String::with_capacity(first.len() * 2);
    out.push_str(&first);
    out.push_str(&second);
    out
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
