//! MarketItem -> DisplayItem
//!
//! Pure formatting: badge glyph, label, price and change strings.
//! No I/O, no rendering.

use super::market_item::MarketItem;
use super::number_format::{format_fixed, NumberLocale};

/// Static badge glyphs keyed by uppercased symbol
const BADGES: &[(&str, &str)] = &[
    ("BTC", "₿"),
    ("ETH", "Ξ"),
    ("XAU", "Au"),
    ("XAUUSD", "Au"),
    ("XAG", "Ag"),
    ("XAGUSD", "Ag"),
    ("WTI", "OIL"),
    ("^SPX", "S&P"),
    ("^NDX", "NDX"),
    ("^DJI", "DJI"),
    ("USDUZS", "USD"),
    ("EURUZS", "EUR"),
    ("RUBUZS", "RUB"),
];

/// Length of the fallback badge, in characters
const FALLBACK_BADGE_CHARS: usize = 3;

/// Price change direction, used for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
    /// No valid change value
    Unknown,
}

impl Direction {
    pub fn from_change(change_pct: Option<f64>) -> Self {
        match change_pct {
            Some(v) if v > 0.0 => Self::Up,
            Some(v) if v < 0.0 => Self::Down,
            Some(_) => Self::Flat,
            None => Self::Unknown,
        }
    }

    /// CSS modifier class
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Up => "uz-up",
            Self::Down => "uz-down",
            Self::Flat => "uz-flat",
            Self::Unknown => "",
        }
    }
}

/// One formatted ticker entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub badge: String,
    pub label: String,
    /// Empty when price is missing or invalid
    pub price: String,
    /// Empty when change is missing or invalid
    pub change: String,
    pub direction: Direction,
}

impl DisplayItem {
    /// Build from a market item using the given number conventions
    pub fn from_item(item: &MarketItem, locale: NumberLocale) -> Self {
        Self {
            badge: badge_for(item),
            label: item.label().to_string(),
            price: format_price(item, locale),
            change: format_change(item.change_pct, locale),
            direction: Direction::from_change(item.change_pct.filter(|v| v.is_finite())),
        }
    }

    /// Nothing worth showing
    pub fn is_blank(&self) -> bool {
        self.label.trim().is_empty() && self.price.is_empty() && self.change.is_empty()
    }

    /// Plain-text form: `Bitcoin: 64,123.40 (+2.15%)`
    pub fn to_text(&self) -> String {
        let mut text = format!("{}: {}", self.label, self.price);
        if !self.change.is_empty() {
            text.push_str(" (");
            text.push_str(&self.change);
            text.push(')');
        }
        text
    }
}

/// Badge glyph from the lookup table, else first three chars of the label
pub fn badge_for(item: &MarketItem) -> String {
    let key = item.symbol.trim().to_uppercase();
    if let Some((_, glyph)) = BADGES.iter().find(|(symbol, _)| *symbol == key) {
        return (*glyph).to_string();
    }

    item.label()
        .trim()
        .to_uppercase()
        .chars()
        .take(FALLBACK_BADGE_CHARS)
        .collect()
}

/// Price with zero decimals for UZS quotes, two otherwise
pub fn format_price(item: &MarketItem, locale: NumberLocale) -> String {
    let Some(price) = item.price else {
        return String::new();
    };
    let decimals = if item.is_uzs_quote() { 0 } else { 2 };
    format_fixed(price, decimals, locale).unwrap_or_default()
}

/// Percentage change with explicit `+` for positive values
pub fn format_change(change_pct: Option<f64>, locale: NumberLocale) -> String {
    let Some(change) = change_pct else {
        return String::new();
    };
    match format_fixed(change, 2, locale) {
        Some(formatted) => {
            let sign = if change > 0.0 { "+" } else { "" };
            format!("{sign}{formatted}%")
        }
        None => String::new(),
    }
}
