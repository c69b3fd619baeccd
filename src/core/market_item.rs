//! Ticker payload types
//!
//! MarketItem and TickerPayload mirror the JSON returned by
//! `GET /api/markets/ticker/`. Received fresh on every poll, never mutated.
//! Numeric fields are lenient: a bad value degrades to `None` instead of
//! failing the whole payload. Numbers are kept as text while parsing
//! (serde_json `arbitrary_precision`), so an out-of-range literal such as
//! `1e400` only blanks its own field. Entries that are not objects are
//! dropped one by one.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Category tag the endpoint uses for UZS exchange rates
pub const FX_CATEGORY: &str = "FX";

/// One market instrument as delivered by the endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MarketItem {
    /// Instrument symbol (e.g. "BTC", "USDUZS", "^SPX")
    #[serde(default, deserialize_with = "lenient_string")]
    pub symbol: String,

    /// Human readable name
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub name: Option<String>,

    /// Last price
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,

    /// Change versus previous close, in percent
    #[serde(default, deserialize_with = "lenient_number")]
    pub change_pct: Option<f64>,

    /// Category ("Crypto", "Traditional", "Commodities", "FX")
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub category: Option<String>,
}

impl MarketItem {
    /// Create item with symbol only
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_change(mut self, change_pct: f64) -> Self {
        self.change_pct = Some(change_pct);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Display label: name when not blank, else symbol
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.symbol,
        }
    }

    /// True for large-magnitude local currency quotes (shown without decimals)
    pub fn is_uzs_quote(&self) -> bool {
        self.category.as_deref() == Some(FX_CATEGORY) || self.symbol.contains("/UZS")
    }
}

/// Full ticker response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TickerPayload {
    /// Instruments; missing or `null` means empty, non-object entries are dropped
    #[serde(default, deserialize_with = "items_skipping_invalid")]
    pub items: Vec<MarketItem>,

    /// Server snapshot time as sent (ISO 8601)
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub as_of: Option<String>,
}

impl TickerPayload {
    pub fn new(items: Vec<MarketItem>) -> Self {
        Self { items, as_of: None }
    }

    /// Parse the raw JSON body
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Parsed snapshot time, `None` when absent or not RFC 3339
    pub fn as_of(&self) -> Option<OffsetDateTime> {
        self.as_of
            .as_deref()
            .and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok())
    }
}

/// Interpret a JSON value as a finite number
///
/// Accepts numbers and numeric strings (surrounding whitespace allowed).
/// Everything else, including empty strings and non-finite values, is `None`.
pub fn numeric_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(numeric_value(&value))
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_opt_string(deserializer).map(Option::unwrap_or_default)
}

fn items_skipping_invalid<'de, D>(deserializer: D) -> Result<Vec<MarketItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| MarketItem::deserialize(value).ok())
        .collect())
}
