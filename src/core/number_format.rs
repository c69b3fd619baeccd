//! Locale-aware fixed-precision number formatting
//!
//! Rounds via `rust_decimal` on the exact value of the f64 (half away from
//! zero), then applies the locale's grouping and decimal separators.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number formatting conventions, selected from a BCP 47 language tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberLocale {
    /// `1,234.50`
    #[default]
    English,
    /// `1 234,50` (no-break space)
    Cyrillic,
    /// `1.234,50`
    Continental,
    /// `1 234,50` (narrow no-break space)
    French,
}

impl NumberLocale {
    /// Pick conventions by primary language subtag
    ///
    /// Unknown languages use English conventions.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match primary.as_str() {
            "ru" | "uz" | "uk" | "kk" | "ky" | "be" | "tg" => Self::Cyrillic,
            "de" | "it" | "nl" | "tr" | "id" | "da" | "pt" => Self::Continental,
            "fr" => Self::French,
            _ => Self::English,
        }
    }

    /// Resolve from an optional document language, falling back to `default`
    pub fn resolve(lang: Option<&str>, default: NumberLocale) -> Self {
        match lang.map(str::trim) {
            Some(tag) if !tag.is_empty() => Self::from_tag(tag),
            _ => default,
        }
    }

    #[inline]
    pub const fn group_separator(&self) -> &'static str {
        match self {
            Self::English => ",",
            Self::Cyrillic => "\u{a0}",
            Self::Continental => ".",
            Self::French => "\u{202f}",
        }
    }

    #[inline]
    pub const fn decimal_separator(&self) -> &'static str {
        match self {
            Self::English => ".",
            Self::Cyrillic | Self::Continental | Self::French => ",",
        }
    }
}

/// Format `value` with exactly `decimals` fractional digits
///
/// Returns `None` for NaN and infinities.
pub fn format_fixed(value: f64, decimals: u32, locale: NumberLocale) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    let plain = match Decimal::from_f64_retain(value) {
        Some(d) => {
            let rounded = d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.*}", decimals as usize, rounded)
        }
        // Outside Decimal range (|v| > ~7.9e28)
        None => format!("{:.*}", decimals as usize, value),
    };

    Some(localize(&plain, locale))
}

/// Apply locale separators to a plain `-1234.50` style string
fn localize(plain: &str, locale: NumberLocale) -> String {
    let (negative, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, plain),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    // "-0.00" reads as zero
    let is_zero = unsigned.bytes().all(|b| b == b'0' || b == b'.');

    let mut out = String::with_capacity(plain.len() + int_part.len() / 3 * 3);
    if negative && !is_zero {
        out.push('-');
    }

    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(locale.group_separator());
        }
        out.push(ch);
    }

    if let Some(frac) = frac_part {
        out.push_str(locale.decimal_separator());
        out.push_str(frac);
    }

    out
}
