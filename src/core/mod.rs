//! Core ticker types and pure formatting
//!
//! This module has no I/O:
//! - MarketItem / TickerPayload: endpoint JSON
//! - NumberLocale: grouping and decimal separators
//! - DisplayItem: badge, label, price and change strings
//! - TickerRow: joined entries and the seamless-loop rendering

pub mod display;
pub mod market_item;
pub mod number_format;
pub mod row;

pub use display::{badge_for, format_change, format_price, Direction, DisplayItem};
pub use market_item::{MarketItem, TickerPayload};
pub use number_format::{format_fixed, NumberLocale};
pub use row::{render_loop, seamless_loop, TickerRow};
