//! Shared fixtures for unit tests

use crate::core::MarketItem;

/// Ticker payload used across tests (as the endpoint returns it)
pub const SAMPLE_PAYLOAD_JSON: &str = r#"{
    "as_of": "2024-05-01T10:00:00+00:00",
    "items": [
        {"category": "Crypto", "name": "Bitcoin", "symbol": "BTC", "price": 64123.4, "change_pct": 2.15},
        {"category": "Commodities", "name": "Gold", "symbol": "XAUUSD", "price": 2301.1, "change_pct": -0.42},
        {"category": "FX", "name": "USD/UZS", "symbol": "USDUZS", "price": 12650.5, "change_pct": null}
    ]
}"#;

/// Same instruments as `SAMPLE_PAYLOAD_JSON`
pub fn sample_items() -> Vec<MarketItem> {
    vec![
        MarketItem::new("BTC")
            .with_name("Bitcoin")
            .with_category("Crypto")
            .with_price(64123.4)
            .with_change(2.15),
        MarketItem::new("XAUUSD")
            .with_name("Gold")
            .with_category("Commodities")
            .with_price(2301.1)
            .with_change(-0.42),
        MarketItem::new("USDUZS")
            .with_name("USD/UZS")
            .with_category("FX")
            .with_price(12650.5),
    ]
}
