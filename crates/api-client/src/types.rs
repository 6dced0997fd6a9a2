// In crates/api-client/src/types.rs

use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The main client for the Binance spot REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// The user's Binance API key, sent on authenticated endpoints.
    pub api_key: String,
    /// The base URL for the REST API.
    pub base_url: String,
}

/// Trading rules for a symbol, flattened from the exchange filters.
///
/// Filters the exchange does not report are left at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriceRules {
    pub tick_size: Decimal,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub min_qty: Decimal,
    pub max_qty: Decimal,
    pub step_size: Decimal,
    pub min_notional: Decimal,
}

impl PriceRules {
    pub fn from_filters(filters: &[SymbolFilter]) -> Self {
        let mut rules = PriceRules::default();
        for filter in filters {
            match filter {
                SymbolFilter::PriceFilter { min_price, max_price, tick_size } => {
                    rules.min_price = *min_price;
                    rules.max_price = *max_price;
                    rules.tick_size = *tick_size;
                }
                SymbolFilter::LotSize { min_qty, max_qty, step_size } => {
                    rules.min_qty = *min_qty;
                    rules.max_qty = *max_qty;
                    rules.step_size = *step_size;
                }
                SymbolFilter::MinNotional { min_notional } | SymbolFilter::Notional { min_notional } => {
                    rules.min_notional = *min_notional;
                }
                SymbolFilter::Other => {}
            }
        }
        rules
    }
}

/// Response of `GET /api/v3/exchangeInfo`.
#[derive(Debug, Deserialize, Clone)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

/// The subset of symbol filters that make up `PriceRules`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "filterType")]
pub enum SymbolFilter {
    #[serde(rename = "PRICE_FILTER", rename_all = "camelCase")]
    PriceFilter {
        min_price: Decimal,
        max_price: Decimal,
        tick_size: Decimal,
    },
    #[serde(rename = "LOT_SIZE", rename_all = "camelCase")]
    LotSize {
        min_qty: Decimal,
        max_qty: Decimal,
        step_size: Decimal,
    },
    #[serde(rename = "MIN_NOTIONAL", rename_all = "camelCase")]
    MinNotional { min_notional: Decimal },
    #[serde(rename = "NOTIONAL", rename_all = "camelCase")]
    Notional { min_notional: Decimal },
    #[serde(other)]
    Other,
}

/// Represents a 24hr ticker event from the `<symbol>@ticker` stream.
#[derive(Debug, Deserialize, Clone)]
pub struct WsTickerEvent {
    #[serde(rename = "e")]
    pub event_type: String, // "24hrTicker"
    #[serde(rename = "E")]
    pub event_time: i64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "c")]
    pub last_price: Decimal,
}

/// A single live price observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerUpdate {
    pub symbol: String,
    pub last_price: Decimal,
    /// Event time in milliseconds since the epoch.
    pub event_time: i64,
}

impl From<WsTickerEvent> for TickerUpdate {
    fn from(event: WsTickerEvent) -> Self {
        Self {
            symbol: event.symbol,
            last_price: event.last_price,
            event_time: event.event_time,
        }
    }
}
