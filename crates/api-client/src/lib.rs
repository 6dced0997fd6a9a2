// In crates/api-client/src/lib.rs

use app_config::types::BinanceSettings;
use core_types::Symbol;
use serde_json::Value;

pub mod error;
pub mod live_connector;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use live_connector::LiveConnector;
pub use types::*;

impl ApiClient {
    /// Constructs a new ApiClient from BinanceSettings.
    pub fn new(settings: &BinanceSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder().build()?;
        Ok(ApiClient {
            http_client,
            api_key: settings.api_key.clone(),
            base_url: settings.rest_url().trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the trading rules (tick size, lot size, notional limits) for a symbol.
    ///
    /// This corresponds to the `GET /api/v3/exchangeInfo` endpoint.
    pub async fn get_price_rules(&self, symbol: &Symbol) -> Result<PriceRules> {
        let url = format!("{}/api/v3/exchangeInfo?symbol={}", self.base_url, symbol.0.to_uppercase());

        let mut request = self.http_client.get(&url);
        if !self.api_key.is_empty() {
            request = request.header("X-MBX-APIKEY", &self.api_key);
        }
        let text = request
            .send()
            .await
            .map_err(Error::RequestFailed)?
            .text()
            .await
            .map_err(Error::RequestFailed)?;

        let rules = parse_price_rules(symbol, &text)?;
        tracing::debug!(%symbol, ?rules, "Fetched price rules.");
        Ok(rules)
    }
}

/// Parses an `exchangeInfo` response body into the rules for `symbol`.
pub fn parse_price_rules(symbol: &Symbol, body: &str) -> Result<PriceRules> {
    let value: Value = serde_json::from_str(body).map_err(Error::DeserializationFailed)?;

    // Binance returns an error object on failure, so we check for that first.
    if let Some(code) = value.get("code").and_then(Value::as_i64) {
        if code != 0 {
            let msg = value.get("msg").and_then(Value::as_str).unwrap_or("Unknown error").to_string();
            return Err(Error::ApiError { code, msg });
        }
    }

    let info: ExchangeInfo = serde_json::from_value(value).map_err(Error::DeserializationFailed)?;
    let wanted = symbol.0.to_uppercase();
    info.symbols
        .iter()
        .find(|s| s.symbol == wanted)
        .map(|s| PriceRules::from_filters(&s.filters))
        .ok_or_else(|| Error::SymbolNotFound(symbol.0.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const EXCHANGE_INFO: &str = r#"{
        "timezone": "UTC",
        "symbols": [{
            "symbol": "BTCUSDT",
            "status": "TRADING",
            "filters": [
                {"filterType": "PRICE_FILTER", "minPrice": "0.01000000", "maxPrice": "1000000.00000000", "tickSize": "0.01000000"},
                {"filterType": "LOT_SIZE", "minQty": "0.00001000", "maxQty": "9000.00000000", "stepSize": "0.00001000"},
                {"filterType": "ICEBERG_PARTS", "limit": 10},
                {"filterType": "NOTIONAL", "minNotional": "5.00000000", "applyMinToMarket": true, "maxNotional": "9000000.00000000"}
            ]
        }]
    }"#;

    #[test]
    fn parses_filters_into_price_rules() {
        let rules = parse_price_rules(&Symbol::from("btcusdt"), EXCHANGE_INFO).unwrap();

        assert_eq!(rules.tick_size, dec!(0.01));
        assert_eq!(rules.min_price, dec!(0.01));
        assert_eq!(rules.max_price, dec!(1000000));
        assert_eq!(rules.min_qty, dec!(0.00001));
        assert_eq!(rules.max_qty, dec!(9000));
        assert_eq!(rules.step_size, dec!(0.00001));
        assert_eq!(rules.min_notional, dec!(5));
    }

    #[test]
    fn missing_filters_default_to_zero() {
        let body = r#"{"symbols": [{"symbol": "ETHUSDT", "filters": []}]}"#;
        let rules = parse_price_rules(&Symbol::from("ETHUSDT"), body).unwrap();

        assert_eq!(rules, PriceRules::default());
    }

    #[test]
    fn unknown_symbol_is_reported() {
        let body = r#"{"symbols": []}"#;

        assert!(matches!(
            parse_price_rules(&Symbol::from("NOPE"), body),
            Err(Error::SymbolNotFound(s)) if s == "NOPE"
        ));
    }

    #[test]
    fn api_error_object_is_surfaced() {
        let body = r#"{"code": -1121, "msg": "Invalid symbol."}"#;

        assert!(matches!(
            parse_price_rules(&Symbol::from("NOPE"), body),
            Err(Error::ApiError { code: -1121, .. })
        ));
    }

    #[test]
    fn client_uses_configured_rest_url() {
        let settings = BinanceSettings {
            rest_base_url: Some("http://localhost:8080/".to_string()),
            ..BinanceSettings::default()
        };
        let client = ApiClient::new(&settings).unwrap();

        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
