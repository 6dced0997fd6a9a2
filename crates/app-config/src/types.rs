// In crates/app-config/src/types.rs

use environment::EnvironmentSettings;
use policies::types::PolicySettings;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

const BINANCE_REST_URL: &str = "https://api.binance.com";
const BINANCE_WS_URL: &str = "wss://stream.binance.com:9443/ws";
const BINANCE_TESTNET_REST_URL: &str = "https://testnet.binance.vision";
const BINANCE_TESTNET_WS_URL: &str = "wss://testnet.binance.vision/ws";

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    #[serde(default)]
    pub app: AppSettings,
    /// Settings for the Binance API.
    #[serde(default)]
    pub binance: BinanceSettings,
    /// Settings for the simulation environment.
    #[serde(default)]
    pub environment: EnvironmentSettings,
    /// Settings for paper-trading sessions.
    #[serde(default)]
    pub paper: PaperSettings,
    #[serde(default)]
    pub policies: PolicySettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct BinanceSettings {
    /// The API key for Binance. Only needed for authenticated endpoints.
    #[serde(default)]
    pub api_key: String,
    /// The secret key for Binance.
    #[serde(default)]
    pub secret_key: String,
    /// Overrides the REST base URL.
    #[serde(default)]
    pub rest_base_url: Option<String>,
    /// Overrides the WebSocket base URL.
    #[serde(default)]
    pub ws_base_url: Option<String>,
    /// Use the Binance testnet endpoints.
    #[serde(default)]
    pub testnet: bool,
}

impl BinanceSettings {
    pub fn rest_url(&self) -> &str {
        match &self.rest_base_url {
            Some(url) => url,
            None if self.testnet => BINANCE_TESTNET_REST_URL,
            None => BINANCE_REST_URL,
        }
    }

    pub fn ws_url(&self) -> &str {
        match &self.ws_base_url {
            Some(url) => url,
            None if self.testnet => BINANCE_TESTNET_WS_URL,
            None => BINANCE_WS_URL,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PaperSettings {
    /// The cash balance a paper session starts with.
    #[serde(default = "default_starting_cash")]
    pub starting_cash: Decimal,
    /// Share of available cash committed by a buy, in (0, 1].
    #[serde(default = "default_order_fraction")]
    pub order_fraction: Decimal,
}

impl Default for PaperSettings {
    fn default() -> Self {
        Self {
            starting_cash: default_starting_cash(),
            order_fraction: default_order_fraction(),
        }
    }
}

fn default_starting_cash() -> Decimal {
    dec!(1000)
}

fn default_order_fraction() -> Decimal {
    dec!(1)
}
