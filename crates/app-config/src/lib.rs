// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use rust_decimal::Decimal;
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, BinanceSettings, PaperSettings, Settings};

/// Loads the application settings from the `config/` directory.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new("config"))
}

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
///
/// Binance credentials left empty by all layers fall back to the
/// `BINANCE_API_KEY` / `BINANCE_API_SECRET` variables.
pub fn load_settings_from(config_dir: &Path) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    build_settings(config_dir, &environment, Environment::with_prefix("APP").separator("__"))
}

fn build_settings(config_dir: &Path, environment: &str, env_source: Environment) -> Result<Settings> {
    let settings = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::from(config_dir.join("base")))
        // 2. Load the environment-specific configuration file.
        .add_source(File::from(config_dir.join(environment)).required(false))
        // 3. Load settings from environment variables (e.g., `APP__PAPER__STARTING_CASH=...`).
        // The prefix is `APP` and every level, prefix included, is joined by `__`.
        .add_source(env_source)
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let mut settings: Settings = settings.try_deserialize()?;

    if settings.binance.api_key.is_empty() {
        settings.binance.api_key = std::env::var("BINANCE_API_KEY").unwrap_or_default();
    }
    if settings.binance.secret_key.is_empty() {
        settings.binance.secret_key = std::env::var("BINANCE_API_SECRET").unwrap_or_default();
    }

    validate(&settings)?;
    Ok(settings)
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn validate(settings: &Settings) -> Result<()> {
    let level = settings.app.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(Error::Invalid(format!(
            "app.log_level must be one of {}, got '{}'",
            LOG_LEVELS.join(", "),
            settings.app.log_level
        )));
    }
    let fraction = settings.paper.order_fraction;
    if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
        return Err(Error::Invalid(format!(
            "paper.order_fraction must be in (0, 1], got {}",
            fraction
        )));
    }
    if settings.paper.starting_cash < Decimal::ZERO {
        return Err(Error::Invalid(format!(
            "paper.starting_cash must not be negative, got {}",
            settings.paper.starting_cash
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;

    #[test]
    fn loads_base_file_and_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            r#"
[app]
log_level = "debug"

[environment]
initial_balance = "2500"
fee_rate = "0.002"

[paper]
starting_cash = "500"
"#,
        )
        .unwrap();

        let settings = load_settings_from(dir.path()).unwrap();

        assert_eq!(settings.app.log_level, "debug");
        assert_eq!(settings.environment.initial_balance, dec!(2500));
        assert_eq!(settings.environment.fee_rate, dec!(0.002));
        assert_eq!(settings.paper.starting_cash, dec!(500));
        assert_eq!(settings.paper.order_fraction, dec!(1));
        assert_eq!(settings.policies.ma_crossover.slow_period, 20);
    }

    #[test]
    fn missing_base_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_settings_from(dir.path()), Err(Error::LoadError(_))));
    }

    #[test]
    fn rejects_out_of_range_order_fraction() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            "[paper]\norder_fraction = \"1.5\"\n",
        )
        .unwrap();

        assert!(matches!(load_settings_from(dir.path()), Err(Error::Invalid(_))));
    }

    #[test]
    fn environment_variables_override_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), "[paper]\norder_fraction = \"1\"\n").unwrap();
        fs::write(dir.path().join("staging.toml"), "[paper]\nstarting_cash = \"750\"\n").unwrap();

        let vars = config::Map::from([
            ("APP__PAPER__ORDER_FRACTION".to_string(), "0.5".to_string()),
            // Single underscore after the prefix is not an override.
            ("APP_PAPER__STARTING_CASH".to_string(), "1".to_string()),
            ("APP_ENVIRONMENT".to_string(), "staging".to_string()),
        ]);
        let source = Environment::with_prefix("APP").separator("__").source(Some(vars));
        let settings = build_settings(dir.path(), "staging", source).unwrap();

        assert_eq!(settings.paper.order_fraction, dec!(0.5));
        assert_eq!(settings.paper.starting_cash, dec!(750));
        assert_eq!(settings.environment.fee_rate, dec!(0.001));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), "[app]\nlog_level = \"loud\"\n").unwrap();

        assert!(matches!(load_settings_from(dir.path()), Err(Error::Invalid(_))));
    }

    #[test]
    fn testnet_switches_default_endpoints() {
        let mut binance = BinanceSettings::default();
        assert_eq!(binance.rest_url(), "https://api.binance.com");

        binance.testnet = true;
        assert_eq!(binance.rest_url(), "https://testnet.binance.vision");
        assert_eq!(binance.ws_url(), "wss://testnet.binance.vision/ws");

        binance.ws_base_url = Some("ws://localhost:9000/ws".to_string());
        assert_eq!(binance.ws_url(), "ws://localhost:9000/ws");
    }
}
