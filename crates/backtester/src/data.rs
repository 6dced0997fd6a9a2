// In crates/backtester/src/data.rs

use anyhow::{Context, Result, anyhow, bail};
use rust_decimal::Decimal;
use std::path::Path;

/// The column read when the caller does not name one.
pub const DEFAULT_PRICE_COLUMN: &str = "price";

/// Loads the `column` values of a CSV file with a header row as a price series.
pub fn load_prices_csv(path: impl AsRef<Path>, column: &str) -> Result<Vec<Decimal>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open price file: {:?}", path))?;

    let index = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| anyhow!("Price file {:?} has no '{}' column", path, column))?;

    let mut prices = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {}", row + 1))?;
        let Some(raw) = record.get(index) else {
            bail!("Row {} has no value in column '{}'", row + 1, column);
        };
        let raw = raw.trim();
        let price = raw
            .parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(raw))
            .map_err(|e| anyhow!("Row {}: invalid price {:?}: {}", row + 1, raw, e))?;
        prices.push(price);
    }

    tracing::info!(path = ?path, column, count = prices.len(), "Loaded price series.");
    Ok(prices)
}
