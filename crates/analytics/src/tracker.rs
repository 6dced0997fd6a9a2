// In crates/analytics/src/tracker.rs

use crate::engine::AnalyticsEngine;
use crate::types::{PerformanceSummary, PortfolioSnapshot, TradeRecord};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use core_types::Side;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Tracks balances, PnL and trades of a trading session for later analysis.
#[derive(Debug, Default, Clone)]
pub struct PortfolioTracker {
    history: Vec<PortfolioSnapshot>,
    trades: Vec<TradeRecord>,
}

#[derive(Serialize)]
struct Report<'a> {
    summary: PerformanceSummary,
    history: &'a [PortfolioSnapshot],
    trades: &'a [TradeRecord],
}

impl PortfolioTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a snapshot of the portfolio. `timestamp` defaults to now.
    pub fn log_snapshot(&mut self, balance: Decimal, pnl: Decimal, timestamp: Option<DateTime<Utc>>) {
        self.history.push(PortfolioSnapshot {
            timestamp: timestamp.unwrap_or_else(Utc::now),
            balance,
            pnl,
        });
    }

    /// Appends a trade to the log. `timestamp` defaults to now.
    pub fn log_trade(
        &mut self,
        pair: &str,
        quantity: Decimal,
        price: Decimal,
        side: Side,
        timestamp: Option<DateTime<Utc>>,
    ) {
        self.trades.push(TradeRecord {
            timestamp: timestamp.unwrap_or_else(Utc::now),
            pair: pair.to_string(),
            quantity,
            price,
            side,
        });
    }

    pub fn history(&self) -> &[PortfolioSnapshot] {
        &self.history
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn summary(&self) -> PerformanceSummary {
        AnalyticsEngine::new().summarize(&self.history, &self.trades)
    }

    /// Writes the summary, balance history and trades as pretty JSON,
    /// creating parent directories as needed.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        if self.history.is_empty() {
            return Err(Error::EmptyHistory);
        }
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let report = Report {
            summary: self.summary(),
            history: &self.history,
            trades: &self.trades,
        };
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &report)?;
        Ok(())
    }
}
