// In crates/analytics/src/types.rs

use chrono::{DateTime, Utc};
use core_types::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// State of the portfolio at a given time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub timestamp: DateTime<Utc>,
    pub balance: Decimal,
    pub pnl: Decimal,
}

/// Record of a trade executed by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: DateTime<Utc>,
    pub pair: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub side: Side,
}

/// Aggregate figures over a tracked session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub snapshots: usize,
    pub trades: usize,
    pub final_balance: Decimal,
    pub net_pnl: Decimal,
    /// Largest fall of the balance from its running peak.
    pub max_drawdown: Decimal,
}
