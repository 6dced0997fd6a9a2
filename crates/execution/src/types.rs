// In crates/execution/src/types.rs

use core_types::{Side, Symbol};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// A per-symbol holding record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub quantity: Decimal,
    /// The most recently observed price. Zero means "no market data yet".
    pub last_price: Decimal,
}

impl Position {
    /// Quantity times last price, saturating at `Decimal::MAX`.
    pub fn market_value(&self) -> Decimal {
        self.quantity.saturating_mul(self.last_price)
    }
}

/// The record of an order filled by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fill {
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Decimal,
    pub price: Decimal,
    pub notional: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionSummary {
    pub quantity: Decimal,
    pub last_price: Decimal,
    pub market_value: Decimal,
}

/// A read-only snapshot of the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub cash: Decimal,
    /// Keyed by symbol string, ordered for stable output.
    pub positions: BTreeMap<String, PositionSummary>,
    pub portfolio_value: Decimal,
}
