// In crates/environment/src/types.rs

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Configuration constants for a simulation episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSettings {
    /// The cash balance every episode starts with.
    #[serde(default = "default_initial_balance")]
    pub initial_balance: Decimal,

    /// Proportional fee charged on trade notional (e.g., 0.001 for 0.1%).
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Decimal,
}

fn default_initial_balance() -> Decimal {
    dec!(1000)
}

fn default_fee_rate() -> Decimal {
    dec!(0.001)
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            initial_balance: default_initial_balance(),
            fee_rate: default_fee_rate(),
        }
    }
}

/// What the agent sees after `reset` and after every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub price: Decimal,
    pub balance: Decimal,
    pub holdings: Decimal,
}

impl Observation {
    /// Number of features in an observation vector.
    pub const SIZE: usize = 3;

    /// The observation as a float feature vector `[price, balance, holdings]`.
    pub fn to_features(&self) -> [f64; Self::SIZE] {
        [
            self.price.to_f64().unwrap_or(0.0),
            self.balance.to_f64().unwrap_or(0.0),
            self.holdings.to_f64().unwrap_or(0.0),
        ]
    }
}

/// Diagnostic payload attached to every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepInfo {
    /// Mark-to-market value after the transition: `balance + holdings * next_price`.
    pub portfolio_value: Decimal,
}

/// The outcome of a single `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub observation: Observation,
    /// Change in mark-to-market portfolio value across the transition.
    pub reward: Decimal,
    pub done: bool,
    pub info: StepInfo,
}
