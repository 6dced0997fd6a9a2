// In crates/environment/src/error.rs

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Price series must contain at least 2 entries, got {len}")]
    PriceSeriesTooShort { len: usize },

    #[error("Price at index {index} is not positive: {price}")]
    NonPositivePrice { index: usize, price: Decimal },

    #[error("Fee rate must be in [0, 1), got {0}")]
    InvalidFeeRate(Decimal),

    #[error("Initial balance must not be negative, got {0}")]
    InvalidInitialBalance(Decimal),

    #[error("Invalid action index {0}: expected 0 (hold), 1 (buy) or 2 (sell)")]
    InvalidAction(i64),

    #[error("Episode has finished; call reset() before stepping again")]
    EpisodeFinished,

    #[error("Portfolio value exceeds the representable decimal range")]
    ValueOverflow,
}

pub type Result<T> = std::result::Result<T, Error>;
