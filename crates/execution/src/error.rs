// In crates/execution/src/error.rs

use core_types::Symbol;
use rust_decimal::Decimal;
use thiserror::Error;

/// Order and price-update rejections. The ledger is left untouched whenever
/// one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Side must be 'buy' or 'sell', got '{0}'")]
    InvalidSide(String),

    #[error("No price available for symbol '{symbol}'")]
    NoPriceAvailable { symbol: Symbol },

    #[error("Insufficient cash for purchase: requires {required}, available {available}")]
    InsufficientCash { required: Decimal, available: Decimal },

    #[error("Insufficient quantity to sell: requested {requested}, held {held}")]
    InsufficientQuantity { requested: Decimal, held: Decimal },

    #[error("Order quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    #[error("Price must not be negative, got {0}")]
    InvalidPrice(Decimal),

    #[error("Order would overflow the representable cash or position size")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, Error>;
