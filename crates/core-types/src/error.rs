// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid order side '{0}': expected 'buy' or 'sell'")]
    InvalidSide(String),

    #[error("Invalid action index {0}: expected 0 (hold), 1 (buy) or 2 (sell)")]
    InvalidAction(i64),
}

pub type Result<T> = std::result::Result<T, Error>;
