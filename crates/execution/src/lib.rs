// In crates/execution/src/lib.rs

pub mod error;
pub mod ledger;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use types::{Fill, LedgerSummary, Position, PositionSummary};
