// In crates/analytics/src/lib.rs

pub mod engine;
pub mod error;
pub mod tracker;
pub mod types;

pub use engine::AnalyticsEngine;
pub use error::{Error, Result};
pub use tracker::PortfolioTracker;
pub use types::{PerformanceSummary, PortfolioSnapshot, TradeRecord};
