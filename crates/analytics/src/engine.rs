// In crates/analytics/src/engine.rs

use crate::types::{PerformanceSummary, PortfolioSnapshot, TradeRecord};
use rust_decimal::Decimal;

/// Calculates summary figures from a tracked balance history.
#[derive(Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summarize(&self, history: &[PortfolioSnapshot], trades: &[TradeRecord]) -> PerformanceSummary {
        let mut summary = PerformanceSummary {
            snapshots: history.len(),
            trades: trades.len(),
            ..PerformanceSummary::default()
        };
        let Some(last) = history.last() else {
            return summary;
        };
        summary.final_balance = last.balance;
        summary.net_pnl = last.pnl;

        // Max drawdown against the running peak of the balance curve.
        let mut peak = history[0].balance;
        let mut max_drawdown = Decimal::ZERO;
        for snapshot in history {
            peak = peak.max(snapshot.balance);
            max_drawdown = max_drawdown.max(peak - snapshot.balance);
        }
        summary.max_drawdown = max_drawdown;

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn snap(balance: Decimal, pnl: Decimal) -> PortfolioSnapshot {
        PortfolioSnapshot {
            timestamp: Utc::now(),
            balance,
            pnl,
        }
    }

    #[test]
    fn empty_history_gives_default_summary() {
        let summary = AnalyticsEngine::new().summarize(&[], &[]);
        assert_eq!(summary, PerformanceSummary::default());
    }

    #[test]
    fn drawdown_is_measured_from_running_peak() {
        let history = [
            snap(dec!(1000), dec!(0)),
            snap(dec!(1100), dec!(100)),
            snap(dec!(950), dec!(-50)),
            snap(dec!(1200), dec!(200)),
            snap(dec!(1150), dec!(150)),
        ];
        let summary = AnalyticsEngine::new().summarize(&history, &[]);

        assert_eq!(summary.snapshots, 5);
        assert_eq!(summary.final_balance, dec!(1150));
        assert_eq!(summary.net_pnl, dec!(150));
        assert_eq!(summary.max_drawdown, dec!(150));
    }
}
