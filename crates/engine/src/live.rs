// In crates/engine/src/live.rs

use crate::next_update;
use analytics::PortfolioTracker;
use api_client::TickerUpdate;
use chrono::{TimeZone, Utc};
use core_types::Symbol;
use futures::Stream;
use rust_decimal::Decimal;

/// Watches a live price stream without trading.
///
/// Each update is recorded as a snapshot whose balance is the last price and
/// whose pnl is the change since the first price seen.
pub struct LiveSession {
    symbol: Symbol,
    first_price: Option<Decimal>,
    tracker: PortfolioTracker,
}

impl LiveSession {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            first_price: None,
            tracker: PortfolioTracker::new(),
        }
    }

    pub fn tracker(&self) -> &PortfolioTracker {
        &self.tracker
    }

    fn on_update(&mut self, update: &TickerUpdate) {
        let first = *self.first_price.get_or_insert(update.last_price);
        let change = update.last_price - first;
        tracing::info!(symbol = %self.symbol, price = %update.last_price, %change, "Price update.");
        self.tracker.log_snapshot(
            update.last_price,
            change,
            Utc.timestamp_millis_opt(update.event_time).single(),
        );
    }

    pub async fn run<S>(&mut self, mut prices: S, max_ticks: Option<usize>) -> anyhow::Result<()>
    where
        S: Stream<Item = api_client::Result<TickerUpdate>> + Unpin,
    {
        tracing::info!(symbol = %self.symbol, "Monitoring live prices. No orders will be placed.");

        let mut ticks = 0usize;
        while max_ticks.is_none_or(|max| ticks < max) {
            let Some(update) = next_update(&mut prices).await else {
                break;
            };
            self.on_update(&update);
            ticks += 1;
        }

        tracing::info!(symbol = %self.symbol, ticks, "Live monitoring finished.");
        Ok(())
    }
}
