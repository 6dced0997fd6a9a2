// In crates/engine/src/paper.rs

use crate::next_update;
use analytics::PortfolioTracker;
use api_client::TickerUpdate;
use app_config::PaperSettings;
use chrono::{DateTime, TimeZone, Utc};
use core_types::{Action, Side, Symbol};
use environment::Observation;
use environment::env::QTY_SCALE;
use execution::{Fill, Ledger};
use futures::Stream;
use policies::Policy;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A paper-trading loop for a single symbol.
///
/// Every price update is applied to the ledger and, under the same lock, turned
/// into an observation for the policy whose decision is filled immediately.
/// Holding the lock across both keeps a concurrent price update from landing
/// between the mark and the fill.
pub struct PaperSession {
    symbol: Symbol,
    /// Shared with anyone who wants to inspect the account while the session runs.
    ledger: Arc<Mutex<Ledger>>,
    policy: Box<dyn Policy + Send>,
    order_fraction: Decimal,
    tracker: PortfolioTracker,
}

impl PaperSession {
    pub fn new(symbol: Symbol, settings: &PaperSettings, policy: Box<dyn Policy + Send>) -> Self {
        Self {
            symbol,
            ledger: Arc::new(Mutex::new(Ledger::new(settings.starting_cash))),
            policy,
            order_fraction: settings.order_fraction,
            tracker: PortfolioTracker::new(),
        }
    }

    pub fn ledger(&self) -> Arc<Mutex<Ledger>> {
        Arc::clone(&self.ledger)
    }

    pub fn tracker(&self) -> &PortfolioTracker {
        &self.tracker
    }

    /// Applies one price observation: marks the ledger, asks the policy and
    /// executes its order. Ledger rejections are logged, not returned.
    pub async fn on_price(&mut self, price: Decimal, timestamp: Option<DateTime<Utc>>) -> Option<Fill> {
        let mut ledger = self.ledger.lock().await;

        if let Err(e) = ledger.update_price(&self.symbol, price) {
            tracing::warn!(symbol = %self.symbol, error = %e, "Rejected price update.");
            return None;
        }

        let holdings = ledger
            .position(&self.symbol)
            .map(|p| p.quantity)
            .unwrap_or_default();
        let observation = Observation {
            price,
            balance: ledger.cash(),
            holdings,
        };
        let action = self.policy.act(&observation);

        let order = match action {
            Action::Hold => None,
            Action::Buy => (ledger.cash() * self.order_fraction)
                .checked_div(price)
                .map(|qty| qty.round_dp_with_strategy(QTY_SCALE, RoundingStrategy::ToZero))
                .filter(|qty| *qty > Decimal::ZERO)
                .map(|qty| (Side::Buy, qty)),
            Action::Sell => (holdings > Decimal::ZERO).then_some((Side::Sell, holdings)),
        };

        let fill = match order {
            Some((side, quantity)) => match ledger.execute_order(&self.symbol, side, quantity) {
                Ok(fill) => {
                    tracing::info!(symbol = %self.symbol, %side, %quantity, %price, "Paper order filled.");
                    self.tracker
                        .log_trade(&self.symbol.0, fill.quantity, fill.price, fill.side, timestamp);
                    Some(fill)
                }
                Err(e) => {
                    tracing::warn!(symbol = %self.symbol, %side, %quantity, error = %e, "Paper order rejected.");
                    None
                }
            },
            None => None,
        };

        let value = ledger.portfolio_value();
        self.tracker
            .log_snapshot(value, value.saturating_sub(ledger.starting_cash()), timestamp);
        fill
    }

    /// Consumes a price stream until it ends, Ctrl-C is pressed or
    /// `max_ticks` updates have been processed.
    pub async fn run<S>(&mut self, mut prices: S, max_ticks: Option<usize>) -> anyhow::Result<()>
    where
        S: Stream<Item = api_client::Result<TickerUpdate>> + Unpin,
    {
        tracing::info!(symbol = %self.symbol, policy = self.policy.name(), "Starting paper trading session.");
        self.policy.reset();

        let mut ticks = 0usize;
        while max_ticks.is_none_or(|max| ticks < max) {
            let Some(update) = next_update(&mut prices).await else {
                break;
            };
            let timestamp = Utc.timestamp_millis_opt(update.event_time).single();
            self.on_price(update.last_price, timestamp).await;
            ticks += 1;
        }

        let ledger = self.ledger.lock().await;
        tracing::info!(
            symbol = %self.symbol,
            ticks,
            trades = self.tracker.trades().len(),
            summary = ?ledger.summary(),
            "Paper trading session finished."
        );
        Ok(())
    }
}
