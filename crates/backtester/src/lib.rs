// In crates/backtester/src/lib.rs

pub mod data;

use analytics::PortfolioTracker;
use core_types::{Action, Side};
use environment::SimulationEnvironment;
use policies::Policy;
use rust_decimal::Decimal;

pub use data::{DEFAULT_PRICE_COLUMN, load_prices_csv};

/// How often each action was chosen during an episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionCounts {
    pub hold: usize,
    pub buy: usize,
    pub sell: usize,
}

impl ActionCounts {
    fn record(&mut self, action: Action) {
        match action {
            Action::Hold => self.hold += 1,
            Action::Buy => self.buy += 1,
            Action::Sell => self.sell += 1,
        }
    }
}

/// The outcome of one full traversal of the price series.
#[derive(Debug, Clone)]
pub struct EpisodeReport {
    pub steps: usize,
    pub total_reward: Decimal,
    pub final_portfolio_value: Decimal,
    pub actions: ActionCounts,
    /// Portfolio value after every step plus the executed trades.
    pub tracker: PortfolioTracker,
}

impl EpisodeReport {
    /// Portfolio value before the first step and after every step.
    pub fn equity_curve(&self) -> Vec<Decimal> {
        self.tracker.history().iter().map(|s| s.balance).collect()
    }
}

/// Drives a policy through the simulation environment, episode by episode.
pub struct EpisodeRunner {
    pub env: SimulationEnvironment,
    pub policy: Box<dyn Policy + Send>,
}

impl EpisodeRunner {
    pub fn new(env: SimulationEnvironment, policy: Box<dyn Policy + Send>) -> Self {
        Self { env, policy }
    }

    /// Runs one episode from `reset` to the terminal step.
    pub fn run_episode(&mut self) -> anyhow::Result<EpisodeReport> {
        let mut observation = self.env.reset();
        self.policy.reset();

        let initial_balance = self.env.settings().initial_balance;
        let mut tracker = PortfolioTracker::new();
        tracker.log_snapshot(initial_balance, Decimal::ZERO, None);

        let mut actions = ActionCounts::default();
        let mut total_reward = Decimal::ZERO;
        let mut steps = 0;

        loop {
            let action = self.policy.act(&observation);
            actions.record(action);

            let fill_price = observation.price;
            let holdings_before = observation.holdings;
            let result = self.env.step(action)?;
            steps += 1;
            total_reward += result.reward;

            let holdings_after = result.observation.holdings;
            if holdings_after > holdings_before {
                tracker.log_trade("SIM", holdings_after - holdings_before, fill_price, Side::Buy, None);
            } else if holdings_after < holdings_before {
                tracker.log_trade("SIM", holdings_before - holdings_after, fill_price, Side::Sell, None);
            }

            let value = result.info.portfolio_value;
            tracker.log_snapshot(value, value - initial_balance, None);

            observation = result.observation;
            if result.done {
                break;
            }
        }

        let final_portfolio_value = self.env.portfolio_value();
        tracing::info!(
            policy = self.policy.name(),
            steps,
            %total_reward,
            %final_portfolio_value,
            trades = tracker.trades().len(),
            "Episode finished."
        );

        Ok(EpisodeReport {
            steps,
            total_reward,
            final_portfolio_value,
            actions,
            tracker,
        })
    }

    /// Runs `episodes` consecutive episodes.
    pub fn run(&mut self, episodes: usize) -> anyhow::Result<Vec<EpisodeReport>> {
        (0..episodes).map(|_| self.run_episode()).collect()
    }
}
