// In crates/environment/src/env.rs

use crate::types::{EnvironmentSettings, Observation, StepInfo, StepResult};
use crate::{Error, Result};
use core_types::Action;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept when sizing a buy. Truncating toward zero keeps the
/// fee-inclusive cost at or below the available cash.
pub const QTY_SCALE: u32 = 12;

/// A deterministic, single-asset trading MDP driven by a fixed price series.
///
/// The agent chooses between holding, buying with all available cash and
/// selling all holdings. The reward of a transition is the change in
/// mark-to-market portfolio value, fees included.
#[derive(Debug, Clone)]
pub struct SimulationEnvironment {
    /// The historical price series, one entry per time step.
    prices: Vec<Decimal>,
    settings: EnvironmentSettings,
    current_step: usize,
    balance: Decimal,
    holdings: Decimal,
    done: bool,
}

impl SimulationEnvironment {
    /// Creates a new environment, already reset to step 0.
    ///
    /// The series must hold at least 2 strictly positive prices, the fee rate
    /// must lie in `[0, 1)` and the initial balance must not be negative.
    pub fn new(prices: Vec<Decimal>, settings: EnvironmentSettings) -> Result<Self> {
        if prices.len() < 2 {
            return Err(Error::PriceSeriesTooShort { len: prices.len() });
        }
        if let Some((index, price)) = prices.iter().enumerate().find(|(_, p)| **p <= Decimal::ZERO) {
            return Err(Error::NonPositivePrice { index, price: *price });
        }
        if settings.fee_rate < Decimal::ZERO || settings.fee_rate >= Decimal::ONE {
            return Err(Error::InvalidFeeRate(settings.fee_rate));
        }
        if settings.initial_balance < Decimal::ZERO {
            return Err(Error::InvalidInitialBalance(settings.initial_balance));
        }

        let mut env = Self {
            prices,
            settings,
            current_step: 0,
            balance: Decimal::ZERO,
            holdings: Decimal::ZERO,
            done: false,
        };
        env.reset();
        Ok(env)
    }

    /// Restores the initial state and returns the observation for step 0.
    pub fn reset(&mut self) -> Observation {
        self.balance = self.settings.initial_balance;
        self.holdings = Decimal::ZERO;
        self.current_step = 0;
        self.done = false;
        self.observation()
    }

    /// Applies `action` at the current price, then advances one step.
    ///
    /// Buying with insufficient cash and selling with no holdings are no-ops,
    /// not errors. Stepping again after `done` without a `reset` fails with
    /// `EpisodeFinished`. A transition whose portfolio value cannot be
    /// represented fails with `ValueOverflow` and leaves the state unchanged.
    pub fn step(&mut self, action: Action) -> Result<StepResult> {
        if self.done {
            return Err(Error::EpisodeFinished);
        }

        let price = self.prices[self.current_step];
        let prev_value = value_of(self.balance, self.holdings, price)?;
        let fee_rate = self.settings.fee_rate;
        let (balance, holdings) = match action {
            Action::Hold => (self.balance, self.holdings),
            Action::Buy => self.buy(price, fee_rate)?,
            Action::Sell => {
                let revenue = self
                    .holdings
                    .checked_mul(price)
                    .map(|gross| gross * (Decimal::ONE - fee_rate))
                    .ok_or(Error::ValueOverflow)?;
                let balance = self.balance.checked_add(revenue).ok_or(Error::ValueOverflow)?;
                (balance, Decimal::ZERO)
            }
        };

        let next_step = self.current_step + 1;
        let next_price = self.prices[next_step];
        let current_value = value_of(balance, holdings, next_price)?;
        let reward = current_value - prev_value;

        self.balance = balance;
        self.holdings = holdings;
        self.current_step = next_step;
        self.done = self.current_step >= self.prices.len() - 1;

        tracing::trace!(
            step = self.current_step,
            %action,
            %reward,
            portfolio_value = %current_value,
            done = self.done,
            "Environment transition."
        );

        Ok(StepResult {
            observation: self.observation(),
            reward,
            done: self.done,
            info: StepInfo {
                portfolio_value: current_value,
            },
        })
    }

    /// Sizes an all-in buy so the fee-inclusive cost fits the balance.
    /// Returns the post-trade `(balance, holdings)`.
    fn buy(&self, price: Decimal, fee_rate: Decimal) -> Result<(Decimal, Decimal)> {
        // A unit price beyond the decimal range cannot be afforded.
        let Some(unit_cost) = price.checked_mul(Decimal::ONE + fee_rate) else {
            return Ok((self.balance, self.holdings));
        };
        let qty = self
            .balance
            .checked_div(unit_cost)
            .ok_or(Error::ValueOverflow)?
            .round_dp_with_strategy(QTY_SCALE, RoundingStrategy::ToZero);
        let cost = qty.checked_mul(unit_cost).ok_or(Error::ValueOverflow)?;
        if qty > Decimal::ZERO && cost <= self.balance {
            let holdings = self.holdings.checked_add(qty).ok_or(Error::ValueOverflow)?;
            Ok((self.balance - cost, holdings))
        } else {
            Ok((self.balance, self.holdings))
        }
    }

    /// Steps with a raw action index as produced by a discrete policy head.
    pub fn step_index(&mut self, action: i64) -> Result<StepResult> {
        let action = Action::try_from(action).map_err(|_| Error::InvalidAction(action))?;
        self.step(action)
    }

    /// Reports the current state as a single diagnostic line. Never mutates state.
    pub fn render(&self) -> String {
        let price = self.current_price();
        let value = self.value_at(price);
        let line = format!(
            "Step: {} | Price: {:.2} | Balance: {:.2} | Holdings: {:.4} | Value: {:.2}",
            self.current_step, price, self.balance, self.holdings, value
        );
        tracing::info!(
            step = self.current_step,
            %price,
            balance = %self.balance,
            holdings = %self.holdings,
            value = %value,
            "{}",
            line
        );
        line
    }

    pub fn observation(&self) -> Observation {
        Observation {
            price: self.current_price(),
            balance: self.balance,
            holdings: self.holdings,
        }
    }

    /// Mark-to-market value at the current step's price.
    pub fn portfolio_value(&self) -> Decimal {
        self.value_at(self.current_price())
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn current_price(&self) -> Decimal {
        self.prices[self.current_step]
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn holdings(&self) -> Decimal {
        self.holdings
    }

    pub fn prices(&self) -> &[Decimal] {
        &self.prices
    }

    pub fn settings(&self) -> &EnvironmentSettings {
        &self.settings
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn observation_size(&self) -> usize {
        Observation::SIZE
    }

    pub fn action_count(&self) -> usize {
        Action::COUNT
    }

    /// Saturates at `Decimal::MAX` for read-only reporting.
    fn value_at(&self, price: Decimal) -> Decimal {
        self.balance.saturating_add(self.holdings.saturating_mul(price))
    }
}

fn value_of(balance: Decimal, holdings: Decimal, price: Decimal) -> Result<Decimal> {
    holdings
        .checked_mul(price)
        .and_then(|market| balance.checked_add(market))
        .ok_or(Error::ValueOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn settings(initial_balance: Decimal, fee_rate: Decimal) -> EnvironmentSettings {
        EnvironmentSettings {
            initial_balance,
            fee_rate,
        }
    }

    fn env(prices: &[Decimal], fee_rate: Decimal) -> SimulationEnvironment {
        SimulationEnvironment::new(prices.to_vec(), settings(dec!(1000), fee_rate)).unwrap()
    }

    #[test]
    fn new_rejects_invalid_inputs() {
        let ok = settings(dec!(1000), dec!(0.001));

        assert_eq!(
            SimulationEnvironment::new(vec![dec!(100)], ok.clone()).unwrap_err(),
            Error::PriceSeriesTooShort { len: 1 }
        );
        assert_eq!(
            SimulationEnvironment::new(vec![dec!(100), dec!(0)], ok.clone()).unwrap_err(),
            Error::NonPositivePrice { index: 1, price: dec!(0) }
        );
        assert!(matches!(
            SimulationEnvironment::new(vec![dec!(1), dec!(2)], settings(dec!(1000), dec!(1))),
            Err(Error::InvalidFeeRate(_))
        ));
        assert!(matches!(
            SimulationEnvironment::new(vec![dec!(1), dec!(2)], settings(dec!(1000), dec!(-0.1))),
            Err(Error::InvalidFeeRate(_))
        ));
        assert!(matches!(
            SimulationEnvironment::new(vec![dec!(1), dec!(2)], settings(dec!(-1), dec!(0))),
            Err(Error::InvalidInitialBalance(_))
        ));
    }

    #[test]
    fn reset_reproduces_initial_observation() {
        let mut env = env(&[dec!(100), dec!(110), dec!(90)], dec!(0.001));
        let expected = Observation {
            price: dec!(100),
            balance: dec!(1000),
            holdings: dec!(0),
        };

        assert_eq!(env.reset(), expected);
        env.step(Action::Buy).unwrap();
        assert_eq!(env.reset(), expected);
        assert_eq!(env.reset(), expected);
        assert_eq!(env.current_step(), 0);
        assert!(!env.is_done());
    }

    #[test]
    fn two_point_series_terminates_after_one_step() {
        let mut env = env(&[dec!(100), dec!(101)], dec!(0.001));
        let result = env.step(Action::Hold).unwrap();

        assert!(result.done);
        assert_eq!(result.observation.price, dec!(101));
        assert_eq!(env.step(Action::Hold).unwrap_err(), Error::EpisodeFinished);

        env.reset();
        assert!(env.step(Action::Hold).is_ok());
    }

    #[test]
    fn hold_without_holdings_yields_zero_reward() {
        let mut env = env(&[dec!(100), dec!(150), dec!(50)], dec!(0.001));
        let result = env.step(Action::Hold).unwrap();

        assert_eq!(result.reward, dec!(0));
        assert_eq!(result.observation.balance, dec!(1000));
        assert_eq!(result.info.portfolio_value, dec!(1000));
    }

    #[test]
    fn fee_free_buy_spends_entire_balance() {
        let mut env = env(&[dec!(100), dec!(110), dec!(120)], dec!(0));
        let result = env.step(Action::Buy).unwrap();

        assert_eq!(result.observation.balance, dec!(0));
        assert_eq!(result.observation.holdings, dec!(10));
        assert_eq!(result.reward, dec!(100));
        assert_eq!(result.info.portfolio_value, dec!(1100));
    }

    #[test]
    fn buy_with_fee_keeps_cost_within_balance() {
        let mut env = env(&[dec!(100), dec!(100), dec!(100)], dec!(0.001));
        let result = env.step(Action::Buy).unwrap();

        assert!(result.observation.balance >= dec!(0));
        assert!(result.observation.holdings > dec!(0));
        // The whole fee is lost on entry.
        assert!(result.reward < dec!(0));
        assert!(result.reward > dec!(-1.0));
    }

    #[test]
    fn sell_without_holdings_is_a_no_op() {
        let mut env = env(&[dec!(100), dec!(120), dec!(80)], dec!(0.001));
        let result = env.step(Action::Sell).unwrap();

        assert_eq!(result.observation.balance, dec!(1000));
        assert_eq!(result.observation.holdings, dec!(0));
        assert_eq!(result.reward, dec!(0));
    }

    #[test]
    fn buy_then_sell_at_flat_price_loses_fees_twice() {
        let fee = dec!(0.001);
        let mut env = env(&[dec!(100), dec!(100), dec!(100)], fee);
        env.step(Action::Buy).unwrap();
        let result = env.step(Action::Sell).unwrap();

        let balance = result.observation.balance;
        let expected = dec!(1000) * (Decimal::ONE - fee) * (Decimal::ONE - fee);
        assert!(balance < dec!(1000));
        assert!((balance - expected).abs() < dec!(0.01));
        assert_eq!(result.observation.holdings, dec!(0));
    }

    #[test]
    fn rewards_telescope_to_total_value_change() {
        let prices = [
            dec!(100), dec!(103.5), dec!(98.25), dec!(101), dec!(110.75),
            dec!(107), dec!(95.5), dec!(99), dec!(104.2), dec!(108),
        ];
        let actions = [
            Action::Buy, Action::Hold, Action::Sell, Action::Buy, Action::Hold,
            Action::Buy, Action::Sell, Action::Sell, Action::Buy,
        ];
        let mut env = env(&prices, dec!(0.001));

        let mut total_reward = Decimal::ZERO;
        let mut last = None;
        for action in actions {
            let result = env.step(action).unwrap();
            total_reward += result.reward;
            last = Some(result);
        }

        let last = last.unwrap();
        assert!(last.done);
        assert_eq!(total_reward, last.info.portfolio_value - dec!(1000));
    }

    #[test]
    fn balance_and_holdings_never_go_negative() {
        let prices: Vec<Decimal> = (0..40)
            .map(|i| Decimal::from(100 + (i * 37) % 23) + dec!(0.37))
            .collect();
        let mut env = env(&prices, dec!(0.0025));

        let mut i = 0usize;
        loop {
            let action = Action::ALL[(i * 7 + i / 3) % Action::COUNT];
            let result = env.step(action).unwrap();
            assert!(result.observation.balance >= dec!(0));
            assert!(result.observation.holdings >= dec!(0));
            if result.done {
                break;
            }
            i += 1;
        }
        assert_eq!(env.current_step(), prices.len() - 1);
    }

    #[test]
    fn step_index_rejects_unknown_actions() {
        let mut env = env(&[dec!(100), dec!(101)], dec!(0));

        assert_eq!(env.step_index(3).unwrap_err(), Error::InvalidAction(3));
        assert_eq!(env.current_step(), 0);
        assert!(env.step_index(1).is_ok());
    }

    #[test]
    fn render_does_not_change_state() {
        let env = env(&[dec!(100), dec!(101)], dec!(0));
        let before = env.observation();
        let line = env.render();

        assert!(line.starts_with("Step: 0 | Price: 100.00"));
        assert_eq!(env.observation(), before);
    }

    #[test]
    fn unrepresentable_value_fails_without_changing_state() {
        let huge = Decimal::from_scientific("1e20").unwrap();
        let balance = Decimal::from_scientific("1e10").unwrap();
        let mut env =
            SimulationEnvironment::new(vec![dec!(1), huge, dec!(1)], settings(balance, dec!(0))).unwrap();

        assert_eq!(env.step(Action::Buy).unwrap_err(), Error::ValueOverflow);
        assert_eq!(env.current_step(), 0);
        assert_eq!(env.balance(), balance);
        assert_eq!(env.holdings(), dec!(0));

        // Holding cash through the spike stays representable.
        assert!(env.step(Action::Hold).is_ok());
    }

    #[test]
    fn unaffordable_unit_price_makes_buy_a_no_op() {
        let mut env = SimulationEnvironment::new(
            vec![Decimal::MAX, dec!(1)],
            settings(dec!(1000), dec!(0.5)),
        )
        .unwrap();
        let result = env.step(Action::Buy).unwrap();

        assert_eq!(result.observation.holdings, dec!(0));
        assert_eq!(result.observation.balance, dec!(1000));
    }
}
