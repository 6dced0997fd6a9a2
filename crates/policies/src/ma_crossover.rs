// In crates/policies/src/ma_crossover.rs

use crate::types::MaCrossoverSettings;
use crate::Policy;
use anyhow::{anyhow, bail, Result};
use core_types::Action;
use environment::Observation;
use ta::indicators::ExponentialMovingAverage as Ema;
use ta::{Next, Reset};

/// Buys on a bullish EMA crossover of the observed price and sells on a
/// bearish one. Holds while the indicators warm up.
#[derive(Debug)]
pub struct MaCrossoverPolicy {
    settings: MaCrossoverSettings,
    fast_ema: Ema,
    slow_ema: Ema,
    last_fast: f64,
    last_slow: f64,
    /// Observations consumed since the last reset.
    seen: usize,
}

impl MaCrossoverPolicy {
    /// Creates a new policy. The fast period must be shorter than the slow one.
    pub fn new(settings: MaCrossoverSettings) -> Result<Self> {
        if settings.fast_period == 0 || settings.fast_period >= settings.slow_period {
            bail!(
                "Invalid EMA periods: fast ({}) must be positive and below slow ({})",
                settings.fast_period,
                settings.slow_period
            );
        }
        let fast_ema = Ema::new(settings.fast_period)
            .map_err(|e| anyhow!("Failed to build fast EMA: {:?}", e))?;
        let slow_ema = Ema::new(settings.slow_period)
            .map_err(|e| anyhow!("Failed to build slow EMA: {:?}", e))?;

        Ok(Self {
            settings,
            fast_ema,
            slow_ema,
            last_fast: 0.0,
            last_slow: 0.0,
            seen: 0,
        })
    }
}

impl Policy for MaCrossoverPolicy {
    fn name(&self) -> &'static str {
        "MaCrossover"
    }

    fn reset(&mut self) {
        self.fast_ema.reset();
        self.slow_ema.reset();
        self.last_fast = 0.0;
        self.last_slow = 0.0;
        self.seen = 0;
    }

    fn act(&mut self, observation: &Observation) -> Action {
        let [price, _, holdings] = observation.to_features();
        let fast = self.fast_ema.next(price);
        let slow = self.slow_ema.next(price);
        self.seen += 1;

        let warmed_up = self.seen > self.settings.slow_period;
        let action = if !warmed_up {
            Action::Hold
        } else if fast > slow && self.last_fast <= self.last_slow && holdings == 0.0 {
            Action::Buy
        } else if fast < slow && self.last_fast >= self.last_slow && holdings > 0.0 {
            Action::Sell
        } else {
            Action::Hold
        };

        self.last_fast = fast;
        self.last_slow = slow;
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn obs(price: Decimal, holdings: Decimal) -> Observation {
        Observation {
            price,
            balance: dec!(1000),
            holdings,
        }
    }

    #[test]
    fn new_rejects_inverted_periods() {
        let settings = MaCrossoverSettings {
            fast_period: 10,
            slow_period: 5,
        };
        assert!(MaCrossoverPolicy::new(settings).is_err());
    }

    #[test]
    fn buys_after_a_bullish_cross_and_sells_after_a_bearish_one() {
        let settings = MaCrossoverSettings {
            fast_period: 2,
            slow_period: 4,
        };
        let mut policy = MaCrossoverPolicy::new(settings).unwrap();

        // A flat warm-up leaves both averages equal.
        for _ in 0..5 {
            assert_eq!(policy.act(&obs(dec!(100), dec!(0))), Action::Hold);
        }
        assert_eq!(policy.act(&obs(dec!(120), dec!(0))), Action::Buy);
        assert_eq!(policy.act(&obs(dec!(125), dec!(8))), Action::Hold);

        let mut sold = false;
        for _ in 0..5 {
            if policy.act(&obs(dec!(60), dec!(8))) == Action::Sell {
                sold = true;
                break;
            }
        }
        assert!(sold);
    }

    #[test]
    fn reset_restarts_the_warm_up() {
        let settings = MaCrossoverSettings {
            fast_period: 2,
            slow_period: 3,
        };
        let mut policy = MaCrossoverPolicy::new(settings).unwrap();
        for _ in 0..4 {
            policy.act(&obs(dec!(100), dec!(0)));
        }
        policy.reset();

        assert_eq!(policy.act(&obs(dec!(200), dec!(0))), Action::Hold);
    }
}
