// In crates/policies/src/baseline.rs

use crate::Policy;
use core_types::Action;
use environment::Observation;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Never trades. The reference point every other policy should beat.
#[derive(Debug, Default)]
pub struct HoldPolicy;

impl Policy for HoldPolicy {
    fn name(&self) -> &'static str {
        "Hold"
    }

    fn act(&mut self, _observation: &Observation) -> Action {
        Action::Hold
    }
}

/// Buys on the first step of an episode and holds until the end.
#[derive(Debug, Default)]
pub struct BuyAndHoldPolicy {
    entered: bool,
}

impl Policy for BuyAndHoldPolicy {
    fn name(&self) -> &'static str {
        "BuyAndHold"
    }

    fn reset(&mut self) {
        self.entered = false;
    }

    fn act(&mut self, _observation: &Observation) -> Action {
        if self.entered {
            Action::Hold
        } else {
            self.entered = true;
            Action::Buy
        }
    }
}

/// Picks uniformly among the actions. Reseeded on every reset, so each
/// episode replays the same sequence.
#[derive(Debug)]
pub struct RandomPolicy {
    seed: u64,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn act(&mut self, _observation: &Observation) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::COUNT)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn obs() -> Observation {
        Observation {
            price: dec!(100),
            balance: dec!(1000),
            holdings: dec!(0),
        }
    }

    #[test]
    fn buy_and_hold_enters_once_per_episode() {
        let mut policy = BuyAndHoldPolicy::default();
        assert_eq!(policy.act(&obs()), Action::Buy);
        assert_eq!(policy.act(&obs()), Action::Hold);

        policy.reset();
        assert_eq!(policy.act(&obs()), Action::Buy);
    }

    #[test]
    fn random_policy_replays_after_reset() {
        let mut policy = RandomPolicy::new(7);
        let first: Vec<Action> = (0..20).map(|_| policy.act(&obs())).collect();
        policy.reset();
        let second: Vec<Action> = (0..20).map(|_| policy.act(&obs())).collect();

        assert_eq!(first, second);
    }
}
