// In crates/policies/src/factory.rs

use crate::baseline::{BuyAndHoldPolicy, HoldPolicy, RandomPolicy};
use crate::ma_crossover::MaCrossoverPolicy;
use crate::types::PolicySettings;
use crate::Policy;
use anyhow::Result;

/// Names accepted by `create_policy`.
pub const POLICY_NAMES: [&str; 4] = ["hold", "buy_and_hold", "ma_crossover", "random"];

/// Builds a policy by name, configured from `settings`.
pub fn create_policy(name: &str, settings: &PolicySettings) -> Result<Box<dyn Policy + Send>> {
    let policy: Box<dyn Policy + Send> = match name {
        "hold" => Box::new(HoldPolicy),
        "buy_and_hold" => Box::new(BuyAndHoldPolicy::default()),
        "ma_crossover" => Box::new(MaCrossoverPolicy::new(settings.ma_crossover.clone())?),
        "random" => Box::new(RandomPolicy::new(settings.random_seed)),
        unknown => anyhow::bail!(
            "Attempted to create unknown policy: {} (expected one of {:?})",
            unknown,
            POLICY_NAMES
        ),
    };
    tracing::debug!(policy = policy.name(), "Policy created.");
    Ok(policy)
}
