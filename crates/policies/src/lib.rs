// In crates/policies/src/lib.rs

use core_types::Action;
use environment::Observation;

pub mod baseline;
pub mod factory;
pub mod ma_crossover;
pub mod types;

pub use factory::create_policy;

/// The universal interface for a decision-maker driving the environment.
///
/// A policy maps an `Observation` to one of the three discrete actions. It may
/// keep internal state across calls (indicator values, whether it has already
/// entered), which `reset` clears at the start of every episode.
pub trait Policy {
    /// The name of the policy.
    fn name(&self) -> &'static str;

    /// Clears any per-episode state.
    fn reset(&mut self) {}

    fn act(&mut self, observation: &Observation) -> Action;
}
