// In crates/environment/src/lib.rs

pub mod env;
pub mod error;
pub mod types;

// Re-export public types
pub use env::SimulationEnvironment;
pub use error::{Error, Result};
pub use types::{EnvironmentSettings, Observation, StepInfo, StepResult};
