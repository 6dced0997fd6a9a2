// In crates/policies/src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MaCrossoverSettings {
    pub fast_period: usize,
    pub slow_period: usize,
}

impl Default for MaCrossoverSettings {
    fn default() -> Self {
        Self {
            fast_period: 5,
            slow_period: 20,
        }
    }
}

/// Parameters for every built-in policy, read from the `[policies]` table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PolicySettings {
    #[serde(default)]
    pub ma_crossover: MaCrossoverSettings,
    #[serde(default = "default_seed")]
    pub random_seed: u64,
}

fn default_seed() -> u64 {
    42
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            ma_crossover: MaCrossoverSettings::default(),
            random_seed: default_seed(),
        }
    }
}
