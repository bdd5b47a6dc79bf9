//! High-level runtime engine settings
//!
//! Selects the force computer and how trajectory output is written
//! when building and running a `Scenario`

use crate::configuration::config::StrategyConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub strategy: StrategyConfig, // direct, rows or chunks
    pub chunks: usize,            // private accumulators used by `chunks`
    pub threaded_output: bool,    // write the trajectory on a background thread
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            strategy: StrategyConfig::Direct,
            chunks: 1,
            threaded_output: false,
        }
    }
}
