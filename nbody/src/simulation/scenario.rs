//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `RunConfig` (YAML/CLI-facing) and a loaded `System` and produces
//! the runtime bundle `Scenario`, containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - system state (`System` with bodies at step 0)
//! - active force set (`ForceSet`)
//!
//! The driver then advances the scenario one step at a time

use anyhow::{anyhow, Result};

use crate::configuration::config::{RunConfig, StrategyConfig};
use crate::configuration::loader::validate_strict;
use crate::simulation::driver::RunState;
use crate::simulation::engine::Engine;
use crate::simulation::forces::{ChunkedPairGravity, DirectGravity, ForceSet, RowParallelGravity};
use crate::simulation::params::{Parameters, DEFAULT_G, DEFAULT_MIN_DISTANCE};
use crate::simulation::states::System;

/// Runtime bundle for one run
///
/// Owns the system for the whole run; nothing else holds a reference into
/// the live state between steps
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    pub forces: ForceSet,
    pub state: RunState,
}

impl Scenario {
    /// Assemble a scenario from explicit runtime settings
    pub fn new(engine: Engine, parameters: Parameters, system: System) -> Self {
        let forces = gravity_set(&engine, &parameters);

        Self {
            engine,
            parameters,
            system,
            forces,
            state: RunState::Loaded,
        }
    }

    /// Map a run configuration onto a loaded system
    ///
    /// `dt` and `num_steps` are required; everything else has a default.
    /// With `strict` set the initial state is validated here, before any
    /// physics runs
    pub fn build_scenario(cfg: &RunConfig, system: System) -> Result<Self> {
        // Parameters (runtime) from ParametersConfig
        let p_cfg = &cfg.parameters;
        let parameters = Parameters {
            dt: p_cfg.dt.ok_or_else(|| anyhow!("no time step (dt) configured"))?,
            num_steps: p_cfg.num_steps.ok_or_else(|| anyhow!("no step count (num_steps) configured"))?,
            G: p_cfg.G.unwrap_or(DEFAULT_G),
            min_distance: p_cfg.min_distance.unwrap_or(DEFAULT_MIN_DISTANCE),
            strict: p_cfg.strict,
        };

        if parameters.strict {
            validate_strict(&system, parameters.dt)?;
        }

        // Engine (runtime) from EngineConfig
        let engine = Engine {
            strategy: cfg.engine.strategy,
            chunks: cfg.engine.chunks.unwrap_or_else(rayon::current_num_threads).max(1),
            threaded_output: cfg.io.threaded_output,
        };

        log::debug!("engine {:?}, parameters {:?}", engine, parameters);

        Ok(Self::new(engine, parameters, system))
    }
}

/// Newtonian gravity for the configured strategy, wrapped in a force set
pub fn gravity_set(engine: &Engine, parameters: &Parameters) -> ForceSet {
    let forces = ForceSet::new();

    match engine.strategy {
        StrategyConfig::Direct => forces.with(DirectGravity {
            G: parameters.G,
            min_distance: parameters.min_distance,
        }),
        StrategyConfig::Rows => forces.with(RowParallelGravity {
            G: parameters.G,
            min_distance: parameters.min_distance,
        }),
        StrategyConfig::Chunks => forces.with(ChunkedPairGravity {
            G: parameters.G,
            min_distance: parameters.min_distance,
            chunks: engine.chunks,
        }),
    }
}
