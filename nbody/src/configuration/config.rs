//! Configuration types for loading bodies and run settings.
//!
//! Two files feed a run:
//!
//! - a JSON body collection ([`BodiesFile`] / [`BodyConfig`]), produced by
//!   the initial-condition generators
//! - an optional YAML run file ([`RunConfig`]) with engine, parameter and
//!   I/O sections; every field may also be given on the command line
//!
//! # JSON body format
//!
//! ```json
//! { "bodies": [
//!     { "id": 0, "name": "Sun", "mass": 1.989e30, "radius": 6.96e8,
//!       "position": [0, 0, 0], "velocity": [0, 0, 0], "force": [0, 0, 0],
//!       "color": [1.0, 1.0, 0.0, 1.0] }
//! ] }
//! ```
//!
//! `name`, `radius`, `force` and `color` may be omitted.
//!
//! # YAML run format
//!
//! ```yaml
//! engine:
//!   strategy: "chunks"    # "direct", "rows" or "chunks"
//!   chunks: 8             # private accumulators for "chunks"
//!   threads: 4            # rayon worker threads, default = all cores
//!
//! parameters:
//!   dt: 3600.0            # step size in seconds
//!   num_steps: 8760
//!   G: 6.67430e-11
//!   min_distance: 1.0e-9  # pairs closer than this do not interact
//!   strict: false         # abort on invalid input or non-finite state
//!
//! io:
//!   input: "bodies.json"
//!   output: "trajectory.csv"
//!   final_state: "final.json"
//!   threaded_output: true
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which force computer the engine uses
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StrategyConfig {
    #[default]
    #[serde(rename = "direct")] // serial upper-triangular pair loop
    Direct,

    #[serde(rename = "rows")] // parallel over rows, each pair evaluated twice
    Rows,

    #[serde(rename = "chunks")] // parallel pair chunks with private accumulators
    Chunks,
}

/// Engine-level configuration
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub strategy: StrategyConfig, // force computer
    pub chunks: Option<usize>,    // chunk count for `chunks`, default = rayon threads
    pub threads: Option<usize>,   // rayon global pool size
}

/// Numerical and physical parameters for a run
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ParametersConfig {
    pub dt: Option<f64>,           // step size in seconds
    pub num_steps: Option<u64>,    // steps to run
    pub G: Option<f64>,            // gravitational constant, SI by default
    pub min_distance: Option<f64>, // singular pair cutoff
    pub strict: bool,              // opt-in validation
}

/// Input and output locations
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IoConfig {
    pub input: Option<PathBuf>,       // JSON body collection
    pub output: Option<PathBuf>,      // CSV trajectory
    pub final_state: Option<PathBuf>, // JSON echo of the final bodies
    pub threaded_output: bool,        // write the CSV on a background thread
}

/// Top-level run configuration loaded from YAML
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub io: IoConfig,
}

/// One body as it appears in the JSON collection
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub mass: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    #[serde(default)]
    pub force: [f64; 3], // overwritten every step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f64; 4]>,
}

/// The whole JSON collection
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BodiesFile {
    pub bodies: Vec<BodyConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_config_sections_are_optional() {
        let cfg: RunConfig = serde_yaml::from_str("parameters:\n  dt: 10.0\n").unwrap();

        assert_eq!(cfg.parameters.dt, Some(10.0));
        assert_eq!(cfg.engine.strategy, StrategyConfig::Direct);
        assert!(cfg.io.input.is_none());
    }

    #[test]
    fn run_config_reads_every_section() {
        let yaml = r#"
engine:
  strategy: "chunks"
  chunks: 4
parameters:
  dt: 60.0
  num_steps: 10
  G: 1.0
  strict: true
io:
  input: "bodies.json"
  threaded_output: true
"#;
        let cfg: RunConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(cfg.engine.strategy, StrategyConfig::Chunks);
        assert_eq!(cfg.engine.chunks, Some(4));
        assert_eq!(cfg.parameters.num_steps, Some(10));
        assert_eq!(cfg.parameters.G, Some(1.0));
        assert!(cfg.parameters.strict);
        assert_eq!(cfg.io.input, Some(PathBuf::from("bodies.json")));
        assert!(cfg.io.threaded_output);
    }

    #[test]
    fn run_config_rejects_unknown_keys() {
        let res: Result<RunConfig, _> = serde_yaml::from_str("parameters:\n  h0: 0.1\n");
        assert!(res.is_err());
    }
}
