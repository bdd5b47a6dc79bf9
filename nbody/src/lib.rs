pub mod simulation;
pub mod configuration;
pub mod output;
pub mod benchmark;

pub use simulation::states::{Body, System, NVec3};
pub use simulation::params::{Parameters, DEFAULT_G, DEFAULT_MIN_DISTANCE};
pub use simulation::forces::{ForceModel, ForceSet, DirectGravity, RowParallelGravity, ChunkedPairGravity};
pub use simulation::integrator::symplectic_euler;
pub use simulation::scenario::Scenario;
pub use simulation::engine::Engine;
pub use simulation::driver::{RunState, RunSummary, Outcome};
pub use simulation::diagnostics::Diagnostics;

pub use configuration::config::{RunConfig, EngineConfig, ParametersConfig, IoConfig, BodyConfig, BodiesFile, StrategyConfig};
pub use configuration::loader::{load_bodies, load_run_config, parse_bodies, validate_strict};

pub use output::trajectory::{TrajectoryRecorder, CsvRecorder, MemoryRecorder, ThreadedRecorder, Snapshot, open_recorder};
pub use output::snapshot::write_state;

pub use benchmark::benchmark::bench_forces;
