use std::time::Instant;

use crate::configuration::config::StrategyConfig;
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::scenario::gravity_set;
use crate::simulation::states::{Body, System, NVec3};

/// Helper to build a deterministic System of size `n`
pub fn make_system(n: usize) -> System {
    let mut bodies = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5.0e9,
            (i_f * 0.13).cos() * 5.0e9,
            (i_f * 0.07).sin() * 5.0e9,
        );

        bodies.push(Body::new(i as i64, 1.0e24, x, NVec3::zeros()));
    }

    System::new(bodies)
}

/// Time one force pass for a strategy, averaged over `reps` passes, in ms
fn time_forces(sys: &System, strategy: StrategyConfig, chunks: usize, reps: usize) -> f64 {
    let engine = Engine {
        strategy,
        chunks,
        threaded_output: false,
    };
    let forces = gravity_set(&engine, &Parameters::new(1.0, 1));
    let mut out = vec![NVec3::zeros(); sys.len()];

    // Warm up
    forces.accumulate_forces(sys, &mut out);

    let t0 = Instant::now();
    for _ in 0..reps {
        forces.accumulate_forces(sys, &mut out);
    }
    t0.elapsed().as_secs_f64() * 1000.0 / reps as f64
}

/// Benchmark one force pass of every strategy for a range of n
/// Paste output directly into a spreadsheet to graph
pub fn bench_forces() {
    let chunks = rayon::current_num_threads();

    println!("N,direct_ms,rows_ms,chunks_ms");

    for n in [200, 400, 800, 1600, 3200, 6400] {
        // Small n: average over a few passes to smooth noise
        let reps = if n <= 800 { 10 } else { 2 };
        let sys = make_system(n);

        let direct = time_forces(&sys, StrategyConfig::Direct, chunks, reps);
        let rows = time_forces(&sys, StrategyConfig::Rows, chunks, reps);
        let chunked = time_forces(&sys, StrategyConfig::Chunks, chunks, reps);

        println!("{},{:.6},{:.6},{:.6}", n, direct, rows, chunked);
    }
}
