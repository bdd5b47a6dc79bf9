use nbody::{load_bodies, load_run_config, write_state, bench_forces};
use nbody::{open_recorder, RunConfig, Scenario, StrategyConfig};

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Brute-force N-body simulation with CSV trajectory output
#[derive(Parser, Debug)]
#[command(name = "nbody")]
struct Args {
    /// YAML run file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON body collection
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// CSV trajectory, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of steps to simulate
    #[arg(short = 'n', long)]
    timesteps: Option<u64>,

    /// Step size in seconds
    #[arg(long)]
    dt: Option<f64>,

    /// Force computer
    #[arg(long, value_enum)]
    strategy: Option<StrategyConfig>,

    /// Private accumulators for the chunks strategy
    #[arg(long)]
    chunks: Option<usize>,

    /// Worker threads for the parallel strategies
    #[arg(long)]
    threads: Option<usize>,

    /// Reject invalid input and stop on non-finite state
    #[arg(long)]
    strict: bool,

    /// Write the final bodies back as JSON
    #[arg(long)]
    final_state: Option<PathBuf>,

    /// Write the trajectory on a background thread
    #[arg(long)]
    threaded_output: bool,

    /// Time the force computers instead of running a simulation
    #[arg(long)]
    bench: bool,
}

// keep main clean: file values first, then flags on top
fn resolve_config(args: &Args) -> Result<RunConfig> {
    let mut cfg = match &args.config {
        Some(path) => load_run_config(path)?,
        None => RunConfig::default(),
    };

    if let Some(input) = &args.input {
        cfg.io.input = Some(input.clone());
    }
    if let Some(output) = &args.output {
        cfg.io.output = Some(output.clone());
    }
    if let Some(final_state) = &args.final_state {
        cfg.io.final_state = Some(final_state.clone());
    }
    if let Some(n) = args.timesteps {
        cfg.parameters.num_steps = Some(n);
    }
    if let Some(dt) = args.dt {
        cfg.parameters.dt = Some(dt);
    }
    if let Some(strategy) = args.strategy {
        cfg.engine.strategy = strategy;
    }
    if let Some(chunks) = args.chunks {
        cfg.engine.chunks = Some(chunks);
    }
    if let Some(threads) = args.threads {
        cfg.engine.threads = Some(threads);
    }
    cfg.parameters.strict |= args.strict;
    cfg.io.threaded_output |= args.threaded_output;

    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = resolve_config(&args)?;

    if let Some(threads) = cfg.engine.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("cannot configure worker threads")?;
    }

    if args.bench {
        bench_forces();
        return Ok(());
    }

    let input = cfg.io.input.clone().ok_or_else(|| anyhow!("no input file given (--input or io.input)"))?;
    let system = load_bodies(&input)?;
    let mut scenario = Scenario::build_scenario(&cfg, system)?;

    let mut recorder = open_recorder(cfg.io.output.as_deref(), &scenario.engine)?;

    // Ctrl-C finishes the current step, then stops
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed)).context("cannot install Ctrl-C handler")?;
    }

    let summary = scenario.run(recorder.as_mut(), Some(&cancel))?;
    drop(recorder);

    if let Some(path) = &cfg.io.final_state {
        write_state(&scenario.system, path)?;
    }

    match &cfg.io.output {
        Some(path) => log::info!(
            "{} steps ({:?}) written to {}, t = {} s",
            summary.steps_completed,
            summary.outcome,
            path.display(),
            summary.final_time
        ),
        None => log::info!("{} steps ({:?}), t = {} s", summary.steps_completed, summary.outcome, summary.final_time),
    }

    Ok(())
}
