//! Simulation driver: runs a [`Scenario`] for its configured number of steps.
//!
//! Each step computes forces from the positions frozen at the start of the
//! step, integrates, and hands a copy of the new positions to the recorder.
//! Record `k` carries `t = k * dt`.
//!
//! States: `Loaded -> Running(step) -> Completed`, with `Cancelled` when the
//! cancel flag is raised between steps and `Failed` on a recorder or strict
//! numeric error. A scenario runs at most once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::{bail, Result};

use crate::output::trajectory::TrajectoryRecorder;
use crate::simulation::diagnostics::Diagnostics;
use crate::simulation::integrator::symplectic_euler;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{System, NVec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Loaded,
    Running { step: u64 },
    Completed,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub steps_completed: u64,
    pub final_time: f64, // simulated time after the last completed step
    pub outcome: Outcome,
}

impl Scenario {
    /// Advance by one step: force pass, then semi-implicit Euler.
    ///
    /// `forces` is scratch space of one vector per body.
    pub fn advance(&mut self, forces: &mut [NVec3]) {
        self.forces.accumulate_forces(&self.system, forces);
        symplectic_euler(&mut self.system, forces, self.parameters.dt);
    }

    /// Run every configured step, streaming snapshots into `recorder`.
    ///
    /// The recorder is finished on every exit path after `begin` succeeded,
    /// so a cancelled or failed run leaves a valid truncated trajectory.
    pub fn run(&mut self, recorder: &mut dyn TrajectoryRecorder, cancel: Option<&AtomicBool>) -> Result<RunSummary> {
        if self.state != RunState::Loaded {
            bail!("scenario has already been run ({:?})", self.state);
        }

        let p = &self.parameters;
        log::info!(
            "running {} bodies for {} steps of {} s ({})",
            self.system.len(),
            p.num_steps,
            p.dt,
            self.forces.names().join("+")
        );
        let before = Diagnostics::measure(&self.system, p.G, p.min_distance);
        log_diagnostics("initial", &before);

        recorder.begin(&self.system.labels())?;

        let started = Instant::now();
        let result = self.run_steps(recorder, cancel);
        let finished = recorder.finish();

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.state = RunState::Failed;
                if let Err(fe) = finished {
                    log::warn!("trajectory not finalized after failure: {fe:#}");
                }
                return Err(e);
            }
        };
        if let Err(e) = finished {
            self.state = RunState::Failed;
            return Err(e);
        }

        let steps_completed = self.system.step;
        let summary = RunSummary {
            steps_completed,
            final_time: self.parameters.time_at(steps_completed),
            outcome,
        };

        match outcome {
            Outcome::Completed => log::info!("completed {} steps in {:.3?}", steps_completed, started.elapsed()),
            Outcome::Cancelled => log::warn!(
                "cancelled after {} of {} steps",
                steps_completed,
                self.parameters.num_steps
            ),
        }
        let p = &self.parameters;
        log_diagnostics("final", &Diagnostics::measure(&self.system, p.G, p.min_distance));

        Ok(summary)
    }

    fn run_steps(&mut self, recorder: &mut dyn TrajectoryRecorder, cancel: Option<&AtomicBool>) -> Result<Outcome> {
        let n = self.system.len();
        let mut forces = vec![NVec3::zeros(); n];
        let mut positions = Vec::with_capacity(n);

        for k in 0..self.parameters.num_steps {
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                self.state = RunState::Cancelled;
                return Ok(Outcome::Cancelled);
            }

            self.state = RunState::Running { step: k };
            self.advance(&mut forces);

            if self.parameters.strict {
                check_finite(&self.system, k)?;
            }

            positions.clear();
            positions.extend(self.system.bodies.iter().map(|b| b.x));
            recorder.record(self.parameters.time_at(k), &positions)?;

            log::trace!("step {} recorded", k);
        }

        self.state = RunState::Completed;
        Ok(Outcome::Completed)
    }
}

/// Strict mode: fail on the first body whose state went non-finite
fn check_finite(sys: &System, step: u64) -> Result<()> {
    for b in &sys.bodies {
        if !b.x.iter().chain(b.v.iter()).all(|c| c.is_finite()) {
            bail!("body {} has a non-finite state after step {}", b.id, step);
        }
    }
    Ok(())
}

fn log_diagnostics(when: &str, d: &Diagnostics) {
    log::info!(
        "{} energy {:.6e} J (kinetic {:.6e}, potential {:.6e}), momentum |p| = {:.6e}",
        when,
        d.total_energy(),
        d.kinetic,
        d.potential,
        d.momentum.norm()
    );
}
