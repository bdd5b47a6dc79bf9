//! Numerical and physical parameters for a run
//!
//! `Parameters` holds runtime settings:
//! - fixed step size and number of steps,
//! - gravitational constant and the singular-distance cutoff,
//! - whether strict numeric validation is enabled

/// Gravitational constant in m^3 kg^-1 s^-2.
pub const DEFAULT_G: f64 = 6.67430e-11;

/// Pairs closer than this are treated as non-interacting for the step.
pub const DEFAULT_MIN_DISTANCE: f64 = 1e-9;

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub dt: f64,           // step size in seconds
    pub num_steps: u64,    // number of steps to run
    pub G: f64,            // gravitational constant
    pub min_distance: f64, // singularity guard
    pub strict: bool,      // abort on non-finite state instead of propagating
}

impl Parameters {
    pub fn new(dt: f64, num_steps: u64) -> Self {
        Self {
            dt,
            num_steps,
            G: DEFAULT_G,
            min_distance: DEFAULT_MIN_DISTANCE,
            strict: false,
        }
    }

    /// Simulated time attached to record `step`.
    ///
    /// Derived from the index so the time axis does not pick up rounding
    /// from repeated addition.
    pub fn time_at(&self, step: u64) -> f64 {
        step as f64 * self.dt
    }
}
