//! Conserved-quantity diagnostics for a [`System`].
//!
//! Used for run logging and by the conservation tests. None of these feed
//! back into the physics.

use crate::simulation::states::{System, NVec3};

/// Snapshot of the global quantities of a system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    pub momentum: NVec3,
    pub kinetic: f64,
    pub potential: f64,
    pub center_of_mass: NVec3,
}

impl Diagnostics {
    #[allow(non_snake_case)]
    pub fn measure(sys: &System, G: f64, min_distance: f64) -> Self {
        Self {
            momentum: total_momentum(sys),
            kinetic: kinetic_energy(sys),
            potential: potential_energy(sys, G, min_distance),
            center_of_mass: center_of_mass(sys),
        }
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic + self.potential
    }
}

/// Σ m v
pub fn total_momentum(sys: &System) -> NVec3 {
    sys.bodies.iter().fold(NVec3::zeros(), |p, b| p + b.v * b.m)
}

/// Σ ½ m |v|²
pub fn kinetic_energy(sys: &System) -> f64 {
    sys.bodies.iter().map(|b| 0.5 * b.m * b.v.norm_squared()).sum()
}

/// -Σ G m_i m_j / r over unordered pairs, skipping pairs the force
/// computer would skip.
#[allow(non_snake_case)]
pub fn potential_energy(sys: &System, G: f64, min_distance: f64) -> f64 {
    let n = sys.bodies.len();
    let mut pe = 0.0;

    for i in 0..n {
        let bi = &sys.bodies[i];
        for j in (i + 1)..n {
            let bj = &sys.bodies[j];
            let dist = (bj.x - bi.x).norm();
            if dist > min_distance {
                pe -= G * bi.m * bj.m / dist;
            }
        }
    }

    pe
}

/// Mass-weighted mean position. Zero for an empty or massless system.
pub fn center_of_mass(sys: &System) -> NVec3 {
    let total: f64 = sys.bodies.iter().map(|b| b.m).sum();
    if total == 0.0 {
        return NVec3::zeros();
    }

    sys.bodies.iter().fold(NVec3::zeros(), |c, b| c + b.x * b.m) / total
}
