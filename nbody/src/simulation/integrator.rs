//! Fixed-step time integrator for the N-body system
//!
//! Semi-implicit (symplectic) Euler: the velocity is kicked first and the
//! position drifts with the already-updated velocity. Swapping the two
//! updates gives explicit Euler and a different trajectory.

use super::states::{System, NVec3};

/// Advance every body by one step of `dt` using precomputed `forces`.
///
/// `forces[i]` must have been computed from the positions at the start of
/// this step. Mass is not validated: a zero mass yields a non-finite
/// acceleration that propagates into the state.
pub fn symplectic_euler(sys: &mut System, forces: &[NVec3], dt: f64) {
    debug_assert_eq!(sys.bodies.len(), forces.len());

    for (b, f) in sys.bodies.iter_mut().zip(forces.iter()) {
        let a = *f / b.m;

        // Kick: v_n+1 = v_n + a_n dt
        b.v += a * dt;

        // Drift: x_n+1 = x_n + v_n+1 dt
        b.x += b.v * dt;

        b.f = *f;
    }

    sys.step += 1;
}
