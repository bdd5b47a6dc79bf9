//! Force contributors for the n-body engine
//!
//! Defines the `ForceModel` trait and three direct-summation Newtonian
//! gravity models that differ only in how the O(N^2) pair loop is scheduled:
//!
//! - `DirectGravity`: serial upper-triangular loop, the reference order
//! - `RowParallelGravity`: one rayon task per row, no shared writes
//! - `ChunkedPairGravity`: private per-chunk accumulators merged in order

use rayon::prelude::*;

use crate::simulation::states::{System, NVec3};

/// Collection of force terms. Each term implements [`ForceModel`] and their
/// contributions are summed into a single force vector per body
pub struct ForceSet {
    terms: Vec<Box<dyn ForceModel + Send + Sync>>,
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
        }
    }

    /// Add a force term
    pub fn with(mut self, term: impl ForceModel + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Names of the registered terms, in evaluation order
    pub fn names(&self) -> Vec<&'static str> {
        self.terms.iter().map(|t| t.name()).collect()
    }

    /// Compute total forces for all bodies in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_forces(&self, sys: &System, out: &mut [NVec3]) {
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }

        for term in &self.terms {
            term.add_forces(sys, out);
        }
    }
}

/// Trait for force sources operating on [`System`]
/// Implementations add their contribution into `out[i]` for each body and
/// must not assume `out` starts at zero
pub trait ForceModel {
    fn add_forces(&self, sys: &System, out: &mut [NVec3]);

    fn name(&self) -> &'static str;
}

/// Force exerted on body a by body b, or `None` when the pair is closer than
/// `min_distance`.
///
/// The body b feels exactly the negation of the returned vector.
#[inline]
#[allow(non_snake_case, clippy::neg_cmp_op_on_partial_ord)]
pub fn pair_force(G: f64, min_distance: f64, xa: NVec3, ma: f64, xb: NVec3, mb: f64) -> Option<NVec3> {
    // r points from a to b, so a is pulled along +r
    let r = xb - xa;
    let dist = r.norm();

    // coincident bodies do not interact this step; a NaN distance fails the
    // comparison too, so a NaN body exerts and feels no force
    if !(dist > min_distance) {
        return None;
    }

    let mag = G * ma * mb / (dist * dist);
    let dir = r / dist;

    Some(mag * dir)
}

/// Newtonian gravity by direct summation over unordered pairs (i < j).
///
/// Each pair is evaluated once and applied to both bodies with opposite sign.
#[allow(non_snake_case)]
pub struct DirectGravity {
    pub G: f64,
    pub min_distance: f64,
}

impl ForceModel for DirectGravity {
    fn add_forces(&self, sys: &System, out: &mut [NVec3]) {
        let n = sys.bodies.len();

        for i in 0..n {
            let bi = &sys.bodies[i];

            for j in (i + 1)..n {
                let bj = &sys.bodies[j];

                if let Some(f) = pair_force(self.G, self.min_distance, bi.x, bi.m, bj.x, bj.m) {
                    out[i] += f;
                    out[j] -= f;
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

/// Newtonian gravity where each row `i` is summed independently in parallel.
///
/// A row adds `-F(j, i)` for `j < i` and `+F(i, j)` for `j > i` in increasing
/// `j`, which is the same sequence of terms the serial loop feeds into
/// `out[i]`, so results match `DirectGravity` bit for bit. Every pair is
/// evaluated twice.
#[allow(non_snake_case)]
pub struct RowParallelGravity {
    pub G: f64,
    pub min_distance: f64,
}

impl ForceModel for RowParallelGravity {
    fn add_forces(&self, sys: &System, out: &mut [NVec3]) {
        let bodies = &sys.bodies;

        out.par_iter_mut().enumerate().for_each(|(i, acc)| {
            let bi = &bodies[i];

            for (j, bj) in bodies.iter().enumerate() {
                if j < i {
                    if let Some(f) = pair_force(self.G, self.min_distance, bj.x, bj.m, bi.x, bi.m) {
                        *acc -= f;
                    }
                } else if j > i {
                    if let Some(f) = pair_force(self.G, self.min_distance, bi.x, bi.m, bj.x, bj.m) {
                        *acc += f;
                    }
                }
            }
        });
    }

    fn name(&self) -> &'static str {
        "rows"
    }
}

/// Newtonian gravity over the upper-triangular pair set, split by outer index
/// into `chunks` contiguous ranges.
///
/// Each chunk accumulates into a private buffer; buffers are then summed in
/// chunk order. Output is deterministic for a fixed chunk count but can differ
/// in the last bits between chunk counts.
#[allow(non_snake_case)]
pub struct ChunkedPairGravity {
    pub G: f64,
    pub min_distance: f64,
    pub chunks: usize,
}

impl ChunkedPairGravity {
    /// Row ranges covering `0..n`, at most `chunks` of them, none empty.
    fn row_ranges(&self, n: usize) -> Vec<std::ops::Range<usize>> {
        let chunks = self.chunks.clamp(1, n.max(1));
        let base = n / chunks;
        let extra = n % chunks;

        let mut ranges = Vec::with_capacity(chunks);
        let mut start = 0;
        for c in 0..chunks {
            let len = base + usize::from(c < extra);
            if len > 0 {
                ranges.push(start..start + len);
            }
            start += len;
        }
        ranges
    }
}

impl ForceModel for ChunkedPairGravity {
    fn add_forces(&self, sys: &System, out: &mut [NVec3]) {
        let bodies = &sys.bodies;
        let n = bodies.len();

        let partials: Vec<Vec<NVec3>> = self
            .row_ranges(n)
            .into_par_iter()
            .map(|rows| {
                let mut local = vec![NVec3::zeros(); n];
                for i in rows {
                    let bi = &bodies[i];
                    for j in (i + 1)..n {
                        let bj = &bodies[j];
                        if let Some(f) = pair_force(self.G, self.min_distance, bi.x, bi.m, bj.x, bj.m) {
                            local[i] += f;
                            local[j] -= f;
                        }
                    }
                }
                local
            })
            .collect();

        // merge in chunk order so the sum does not depend on scheduling
        for local in &partials {
            for (acc, f) in out.iter_mut().zip(local.iter()) {
                *acc += *f;
            }
        }
    }

    fn name(&self) -> &'static str {
        "chunks"
    }
}
