//! Core state types for the N-body simulation.
//!
//! - `Body`   one point mass with its cosmetic metadata
//! - `System` the ordered collection of bodies plus the current step index
//!
//! Mass is fixed for the lifetime of a run. Position and velocity form the
//! state vector; `f` is scratch space refreshed by the integrator each step.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: i64,                 // stable identifier from the input file
    pub name: Option<String>,    // cosmetic
    pub x: NVec3,                // position
    pub v: NVec3,                // velocity
    pub f: NVec3,                // last force applied
    pub m: f64,                  // mass
    pub radius: Option<f64>,     // cosmetic, unused by physics
    pub color: Option<[f64; 4]>, // cosmetic rgba
}

impl Body {
    /// Bare point mass with no cosmetic metadata.
    pub fn new(id: i64, m: f64, x: NVec3, v: NVec3) -> Self {
        Self {
            id,
            name: None,
            x,
            v,
            f: NVec3::zeros(),
            m,
            radius: None,
            color: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Label used for trajectory columns; falls back to `Body_<id>`.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Body_{}", self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct System {
    pub bodies: Vec<Body>, // order is fixed for the whole run
    pub step: u64,         // number of completed steps
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, step: 0 }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Copy of every position, in body order.
    pub fn positions(&self) -> Vec<NVec3> {
        self.bodies.iter().map(|b| b.x).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.bodies.iter().map(Body::label).collect()
    }
}
