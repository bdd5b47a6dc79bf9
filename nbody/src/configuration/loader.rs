//! Reading body collections and run files from disk, and the opt-in strict
//! validation layer.
//!
//! Loading is the only place input is checked by default: malformed JSON,
//! missing required fields, wrong vector lengths and an empty body list are
//! fatal before any physics runs. Physically odd but well-formed input (zero
//! mass, duplicate ids, non-positive dt) is accepted unless strict mode is on.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::configuration::config::{BodiesFile, BodyConfig, RunConfig};
use crate::simulation::states::{Body, System, NVec3};

impl From<&BodyConfig> for Body {
    fn from(bc: &BodyConfig) -> Self {
        Body {
            id: bc.id,
            name: bc.name.clone(),
            x: NVec3::from(bc.position),
            v: NVec3::from(bc.velocity),
            f: NVec3::from(bc.force),
            m: bc.mass,
            radius: bc.radius,
            color: bc.color,
        }
    }
}

impl From<&Body> for BodyConfig {
    fn from(b: &Body) -> Self {
        BodyConfig {
            id: b.id,
            name: b.name.clone(),
            mass: b.m,
            radius: b.radius,
            position: b.x.into(),
            velocity: b.v.into(),
            force: b.f.into(),
            color: b.color,
        }
    }
}

/// Map a parsed collection into a runtime [`System`]
pub fn system_from_file(file: &BodiesFile) -> Result<System> {
    if file.bodies.is_empty() {
        bail!("body collection is empty");
    }

    Ok(System::new(file.bodies.iter().map(Body::from).collect()))
}

/// Parse a JSON body collection
pub fn parse_bodies(json: &str) -> Result<System> {
    let file: BodiesFile = serde_json::from_str(json).context("invalid body collection")?;
    system_from_file(&file)
}

/// Load a JSON body collection from `path`
pub fn load_bodies(path: &Path) -> Result<System> {
    let file = File::open(path).with_context(|| format!("cannot open body file {}", path.display()))?;
    let reader = BufReader::new(file);

    let parsed: BodiesFile = serde_json::from_reader(reader)
        .with_context(|| format!("invalid body collection in {}", path.display()))?;
    let sys = system_from_file(&parsed).with_context(|| format!("cannot load {}", path.display()))?;

    log::info!("loaded {} bodies from {}", sys.len(), path.display());
    Ok(sys)
}

/// Load a YAML run file from `path`
pub fn load_run_config(path: &Path) -> Result<RunConfig> {
    let file = File::open(path).with_context(|| format!("cannot open run file {}", path.display()))?;
    let reader = BufReader::new(file);

    serde_yaml::from_reader(reader).with_context(|| format!("invalid run file {}", path.display()))
}

/// Strict-mode checks on the initial state and step size.
///
/// Rejects non-positive or non-finite mass, non-finite position/velocity,
/// duplicate ids and a non-positive or non-finite `dt`.
pub fn validate_strict(sys: &System, dt: f64) -> Result<()> {
    if !(dt.is_finite() && dt > 0.0) {
        bail!("dt must be finite and positive, got {dt}");
    }

    let mut seen = HashSet::with_capacity(sys.len());
    for b in &sys.bodies {
        if !seen.insert(b.id) {
            bail!("duplicate body id {}", b.id);
        }
        if !(b.m.is_finite() && b.m > 0.0) {
            bail!("body {} has invalid mass {}", b.id, b.m);
        }
        if !b.x.iter().all(|c| c.is_finite()) || !b.v.iter().all(|c| c.is_finite()) {
            bail!("body {} has a non-finite position or velocity", b.id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BODIES: &str = r#"{ "bodies": [
        { "id": 0, "name": "Sun", "mass": 1.989e30, "radius": 6.96e8,
          "position": [0, 0, 0], "velocity": [0, 0, 0], "force": [0, 0, 0],
          "color": [1.0, 1.0, 0.0, 1.0] },
        { "id": 1, "mass": 5.972e24,
          "position": [1.496e11, 0, 0], "velocity": [0, 29780, 0] }
    ] }"#;

    #[test]
    fn parses_full_and_minimal_records() {
        let sys = parse_bodies(TWO_BODIES).unwrap();

        assert_eq!(sys.len(), 2);
        assert_eq!(sys.bodies[0].name.as_deref(), Some("Sun"));
        assert_eq!(sys.bodies[0].color, Some([1.0, 1.0, 0.0, 1.0]));
        assert_eq!(sys.bodies[1].name, None);
        assert_eq!(sys.bodies[1].radius, None);
        assert_eq!(sys.bodies[1].f, NVec3::zeros());
        assert_eq!(sys.bodies[1].v, NVec3::new(0.0, 29780.0, 0.0));
        assert_eq!(sys.step, 0);
    }

    #[test]
    fn empty_collection_is_rejected() {
        let err = parse_bodies(r#"{ "bodies": [] }"#).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn missing_mass_is_rejected() {
        let json = r#"{ "bodies": [ { "id": 0, "position": [0,0,0], "velocity": [0,0,0] } ] }"#;
        assert!(parse_bodies(json).is_err());
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let json = r#"{ "bodies": [ { "id": 0, "mass": "heavy", "position": [0,0,0], "velocity": [0,0,0] } ] }"#;
        assert!(parse_bodies(json).is_err());
    }

    #[test]
    fn short_position_is_rejected() {
        let json = r#"{ "bodies": [ { "id": 0, "mass": 1.0, "position": [0,0], "velocity": [0,0,0] } ] }"#;
        assert!(parse_bodies(json).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_bodies(Path::new("/nonexistent/bodies.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/bodies.json"));
    }

    #[test]
    fn zero_mass_is_accepted_unless_strict() {
        let json = r#"{ "bodies": [ { "id": 0, "mass": 0.0, "position": [0,0,0], "velocity": [0,0,0] } ] }"#;
        let sys = parse_bodies(json).unwrap();

        assert!(validate_strict(&sys, 1.0).is_err());
    }

    #[test]
    fn strict_rejects_duplicate_ids_and_bad_dt() {
        let mut sys = parse_bodies(TWO_BODIES).unwrap();
        assert!(validate_strict(&sys, 3600.0).is_ok());
        assert!(validate_strict(&sys, 0.0).is_err());
        assert!(validate_strict(&sys, -1.0).is_err());

        sys.bodies[1].id = 0;
        let err = validate_strict(&sys, 3600.0).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn body_round_trips_through_config() {
        let sys = parse_bodies(TWO_BODIES).unwrap();
        let back = BodyConfig::from(&sys.bodies[0]);

        assert_eq!(back.name.as_deref(), Some("Sun"));
        assert_eq!(back.radius, Some(6.96e8));
        assert_eq!(back.position, [0.0, 0.0, 0.0]);
    }
}
