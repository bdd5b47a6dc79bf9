//! Echo a [`System`] back in the input JSON schema.
//!
//! Cosmetic fields (`name`, `radius`, `color`) are carried through untouched
//! and `force` holds the force applied in the last step, so the output can be
//! fed back in as the start of another run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::configuration::config::{BodiesFile, BodyConfig};
use crate::simulation::states::System;

pub fn to_bodies_file(sys: &System) -> BodiesFile {
    BodiesFile {
        bodies: sys.bodies.iter().map(BodyConfig::from).collect(),
    }
}

/// Write `sys` as pretty JSON to `path`
pub fn write_state(sys: &System, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create state file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &to_bodies_file(sys))
        .with_context(|| format!("cannot write state file {}", path.display()))?;
    writer.flush().with_context(|| format!("cannot flush state file {}", path.display()))?;

    log::info!("wrote final state of {} bodies to {}", sys.len(), path.display());
    Ok(())
}
