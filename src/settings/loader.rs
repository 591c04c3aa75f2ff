//! Load simulation settings from a JSON file
//!
//! Fields omitted from the file fall back to the standard planning defaults
//! via `Default for SimulationSettings`, so a minimal file only needs the
//! values being changed.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::SimulationSettings;

/// Read, parse, and validate a settings file.
pub fn load_settings(path: &Path) -> Result<SimulationSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading settings file {}", path.display()))?;
    let settings: SimulationSettings = serde_json::from_str(&text)
        .with_context(|| format!("parsing settings file {}", path.display()))?;
    settings.validate()?;
    Ok(settings)
}
