use std::fs;
use std::path::Path;

use anyhow::Context;
use tad_replay::ReplayConfig;

/// Read a JSON replay config.  Missing fields take their defaults.
pub fn load_config(path: &Path) -> anyhow::Result<ReplayConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading replay config {}", path.display()))?;
    let config: ReplayConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing replay config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating replay config {}", path.display()))?;
    Ok(config)
}
