//! Configuration file parsing for Splitflow
//!
//! Settings live in `.splitflow/config.toml` under the host
//! application's data directory. A missing file yields defaults; a
//! malformed file is an error so misconfiguration is not silently
//! ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use splitflow_core::prelude::*;
use splitflow_core::projection::UpdatePolicy;

const CONFIG_FILENAME: &str = "config.toml";
const SPLITFLOW_DIR: &str = ".splitflow";

/// Runtime settings for the coordinator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Thresholds for the immediate-vs-flexible update decision
    pub update: UpdatePolicy,
}

/// Path of the config file inside `dir`
fn config_path(dir: &Path) -> PathBuf {
    dir.join(SPLITFLOW_DIR).join(CONFIG_FILENAME)
}

/// Create the `.splitflow` directory inside `dir` if needed
pub fn init_config_dir(dir: &Path) -> Result<PathBuf> {
    let config_dir = dir.join(SPLITFLOW_DIR);
    std::fs::create_dir_all(&config_dir)?;
    Ok(config_dir)
}

/// Load settings from `dir/.splitflow/config.toml`.
///
/// A missing file is not an error: defaults are returned so hosts work
/// out of the box.
pub fn load_settings(dir: &Path) -> Result<Settings> {
    let path = config_path(dir);
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    toml::from_str(&contents)
        .map_err(|e| Error::config(format!("failed to parse {}: {}", path.display(), e)))
}

/// Save settings to `dir/.splitflow/config.toml`
pub fn save_settings(dir: &Path, settings: &Settings) -> Result<()> {
    init_config_dir(dir)?;
    let contents = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("failed to serialize settings: {}", e)))?;
    std::fs::write(config_path(dir), contents)?;
    Ok(())
}
