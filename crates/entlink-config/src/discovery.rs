//! Locating and layering config files.
//!
//! Without an explicit file two layers are merged field by field, the
//! project layer winning:
//! 1. `config.toml` in the user config directory (`ENTLINK_CONFIG_DIR`, else
//!    `entlink/` under the platform config directory)
//! 2. `entlink.toml` in the working directory
//!
//! A layer that exists but cannot be read or parsed is skipped and reported
//! in its [`LayerStatus`]; an explicit file must load.

use std::path::{Path, PathBuf};

use crate::{ConfigError, EntlinkConfig, Result};

const PROJECT_CONFIG_FILE: &str = "entlink.toml";
const USER_CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV: &str = "ENTLINK_CONFIG_DIR";

/// What happened to one candidate config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerStatus {
    Missing,
    Loaded,
    /// The file exists but was not used; holds the reason.
    Skipped(String),
}

/// One candidate config file and its outcome.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    pub path: PathBuf,
    pub status: LayerStatus,
}

/// The merged configuration and the layers it was built from, lowest
/// precedence first.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: EntlinkConfig,
    pub layers: Vec<ConfigLayer>,
}

impl LoadedConfig {
    /// Layers that exist but were not used, with the reason.
    pub fn skipped(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.layers.iter().filter_map(|layer| match &layer.status {
            LayerStatus::Skipped(reason) => Some((layer.path.as_path(), reason.as_str())),
            _ => None,
        })
    }
}

/// Load the configuration for a run: `explicit` alone when given, else the
/// layers found by [`discover`] from the working directory.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let Some(path) = explicit else {
        return Ok(discover(Path::new("."), user_config_dir().as_deref()));
    };
    Ok(LoadedConfig {
        config: load_config_file(path)?,
        layers: vec![ConfigLayer {
            path: path.to_path_buf(),
            status: LayerStatus::Loaded,
        }],
    })
}

/// Merge the user layer from `user_dir` (if any) and the project layer
/// from `project_dir`.
pub fn discover(project_dir: &Path, user_dir: Option<&Path>) -> LoadedConfig {
    let candidates = user_dir
        .map(|dir| dir.join(USER_CONFIG_FILE))
        .into_iter()
        .chain(std::iter::once(project_dir.join(PROJECT_CONFIG_FILE)));

    let mut config = EntlinkConfig::new();
    let layers = candidates
        .map(|path| {
            let status = if !path.is_file() {
                LayerStatus::Missing
            } else {
                match load_config_file(&path) {
                    Ok(layer) => {
                        config.merge(layer);
                        LayerStatus::Loaded
                    }
                    Err(e) => LayerStatus::Skipped(e.to_string()),
                }
            };
            ConfigLayer { path, status }
        })
        .collect();

    LoadedConfig { config, layers }
}

/// Read one config file. Relative paths inside it are resolved against its
/// directory.
pub fn load_config_file(path: &Path) -> Result<EntlinkConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut config = EntlinkConfig::from_toml(&contents)?;
    if let Some(dir) = path.parent() {
        config.resolve_paths(dir);
    }
    Ok(config)
}

/// Directory holding the user layer: `ENTLINK_CONFIG_DIR` when set and
/// non-empty, else `entlink/` under the platform config directory.
pub fn user_config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|d| d.join("entlink")),
    }
}
