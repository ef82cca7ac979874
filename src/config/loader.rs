//! Configuration file discovery and loading.

use crate::config::schema::ReleaseConfig;
use crate::error::{BuildError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the settings file, relative to the repository root.
pub const CONFIG_PATH: &str = "release/cibuild.yml";

/// Find the repository root by walking up from `start`.
///
/// The first directory containing `.git` wins.
///
/// # Returns
///
/// The path to the repository root, or None if not found.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Repository root for the current directory.
///
/// Falls back to the current directory when no ancestor contains `.git`.
pub fn detect_project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(find_project_root(&cwd).unwrap_or(cwd))
}

/// Load a single config file and parse it into ReleaseConfig.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read.
/// Returns `ConfigParse` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<ReleaseConfig> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, path)
}

/// Parse YAML content into ReleaseConfig.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<ReleaseConfig> {
    // An empty document deserializes to unit, not to an empty map.
    if content.trim().is_empty() {
        return Ok(ReleaseConfig::default());
    }

    let config: ReleaseConfig =
        serde_yaml::from_str(content).map_err(|e| BuildError::ConfigParse {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;

    for tool in &config.console_tools {
        if !config.bundles.values().any(|tools| tools.contains(tool)) {
            tracing::warn!(
                "Console tool '{}' in {} is not part of any bundle; ignoring",
                tool,
                source_path.display()
            );
        }
    }

    Ok(config)
}

/// Load `release/cibuild.yml` under `root`, or defaults when it is absent.
pub fn load_release_config(root: &Path) -> Result<ReleaseConfig> {
    let path = root.join(CONFIG_PATH);
    match fs::read_to_string(&path) {
        Ok(content) => {
            tracing::debug!("Loading release config from {}", path.display());
            parse_config(&content, &path)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No release config at {}, using defaults", path.display());
            Ok(ReleaseConfig::default())
        }
        Err(e) => Err(BuildError::Io(e)),
    }
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file and a missing
/// file is an error. Otherwise falls back to [`load_release_config`].
pub fn load_config(root: &Path, config_override: Option<&Path>) -> Result<ReleaseConfig> {
    if let Some(override_path) = config_override {
        load_config_file(override_path)
    } else {
        load_release_config(root)
    }
}
