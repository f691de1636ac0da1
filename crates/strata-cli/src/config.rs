//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{fs, path::Path};

use directories::ProjectDirs;
use log::{debug, info};

use strata::config::AppConfig;

use crate::error::CliError;

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (strata/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, CliError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("strata/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "strata", "strata") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(&system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: &Path) -> Result<AppConfig, CliError> {
    if !path.exists() {
        return Err(CliError::MissingConfig(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|err| CliError::ConfigParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use strata::layout::engines::LayoutEngine;

    use super::*;

    #[test]
    fn test_explicit_missing_file() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("absent.toml");

        let result = load_config(Some(&path));

        assert!(matches!(result, Err(CliError::MissingConfig(p)) if p == path));
    }

    #[test]
    fn test_explicit_file_is_parsed() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout]\nengine = \"annealing\"\n").expect("Failed to write config");

        let config = load_config(Some(&path)).expect("Failed to load config");

        assert_eq!(config.layout().engine(), LayoutEngine::Annealing);
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout\n").expect("Failed to write config");

        let result = load_config(Some(&path));

        assert!(matches!(result, Err(CliError::ConfigParse { .. })));
    }
}
