//! Platform-specific configuration and data paths.

use crate::config::Config;
use crate::constants::{APP_NAME, pins::NAMESPACE};
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/florascope/`
/// - macOS: `~/Library/Application Support/florascope/`
/// - Windows: `%APPDATA%\florascope\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get the data directory for the current platform.
///
/// - Linux: `~/.local/share/florascope/`
/// - macOS: `~/Library/Application Support/florascope/`
/// - Windows: `%APPDATA%\florascope\data\`
pub fn data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(Error::DataDirNotFound)
}

/// Directory of the pin namespace, honoring `storage.pins_dir`.
pub fn pins_dir(config: &Config) -> Result<PathBuf> {
    match &config.storage.pins_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(data_dir()?.join(NAMESPACE)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_returns_path() {
        let result = config_dir();
        assert!(result.is_ok());
        let path = result.ok();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("florascope"));
    }

    #[test]
    fn test_config_file_path_ends_with_toml() {
        let result = config_file_path();
        assert!(result.is_ok());
        let path = result.ok().unwrap();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_pins_dir_default_is_namespace() {
        let path = pins_dir(&Config::default()).unwrap();
        assert!(path.ends_with("PINS"));
    }

    #[test]
    fn test_pins_dir_override() {
        let mut config = Config::default();
        config.storage.pins_dir = Some(PathBuf::from("/tmp/my-pins"));
        assert_eq!(pins_dir(&config).unwrap(), PathBuf::from("/tmp/my-pins"));
    }
}
