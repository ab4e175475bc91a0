//! Application settings and paths.
//!
//! Settings live in `settings.json` under the XDG config directory unless a
//! path is given explicitly.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/httpscout)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Resolve the platform directories. Nothing is created on disk.
    pub fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "httpscout", "httpscout")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Per-request timeout in seconds.
    pub default_timeout_secs: u64,
    /// Number of hosts scanned at once.
    pub default_max_workers: usize,
    /// Report written after a scan.
    pub default_output_file: PathBuf,
    /// Flat list of matched URLs.
    pub url_list_file: PathBuf,
    /// Requests per second across all workers, 0 for unlimited.
    pub default_rate_limit: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_timeout_secs: 5,
            default_max_workers: 10,
            default_output_file: PathBuf::from("http_scanner_results.txt"),
            url_list_file: PathBuf::from("urls_list.txt"),
            default_rate_limit: 0,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location.
    ///
    /// A missing file yields defaults. A file that exists but cannot be read
    /// or parsed is an error; the caller decides whether to fall back.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::new()?.settings_file();
        if !file.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Reject values that would make a scan meaningless.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_max_workers == 0 {
            return Err(ConfigError::InvalidValue(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.default_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_timeout_secs, 5);
        assert_eq!(settings.default_max_workers, 10);
        assert_eq!(
            settings.default_output_file,
            PathBuf::from("http_scanner_results.txt")
        );
        assert_eq!(settings.url_list_file, PathBuf::from("urls_list.txt"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_max_workers": 25}}"#).unwrap();

        let settings = AppSettings::load_from(file.path()).unwrap();
        assert_eq!(settings.default_max_workers, 25);
        assert_eq!(settings.default_timeout_secs, 5);
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = AppSettings::load_from(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppSettings::load_from(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_validate_rejects_zero() {
        let settings = AppSettings {
            default_max_workers: 0,
            ..AppSettings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidValue(_))));

        let settings = AppSettings {
            default_timeout_secs: 0,
            ..AppSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_serialization() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }
}
