//! Configuration management for httpscout.
//!
//! Provides XDG-compliant settings storage. Command-line flags override
//! anything loaded here.

mod settings;

pub use settings::{AppSettings, Paths};

use crate::error::ConfigResult;
use std::path::Path;
use tracing::warn;

/// Load settings for a run.
///
/// An explicit path must load cleanly. The default location is best-effort:
/// a broken file there is logged and defaults are used instead.
pub fn load_settings(explicit: Option<&Path>) -> ConfigResult<AppSettings> {
    match explicit {
        Some(path) => AppSettings::load_from(path),
        None => Ok(AppSettings::load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable settings file");
            AppSettings::default()
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_explicit_path_is_strict() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{broken").unwrap();
        assert!(load_settings(Some(file.path())).is_err());
    }

    #[test]
    fn test_explicit_path_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_timeout_secs": 9}}"#).unwrap();
        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings.default_timeout_secs, 9);
    }
}
