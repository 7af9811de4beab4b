//! Library configuration via `attest.toml`
//!
//! Defaults work without any file. To change settings, drop an
//! `attest.toml` next to the test run (or point `ATTEST_CONFIG` at one)
//! and the ambient [`Config::global`] picks it up.
//!
//! Explicit call arguments always win over the file: the config only
//! supplies defaults for the knobs a test does not set itself.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AttestError, AttestResult};

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "attest.toml";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "ATTEST_CONFIG";

/// Default comparison behavior, persisted under the `[compare]` section.
///
/// These are the modes applied by the plain assertion entry points when the
/// caller does not pass modes explicitly. All off means strict comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompareConfig {
    /// Compare lists and ordered collections as multisets.
    pub lenient_order: bool,
    /// Treat default-valued expected fields as "don't care".
    pub ignore_defaults: bool,
    /// Only require time fields to agree on being set or unset.
    pub lenient_dates: bool,
}

/// Mock defaults, persisted under the `[mock]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MockConfig {
    /// Match unwrapped argument values leniently (lenient order plus
    /// ignore defaults) instead of strictly.
    pub lenient_defaults: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            lenient_defaults: true,
        }
    }
}

/// Report rendering caps, persisted under the `[report]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Maximum nesting depth rendered before cutting off with `...`.
    pub max_depth: usize,
    /// Maximum list, map, or byte elements rendered before truncating.
    pub max_elements: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_elements: 15,
        }
    }
}

/// Library configuration loaded from `attest.toml`.
///
/// # Example
///
/// ```toml
/// [compare]
/// lenient_order = true
///
/// [mock]
/// lenient_defaults = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Default comparison modes.
    pub compare: CompareConfig,
    /// Mock framework defaults.
    pub mock: MockConfig,
    /// Report rendering caps.
    pub report: ReportConfig,
}

impl Config {
    /// Validate loaded values.
    ///
    /// # Errors
    ///
    /// Returns an error if a report cap is zero.
    pub fn validate(&self) -> AttestResult<()> {
        if self.report.max_depth == 0 {
            return Err(AttestError::configuration(
                "report.max_depth must be at least 1 in attest.toml",
            ));
        }
        if self.report.max_elements == 0 {
            return Err(AttestError::configuration(
                "report.max_elements must be at least 1 in attest.toml",
            ));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Attest configuration
#
# Every setting shown here is the built-in default; the file is optional.

[compare]
# Compare lists and ordered collections as multisets (default: false)
lenient_order = false
# Treat default-valued expected fields as "don't care" (default: false)
ignore_defaults = false
# Only require time fields to agree on being set or unset (default: false)
lenient_dates = false

[mock]
# Match unwrapped argument values leniently instead of strictly (default: true)
lenient_defaults = true

[report]
# Maximum nesting depth rendered in assertion reports (default: 3)
max_depth = 3
# Maximum collection elements rendered before truncating (default: 15)
max_elements = 15
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> AttestResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AttestError::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            AttestError::configuration(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> AttestResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                AttestError::configuration(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> AttestResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AttestError::configuration(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            AttestError::configuration(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load config from `ATTEST_CONFIG` or `./attest.toml`, falling back to
    /// the defaults when no file exists or the file does not load.
    ///
    /// A broken file is reported via a warning, not an error: assertion
    /// helpers have no good channel for configuration failures. Use
    /// [`Config::from_file`] directly for strict loading.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        if !path.exists() {
            return Config::default();
        }
        match Config::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    target: "attest::config",
                    path = %path.display(),
                    error = %e,
                    "Failed to load config, using defaults"
                );
                Config::default()
            }
        }
    }

    /// The ambient config, loaded once per process via [`Config::load`].
    pub fn global() -> &'static Config {
        static GLOBAL: Lazy<Config> = Lazy::new(Config::load);
        &GLOBAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_strict_compare_lenient_mock() {
        let config = Config::default();
        assert!(!config.compare.lenient_order);
        assert!(!config.compare.ignore_defaults);
        assert!(!config.compare.lenient_dates);
        assert!(config.mock.lenient_defaults);
        assert_eq!(config.report.max_depth, 3);
        assert_eq!(config.report.max_elements, 15);
    }

    #[test]
    fn default_toml_parses_to_the_default_config() {
        let config: Config = toml::from_str(Config::default_toml()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("[compare]\nlenient_order = true\n").unwrap();
        assert!(config.compare.lenient_order);
        assert!(!config.compare.ignore_defaults);
        assert!(config.mock.lenient_defaults);
    }

    #[test]
    fn invalid_toml_returns_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[compare\nlenient_order = yes").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn zero_report_caps_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[report]\nmax_depth = 0\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("max_depth"));
    }

    #[test]
    fn write_default_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(!path.exists());

        Config::write_default_if_missing(&path).unwrap();
        assert!(path.exists());

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        std::fs::write(&path, "[mock]\nlenient_defaults = false\n").unwrap();
        Config::write_default_if_missing(&path).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(!config.mock.lenient_defaults);
    }

    #[test]
    fn write_to_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = Config {
            compare: CompareConfig {
                lenient_order: true,
                ignore_defaults: true,
                lenient_dates: false,
            },
            mock: MockConfig {
                lenient_defaults: false,
            },
            report: ReportConfig {
                max_depth: 5,
                max_elements: 20,
            },
        };

        config.write_to_file(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
