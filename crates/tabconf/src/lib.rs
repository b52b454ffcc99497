//! Configuration loading for whistletab.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins, field by field):
//! 1. `~/.config/whistletab/config.toml` (user)
//! 2. `./whistletab.toml` (local override), or the path given with `--config`
//!
//! Missing files in the standard locations are skipped. A path given
//! explicitly must exist.
//!
//! # Example Config
//!
//! ```toml
//! [output]
//! format = "tab"      # json, tab, line or notes
//! whistle = "Low A"
//! fit = true
//!
//! [logging]
//! level = "info"
//! ```

pub mod loader;
pub mod output;

pub use loader::{discover_config_files_with_override, ConfigSources};
pub use output::{LoggingConfig, OutputConfig, OutputFormat};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete whistletab configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TabConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TabConfig {
    /// Load configuration, with `config_path` replacing `./whistletab.toml`.
    /// `None` reads only the standard locations.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration and report which files were read.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = TabConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::apply_file(&mut config, &path)?;
            sources.files.push(path);
        }

        Ok((config, sources))
    }

    /// Serialize config to a TOML string.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# whistletab configuration\n\n");

        output.push_str("[output]\n");
        output.push_str(&format!("format = \"{}\"\n", self.output.format));
        output.push_str(&format!("whistle = \"{}\"\n", self.output.whistle));
        output.push_str(&format!("fit = {}\n", self.output.fit));

        output.push_str("\n[logging]\n");
        output.push_str(&format!("level = \"{}\"\n", self.logging.level));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TabConfig::default();
        assert_eq!(config.output.format, OutputFormat::Tab);
        assert!(config.output.fit);
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = TabConfig::default();
        config.output.format = OutputFormat::Json;
        config.output.whistle = "Low A".to_string();
        config.logging.level = "debug".to_string();

        let toml = config.to_toml();
        assert!(toml.contains("[output]"));
        assert!(toml.contains("[logging]"));

        let parsed: TabConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = TabConfig::load_from(Some(Path::new("/nonexistent/whistletab.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }
}
