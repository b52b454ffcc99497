//! Config file discovery and layered loading.

use crate::{ConfigError, OutputFormat, TabConfig};
use std::path::{Path, PathBuf};

/// Local override file name, looked up in the current directory.
pub const LOCAL_FILE: &str = "whistletab.toml";

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
}

/// User config path (XDG_CONFIG_HOME or ~/.config).
pub fn user_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("whistletab/config.toml"))
}

/// Discover config files, optionally with a CLI override path.
///
/// Returns paths in load order (user, then local or cli). The user and
/// local files are only returned when they exist; a CLI path is always
/// returned so that a typo surfaces as an error.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Some(user) = user_config_path() {
        if user.exists() {
            files.push(user);
        }
    }

    // CLI override takes precedence over local
    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    let local = PathBuf::from(LOCAL_FILE);
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read a TOML file and apply the values it sets on top of `config`.
pub fn apply_file(config: &mut TabConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    apply_toml(config, &contents, path)
}

/// Apply the keys present in a TOML document. Absent keys keep their value.
pub fn apply_toml(config: &mut TabConfig, contents: &str, path: &Path) -> Result<(), ConfigError> {
    let parse_err = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let table: toml::Table = contents
        .parse()
        .map_err(|e: toml::de::Error| parse_err(e.to_string()))?;

    if let Some(output) = table.get("output") {
        let output = output
            .as_table()
            .ok_or_else(|| parse_err("[output] must be a table".to_string()))?;

        if let Some(v) = output.get("format") {
            let s = v
                .as_str()
                .ok_or_else(|| parse_err("output.format must be a string".to_string()))?;
            config.output.format = s.parse::<OutputFormat>().map_err(parse_err)?;
        }
        if let Some(v) = output.get("whistle") {
            config.output.whistle = v
                .as_str()
                .ok_or_else(|| parse_err("output.whistle must be a string".to_string()))?
                .to_string();
        }
        if let Some(v) = output.get("fit") {
            config.output.fit = v
                .as_bool()
                .ok_or_else(|| parse_err("output.fit must be true or false".to_string()))?;
        }
    }

    if let Some(logging) = table.get("logging") {
        let logging = logging
            .as_table()
            .ok_or_else(|| parse_err("[logging] must be a table".to_string()))?;

        if let Some(v) = logging.get("level") {
            config.logging.level = v
                .as_str()
                .ok_or_else(|| parse_err("logging.level must be a string".to_string()))?
                .to_string();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn apply(config: &mut TabConfig, toml: &str) -> Result<(), ConfigError> {
        apply_toml(config, toml, Path::new("test.toml"))
    }

    #[test]
    fn test_parse_minimal_toml() {
        let mut config = TabConfig::default();
        apply(&mut config, "[output]\nformat = \"json\"\n").unwrap();

        assert_eq!(config.output.format, OutputFormat::Json);
        // Other values should be defaults
        assert_eq!(config.output.whistle, "High D");
        assert!(config.output.fit);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
[output]
format = "notes"
whistle = "Low A"
fit = false

[logging]
level = "whistle_abc=debug"
"#;
        let mut config = TabConfig::default();
        apply(&mut config, toml).unwrap();

        assert_eq!(config.output.format, OutputFormat::Notes);
        assert_eq!(config.output.whistle, "Low A");
        assert!(!config.output.fit);
        assert_eq!(config.logging.level, "whistle_abc=debug");
    }

    #[test]
    fn test_later_layer_wins_per_field() {
        let mut config = TabConfig::default();
        apply(&mut config, "[output]\nformat = \"line\"\nwhistle = \"Low D\"\n").unwrap();
        apply(&mut config, "[output]\nwhistle = \"High D\"\n").unwrap();

        // an explicit default still overrides the earlier layer
        assert_eq!(config.output.whistle, "High D");
        assert_eq!(config.output.format, OutputFormat::Line);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let mut config = TabConfig::default();
        let err = apply(&mut config, "[output]\nformat = \"midi\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref message, .. } if message.contains("midi")));

        assert!(apply(&mut config, "[output]\nfit = \"yes\"\n").is_err());
        assert!(apply(&mut config, "output = 3\n").is_err());
        assert!(apply(&mut config, "not toml [").is_err());
    }

    #[test]
    fn test_apply_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("whistletab.toml");
        fs::write(&path, "[logging]\nlevel = \"info\"\n").unwrap();

        let mut config = TabConfig::default();
        apply_file(&mut config, &path).unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_cli_path_is_last() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "").unwrap();

        let files = discover_config_files_with_override(Some(&path));
        assert_eq!(files.last(), Some(&path));
    }

    #[test]
    fn test_load_with_cli_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[output]\nformat = \"json\"\n").unwrap();

        let (config, sources) = TabConfig::load_with_sources_from(Some(&path)).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(sources.files.last(), Some(&path));
    }
}
