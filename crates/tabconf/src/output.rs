//! Output and logging settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What the CLI writes to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The parse result as JSON
    Json,
    /// Tablature, one line per ABC body line
    #[default]
    Tab,
    /// Tablature on a single line
    Line,
    /// `pitch/durationMs` note file
    Notes,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Tab => "tab",
            OutputFormat::Line => "line",
            OutputFormat::Notes => "notes",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "tab" => Ok(OutputFormat::Tab),
            "line" => Ok(OutputFormat::Line),
            "notes" => Ok(OutputFormat::Notes),
            other => Err(format!(
                "unknown output format '{}' (expected json, tab, line or notes)",
                other
            )),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default: tab
    #[serde(default)]
    pub format: OutputFormat,

    /// Whistle the tablature is written for, by name ("High D", "Low A").
    /// Default: High D
    #[serde(default = "OutputConfig::default_whistle")]
    pub whistle: String,

    /// Shift the melody into the whistle's range.
    /// Default: true
    #[serde(default = "OutputConfig::default_fit")]
    pub fit: bool,
}

impl OutputConfig {
    fn default_whistle() -> String {
        "High D".to_string()
    }

    fn default_fit() -> bool {
        true
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            whistle: Self::default_whistle(),
            fit: Self::default_fit(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive. `RUST_LOG` takes precedence.
    /// Default: warn
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "warn".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse(), Ok(OutputFormat::Json));
        assert_eq!("TAB".parse(), Ok(OutputFormat::Tab));
        assert!("midi".parse::<OutputFormat>().is_err());
        for format in [
            OutputFormat::Json,
            OutputFormat::Tab,
            OutputFormat::Line,
            OutputFormat::Notes,
        ] {
            assert_eq!(format.to_string().parse(), Ok(format));
        }
    }

    #[test]
    fn test_defaults() {
        let output = OutputConfig::default();
        assert_eq!(output.format, OutputFormat::Tab);
        assert_eq!(output.whistle, "High D");
        assert!(output.fit);
        assert_eq!(LoggingConfig::default().level, "warn");
    }
}
