//! Configuration types and presets

use serde::{Deserialize, Serialize};

/// Environment variable holding the filter directive
pub const LOG_ENV: &str = "CREDHUB_LOG";
/// Environment variable selecting the output format
pub const LOG_FORMAT_ENV: &str = "CREDHUB_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level filter (e.g., "warn", "debug,hyper=warn")
    pub level: String,

    /// Output format
    pub format: Format,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable with colors and indentation
    Pretty,
    /// Compact single-line output
    Compact,
    /// Structured JSON output
    Json,
}

impl Format {
    /// Parse a format name, falling back to [`Format::Compact`]
    pub fn parse_lossy(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show timestamps
    pub time: bool,
    /// Show source location (file:line)
    pub source: bool,
    /// Show target module
    pub target: bool,
    /// Use ANSI colors
    pub colors: bool,
    /// Show thread IDs
    pub thread_ids: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: Format::Compact,
            display: DisplayConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time: true,
            source: false,
            target: true,
            colors: true,
            thread_ids: false,
        }
    }
}

impl Config {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// `CREDHUB_LOG` wins over `RUST_LOG`; an unset or blank value keeps the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup(LOG_ENV)
            .or_else(|| lookup("RUST_LOG"))
            .filter(|level| !level.trim().is_empty())
        {
            config.level = level;
        }

        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            config.format = Format::parse_lossy(&format);
        }

        if lookup("NO_COLOR").is_some() {
            config.display.colors = false;
        }

        config
    }

    /// Raise the level for `-v` flags: 1 → info, 2 → debug, 3+ → trace.
    ///
    /// Zero leaves the configured level untouched.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        let level = match verbosity {
            0 => return self,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        self.level = level.to_string();
        self
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                source: true,
                ..DisplayConfig::default()
            },
        }
    }

    /// Machine-readable configuration (JSON, info level, no colors)
    #[must_use]
    pub fn structured() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                ..DisplayConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_keeps_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn credhub_log_wins_over_rust_log() {
        let config = Config::from_lookup(lookup_from(&[
            ("CREDHUB_LOG", "debug"),
            ("RUST_LOG", "trace"),
        ]));
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn rust_log_is_used_as_fallback() {
        let config = Config::from_lookup(lookup_from(&[("RUST_LOG", "credhub=trace")]));
        assert_eq!(config.level, "credhub=trace");
    }

    #[test]
    fn no_color_disables_ansi() {
        let config = Config::from_lookup(lookup_from(&[("NO_COLOR", "1")]));
        assert!(!config.display.colors);
    }

    #[rstest]
    #[case("json", Format::Json)]
    #[case("PRETTY", Format::Pretty)]
    #[case("compact", Format::Compact)]
    #[case("logfmt", Format::Compact)]
    fn format_names(#[case] name: &str, #[case] expected: Format) {
        assert_eq!(Format::parse_lossy(name), expected);
    }

    #[rstest]
    #[case(0, "warn")]
    #[case(1, "info")]
    #[case(2, "debug")]
    #[case(7, "trace")]
    fn verbosity_raises_level(#[case] verbosity: u8, #[case] expected: &str) {
        assert_eq!(Config::default().with_verbosity(verbosity).level, expected);
    }
}
