//! Loader configuration.
//!
//! Defaults match the standard grid description format; a TOML document can
//! override any subset of the fields.

use serde::{Deserialize, Serialize};

/// Errors from reading a loader configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },
}

/// Tunables for [`GameLoader`](crate::loader::GameLoader).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Minimum number of leading underscores on a separator line.
    pub separator_len: usize,
    /// Largest accepted grid range. A range-`n` grid allocates `3n(n+1)+1`
    /// cells up front.
    pub max_range: u32,
    /// Accept a separator between the producer and receiver key lists.
    pub allow_key_separator: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            separator_len: 5,
            max_range: 256,
            allow_key_separator: true,
        }
    }
}

impl LoaderConfig {
    /// Parse a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LoaderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.separator_len == 0 {
            return Err(ConfigError::Zero {
                field: "separator_len",
            });
        }
        if self.max_range == 0 {
            return Err(ConfigError::Zero { field: "max_range" });
        }
        Ok(())
    }

    /// Whether `line` marks a section boundary.
    pub fn is_separator(&self, line: &str) -> bool {
        line.bytes().take_while(|b| *b == b'_').count() >= self.separator_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.separator_len, 5);
        assert_eq!(config.max_range, 256);
        assert!(config.allow_key_separator);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(LoaderConfig::from_toml_str("").unwrap(), LoaderConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let config = LoaderConfig::from_toml_str("max_range = 10\nallow_key_separator = false").unwrap();
        assert_eq!(config.max_range, 10);
        assert!(!config.allow_key_separator);
        assert_eq!(config.separator_len, 5);
    }

    #[test]
    fn invalid_toml_fails() {
        let err = LoaderConfig::from_toml_str("max_range = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_values_rejected() {
        let err = LoaderConfig::from_toml_str("separator_len = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Zero { field: "separator_len" }));
        let err = LoaderConfig::from_toml_str("max_range = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Zero { field: "max_range" }));
    }

    #[test]
    fn separator_detection() {
        let config = LoaderConfig::default();
        assert!(config.is_separator("_____"));
        assert!(config.is_separator("__________ trailing text"));
        assert!(!config.is_separator("____"));
        assert!(!config.is_separator(" _____"));
        assert!(!config.is_separator(""));
    }
}
