//! Configuration types for loading datasets
//!
//! This module contains the configuration structures that control how a
//! byte source is opened and how far a load is allowed to grow. Every field
//! has a default, so an empty YAML document is a valid configuration.

use crate::error::{Error, Result};
use crate::types::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete dataset configuration loaded from YAML or JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// How the input file is read
    #[serde(default)]
    pub source: SourceConfig,

    /// Load limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Log level used by the command-line front end
    #[serde(default)]
    pub log_level: LogLevel,
}

impl DatasetConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                ))
            }
        })?;

        let config = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        Ok(config)
    }

    /// Parse a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Use memory mapping (true) or a buffered read (false)
    #[must_use]
    pub fn with_mmap(mut self, enabled: bool) -> Self {
        self.source.mmap = enabled;
        self
    }

    /// Cap the number of rows a single load may hold
    #[must_use]
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.limits.max_rows = Some(max_rows);
        self
    }

    /// Set the maximum nesting depth accepted by the scanner
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.limits.max_depth = depth;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_rows == Some(0) {
            return Err(Error::invalid_config(
                "limits.max_rows",
                "must be at least 1 when set",
            ));
        }
        if self.limits.max_depth == 0 {
            return Err(Error::invalid_config(
                "limits.max_depth",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Source Config
// ============================================================================

/// Byte source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Memory-map the input file instead of reading it into a buffer
    #[serde(default = "default_true")]
    pub mmap: bool,

    /// Skip lines that contain only whitespace
    #[serde(default = "default_true")]
    pub skip_blank_lines: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mmap: default_true(),
            skip_blank_lines: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Limits Config
// ============================================================================

/// Limits applied while realizing a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum number of rows held by one dataset (platform limit when unset)
    #[serde(default)]
    pub max_rows: Option<usize>,

    /// Maximum nesting depth of a single JSON value
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_rows: None,
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    128
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatasetConfig::default();
        assert!(config.source.mmap);
        assert!(config.source.skip_blank_lines);
        assert_eq!(config.limits.max_rows, None);
        assert_eq!(config.limits.max_depth, 128);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_parse_yaml_config() {
        let yaml = r"
source:
  mmap: false
limits:
  max_rows: 1000
log_level: debug
";
        let config = DatasetConfig::from_yaml_str(yaml).unwrap();
        assert!(!config.source.mmap);
        assert!(config.source.skip_blank_lines);
        assert_eq!(config.limits.max_rows, Some(1000));
        assert_eq!(config.limits.max_depth, 128);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = DatasetConfig::from_yaml_str("  \n").unwrap();
        assert_eq!(config, DatasetConfig::default());
    }

    #[test]
    fn test_parse_json_config() {
        let config =
            DatasetConfig::from_json_str(r#"{"limits": {"max_depth": 4}}"#).unwrap();
        assert_eq!(config.limits.max_depth, 4);
        assert!(config.source.mmap);
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let err = DatasetConfig::from_yaml_str("limits:\n  max_rows: 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));

        let err = DatasetConfig::from_yaml_str("limits:\n  max_depth: 0\n").unwrap_err();
        assert!(err.to_string().contains("limits.max_depth"));
    }

    #[test]
    fn test_builder_methods() {
        let config = DatasetConfig::new()
            .with_mmap(false)
            .with_max_rows(10)
            .with_max_depth(3);
        assert!(!config.source.mmap);
        assert_eq!(config.limits.max_rows, Some(10));
        assert_eq!(config.limits.max_depth, 3);
    }

    #[test]
    fn test_from_file_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("dataset.yaml");
        std::fs::write(&yaml_path, "source:\n  skip_blank_lines: false\n").unwrap();
        let config = DatasetConfig::from_file(&yaml_path).unwrap();
        assert!(!config.source.skip_blank_lines);

        let json_path = dir.path().join("dataset.json");
        std::fs::write(&json_path, r#"{"source": {"mmap": false}}"#).unwrap();
        let config = DatasetConfig::from_file(&json_path).unwrap();
        assert!(!config.source.mmap);

        let missing = DatasetConfig::from_file(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(missing, Error::FileNotFound { .. }));
    }
}
