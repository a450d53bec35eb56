//! Grounding configuration.
//!
//! ```toml
//! # dcground.toml
//! keep_builtins = true
//! max_cartesian_results = 50000
//! ```
//!
//! Every key is optional; missing keys take their default.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Maximum number of guarded tuples one function application may produce
pub const MAX_CARTESIAN_RESULTS: usize = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Register passing deterministic comparisons as named builtin atoms
    /// instead of folding them into the true guard.
    pub keep_builtins: bool,

    /// Upper bound on the cartesian product formed by one function
    /// application before it is rejected as a combinatorial explosion.
    pub max_cartesian_results: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            keep_builtins: false,
            max_cartesian_results: MAX_CARTESIAN_RESULTS,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.max_cartesian_results, MAX_CARTESIAN_RESULTS);
    }

    #[test]
    fn test_partial_config() {
        let config = EngineConfig::from_toml_str("keep_builtins = true").unwrap();
        assert!(config.keep_builtins);
        assert_eq!(config.max_cartesian_results, MAX_CARTESIAN_RESULTS);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = EngineConfig::from_toml_str("keep_builtin = true");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = EngineConfig::load("/nonexistent/dcground.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
