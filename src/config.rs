use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration for the flattening process
///
/// A config is never mutated during a call. Each nested container is
/// flattened with the copy returned by [`FlattenConfig::descend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Remaining number of container levels that may be entered (default: 100)
    pub max_depth: usize,

    /// Drop null leaves instead of emitting them (default: false)
    pub ignore_null: bool,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig {
            max_depth: 100,
            ignore_null: false,
        }
    }
}

impl FlattenConfig {
    pub fn new(max_depth: usize, ignore_null: bool) -> Self {
        FlattenConfig {
            max_depth,
            ignore_null,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_ignore_null(mut self, ignore_null: bool) -> Self {
        self.ignore_null = ignore_null;
        self
    }

    /// The configuration handed to a nested container, one level shallower.
    pub fn descend(self) -> Self {
        FlattenConfig {
            max_depth: self.max_depth.saturating_sub(1),
            ..self
        }
    }

    /// True once no further container may be entered.
    pub fn is_exhausted(&self) -> bool {
        self.max_depth == 0
    }

    /// Load a configuration from a TOML file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FlattenConfig::default();
        assert_eq!(config.max_depth, 100);
        assert!(!config.ignore_null);
    }

    #[test]
    fn test_descend_keeps_null_policy() {
        let config = FlattenConfig::new(3, true);
        let child = config.descend();
        assert_eq!(child.max_depth, 2);
        assert!(child.ignore_null);
        // the parent is untouched
        assert_eq!(config.max_depth, 3);
    }

    #[test]
    fn test_descend_saturates() {
        let config = FlattenConfig::default().with_max_depth(0);
        assert_eq!(config.descend().max_depth, 0);
        assert!(config.descend().is_exhausted());
    }

    #[test]
    fn test_partial_toml() {
        let config = FlattenConfig::from_toml_str("ignore_null = true\n").unwrap();
        assert_eq!(config, FlattenConfig::new(100, true));

        let config = FlattenConfig::from_toml_str("max_depth = 5").unwrap();
        assert_eq!(config, FlattenConfig::new(5, false));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(FlattenConfig::from_toml_str("max_depth = \"deep\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flatten.toml");
        std::fs::write(&path, "max_depth = 7\nignore_null = true\n").unwrap();

        let config = FlattenConfig::load(&path).unwrap();
        assert_eq!(config, FlattenConfig::new(7, true));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FlattenConfig::load("/nonexistent/flatten.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
