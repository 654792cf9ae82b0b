use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which matching phases the diff engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    #[default]
    TopDownBottomUp,
    TopDown,
}

/// Tuning knobs handed to a diff oracle. The scorer never reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonOptions {
    pub strategy: MatchStrategy,
    /// Subtrees this high or lower are left to the bottom-up phase.
    pub min_height: usize,
    /// Lowest descendant overlap at which two inner nodes are paired bottom-up.
    pub min_similarity: f64,
    /// Largest subtree whose unmatched children are recovered after a bottom-up match.
    pub max_recovery_size: usize,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::TopDownBottomUp,
            min_height: 2,
            min_similarity: 0.5,
            max_recovery_size: 100,
        }
    }
}

impl ComparisonOptions {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let options: ComparisonOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(ConfigError::Invalid(format!(
                "min_similarity must be within [0, 1], got {}",
                self.min_similarity
            )));
        }
        if self.min_height == 0 {
            return Err(ConfigError::Invalid("min_height must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        let options = ComparisonOptions::from_toml_str("").unwrap();
        assert_eq!(options, ComparisonOptions::default());
    }

    #[test]
    fn test_partial_override() {
        let options = ComparisonOptions::from_toml_str(
            "strategy = \"top-down\"\nmin_similarity = 0.75\n",
        )
        .unwrap();
        assert_eq!(options.strategy, MatchStrategy::TopDown);
        assert_eq!(options.min_similarity, 0.75);
        assert_eq!(options.min_height, 2);
    }

    #[test]
    fn test_rejects_out_of_range_similarity() {
        let err = ComparisonOptions::from_toml_str("min_similarity = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = ComparisonOptions::from_toml_str("min_heigth = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)), "got {err:?}");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_recovery_size = 10").unwrap();
        let options = ComparisonOptions::from_toml_file(file.path()).unwrap();
        assert_eq!(options.max_recovery_size, 10);
    }

    #[test]
    fn test_missing_file() {
        let err = ComparisonOptions::from_toml_file(Path::new("/nonexistent/codesim.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
