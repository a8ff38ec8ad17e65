//! # Configuration
//!
//! Optional YAML file passed with `--config`. Every field has a default,
//! so an absent flag, an empty file, or a partial file are all valid.
//!
//! ```yaml
//! validator:
//!   max_depth: 64
//!   check_formats: false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use assay_schema::ValidatorOptions;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssayConfig {
    pub validator: ValidatorOptions,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl AssayConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let config = Self::load(path)?;
                tracing::debug!(path = %path.display(), ?config, "loaded configuration");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(contents: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), contents).unwrap();
        file
    }

    #[test]
    fn absent_flag_gives_defaults() {
        let config = AssayConfig::load_or_default(None).unwrap();
        assert_eq!(config.validator.max_depth, 128);
        assert!(config.validator.check_formats);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write("validator:\n  check_formats: false\n");
        let config = AssayConfig::load(file.path()).unwrap();
        assert!(!config.validator.check_formats);
        assert_eq!(config.validator.max_depth, 128);
    }

    #[test]
    fn empty_file_gives_defaults() {
        let file = write("\n");
        assert_eq!(AssayConfig::load(file.path()).unwrap(), AssayConfig::default());
    }

    #[test]
    fn unknown_field_rejected() {
        let file = write("validator:\n  max_dpeth: 3\n");
        assert!(matches!(
            AssayConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = AssayConfig::load(Path::new("/nonexistent/assay.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/assay.yaml"));
    }
}
