use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::builders::validator::{ConfigValidator, StandardValidator};
use crate::core::error::FixerError;

pub const DEFAULT_CODING: &str = "UTF-8";
pub const DEFAULT_EXTENSION: &str = "py";
pub const DEFAULT_EXCLUDED_DIR: &str = "migrations";
pub const DEFAULT_BACKUP_SUFFIX: &str = ".checker";

/// Settings for one fixing pass.
///
/// Every component receives this value explicitly, so several encodings can
/// be exercised side by side (tests, the self-test) without shared state.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FixerConfig {
    /// Encoding name written into inserted declarations. Case is preserved.
    pub coding: String,
    /// Extension (without the dot) of the files collected from the tree.
    pub extension: String,
    /// Directory name pruned from the walk together with its subtree.
    pub excluded_dir: String,
    /// Suffix appended to a file path to name its backup.
    pub backup_suffix: String,
    /// Abort the whole pass on the first per-file failure.
    pub fail_fast: bool,
}

impl Default for FixerConfig {
    fn default() -> Self {
        Self {
            coding: DEFAULT_CODING.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            excluded_dir: DEFAULT_EXCLUDED_DIR.to_string(),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            fail_fast: false,
        }
    }
}

impl FixerConfig {
    pub fn with_coding(mut self, coding: impl Into<String>) -> Self {
        self.coding = coding.into();
        self
    }

    /// The exact line inserted into non-compliant files, newline included.
    pub fn declaration_line(&self) -> String {
        format!("# -*- coding: {} -*-\n", self.coding)
    }

    /// Runs the standard validator and turns any issue into an error.
    pub fn validate(&self) -> std::result::Result<(), FixerError> {
        let issues = StandardValidator::new().validate_config(self);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(FixerError::Config(issues))
        }
    }
}

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub coding: Option<String>,
    pub fail_fast: bool,
}

pub trait ConfigProvider {
    fn load_config(&self) -> Result<FixerConfig>;
    fn get_config_path(&self) -> Option<&Path>;
}

/// Resolves the effective `FixerConfig` from an optional TOML file and the
/// command-line overrides.
pub struct ConfigManager {
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
}

impl ConfigManager {
    pub fn new(config_path: Option<PathBuf>, overrides: ConfigOverrides) -> Self {
        Self {
            config_path,
            overrides,
        }
    }

    /// Loads, applies overrides and validates in one step.
    pub fn resolve(&self) -> Result<FixerConfig> {
        let config = self.load_config()?;
        config.validate()?;
        tracing::debug!(?config, "resolved configuration");
        Ok(config)
    }
}

impl ConfigProvider for ConfigManager {
    fn load_config(&self) -> Result<FixerConfig> {
        let mut config = match &self.config_path {
            Some(path) => {
                let content = fs::read_to_string(path).with_context(|| {
                    format!("Failed to read config file {}", path.display())
                })?;
                toml::from_str(&content).with_context(|| {
                    format!("Failed to parse config file {}", path.display())
                })?
            }
            None => FixerConfig::default(),
        };

        if let Some(coding) = &self.overrides.coding {
            config.coding = coding.clone();
        }
        if self.overrides.fail_fast {
            config.fail_fast = true;
        }

        Ok(config)
    }

    fn get_config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_declaration_line() {
        let config = FixerConfig::default();
        assert_eq!(config.declaration_line(), "# -*- coding: UTF-8 -*-\n");
    }

    #[test]
    fn test_coding_case_is_preserved() {
        let config = FixerConfig::default().with_coding("utf-8");
        assert_eq!(config.declaration_line(), "# -*- coding: utf-8 -*-\n");
    }

    #[test]
    fn test_load_partial_toml_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fixer.toml");
        fs::write(&path, "coding = \"latin-1\"\nfail_fast = true\n").unwrap();

        let manager = ConfigManager::new(Some(path.clone()), ConfigOverrides::default());
        let config = manager.resolve().unwrap();

        assert_eq!(config.coding, "latin-1");
        assert!(config.fail_fast);
        assert_eq!(config.extension, "py");
        assert_eq!(config.excluded_dir, "migrations");
        assert_eq!(manager.get_config_path(), Some(path.as_path()));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fixer.toml");
        fs::write(&path, "coding = \"latin-1\"\n").unwrap();

        let overrides = ConfigOverrides {
            coding: Some("cp-1252".to_string()),
            fail_fast: false,
        };
        let config = ConfigManager::new(Some(path), overrides).resolve().unwrap();
        assert_eq!(config.coding, "cp-1252");
    }

    #[test]
    fn test_resolve_rejects_unrecognizable_coding() {
        let overrides = ConfigOverrides {
            coding: Some("ascii".to_string()),
            fail_fast: false,
        };
        let result = ConfigManager::new(None, overrides).resolve();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let manager = ConfigManager::new(
            Some(PathBuf::from("/definitely/not/here.toml")),
            ConfigOverrides::default(),
        );
        assert!(manager.resolve().is_err());
    }
}
