#![allow(clippy::result_large_err)]

use super::MigrateConfig;
use crate::core::error::MigrateError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "tfmigrate.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from `dir/tfmigrate.toml`, falling back to defaults when the file is absent.
    /// Environment variables override config file values.
    pub fn load_from_dir(dir: &Path) -> Result<MigrateConfig, MigrateError> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        let mut config = Self::load_from_file(&config_path)?.unwrap_or_default();
        Self::apply_env_overrides(&mut config);
        Ok(config)
    }

    /// Load an explicitly requested config file. Unlike [`ConfigLoader::load_from_dir`] the
    /// file has to exist.
    pub fn load_explicit(path: &Path) -> Result<MigrateConfig, MigrateError> {
        let mut config = Self::load_from_file(path)?.ok_or_else(|| {
            MigrateError::new(
                ErrorCategory::ConfigurationError,
                format!("Config file {} does not exist", path.display()),
            )
        })?;
        Self::apply_env_overrides(&mut config);
        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<MigrateConfig>, MigrateError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            MigrateError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: MigrateConfig = toml::from_str(&content).map_err(|e| {
            MigrateError::new(
                ErrorCategory::ConfigurationError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
        })?;

        Ok(Some(config))
    }

    /// Environment variables take precedence over config file values
    fn apply_env_overrides(config: &mut MigrateConfig) {
        if let Ok(resources) = env::var("TFMIGRATE_RESOURCES") {
            config.migrate.resources = split_list(&resources);
        }

        if let Ok(dry_run_str) = env::var("TFMIGRATE_DRY_RUN") {
            if let Ok(dry_run) = dry_run_str.parse::<bool>() {
                config.migrate.dry_run = dry_run;
            }
        }
    }
}

/// Split a comma separated list, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
