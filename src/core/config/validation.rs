#![allow(clippy::result_large_err)]

use super::MigrateConfig;
use crate::core::error::MigrateError;
use crate::core::types::ErrorCategory;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules against the resource names that can be registered.
    pub fn validate(config: &MigrateConfig, known_resources: &[&str]) -> Result<(), MigrateError> {
        let unknown: Vec<&str> = config
            .migrate
            .resources
            .iter()
            .map(String::as_str)
            .filter(|name| !known_resources.contains(name))
            .collect();
        if !unknown.is_empty() {
            return Err(MigrateError::new(
                ErrorCategory::ValidationError,
                format!(
                    "unknown resource(s): {} (available: {})",
                    unknown.join(", "),
                    known_resources.join(", ")
                ),
            ));
        }

        if config.migrate.config_extensions.is_empty() {
            return Err(MigrateError::new(
                ErrorCategory::ValidationError,
                "migrate.config_extensions cannot be empty",
            ));
        }

        if config.migrate.state_extensions.is_empty() {
            return Err(MigrateError::new(
                ErrorCategory::ValidationError,
                "migrate.state_extensions cannot be empty",
            ));
        }

        Ok(())
    }
}
