use crate::utils::files::{CONFIG_EXTENSION, STATE_EXTENSION};
use serde::{Deserialize, Serialize};

/// Tool configuration loaded from tfmigrate.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MigrateConfig {
    /// Migration settings
    #[serde(default)]
    pub migrate: MigrateSection,
}

/// `[migrate]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrateSection {
    /// Short resource names to migrate; empty means every available resource
    #[serde(default)]
    pub resources: Vec<String>,

    /// Compute results without writing files
    #[serde(default)]
    pub dry_run: bool,

    /// Extensions of configuration files picked up from the config directory
    #[serde(default = "default_config_extensions")]
    pub config_extensions: Vec<String>,

    /// Extensions accepted for the state file
    #[serde(default = "default_state_extensions")]
    pub state_extensions: Vec<String>,
}

fn default_config_extensions() -> Vec<String> {
    vec![CONFIG_EXTENSION.to_string()]
}

fn default_state_extensions() -> Vec<String> {
    vec![STATE_EXTENSION.to_string()]
}

impl Default for MigrateSection {
    fn default() -> Self {
        MigrateSection {
            resources: Vec::new(),
            dry_run: false,
            config_extensions: default_config_extensions(),
            state_extensions: default_state_extensions(),
        }
    }
}


pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;
