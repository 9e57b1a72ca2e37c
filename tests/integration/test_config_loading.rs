use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;
use tfmigrate::core::config::{ConfigLoader, ConfigValidator};
use tfmigrate::logging::config::LoggingConfig;
use tfmigrate::logging::ConsoleOutput;
use tfmigrate::resources;

fn clear_tfmigrate_env() {
    for v in &["TFMIGRATE_RESOURCES", "TFMIGRATE_DRY_RUN", "TFMIGRATE_LOG_LEVEL"] {
        env::remove_var(v);
    }
}

const FULL_CONFIG: &str = r#"
[migrate]
resources = ["dns_record"]
dry_run = true
config_extensions = ["tf"]
state_extensions = ["tfstate", "backup"]

[logging]
default_level = "tfmigrate=debug,warn"
console_output = "none"
enable_file = false
"#;

/// One file feeds both the migration settings and the logging settings.
#[test]
#[serial]
fn test_single_file_configures_everything() {
    clear_tfmigrate_env();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tfmigrate.toml");
    fs::write(&path, FULL_CONFIG).unwrap();

    let config = ConfigLoader::load_explicit(&path).unwrap();
    ConfigValidator::validate(&config, &resources::available_resources()).unwrap();
    assert_eq!(config.migrate.resources, ["dns_record"]);
    assert!(config.migrate.dry_run);
    assert_eq!(config.migrate.state_extensions, ["tfstate", "backup"]);

    let logging = LoggingConfig::load(Some(&path), false).unwrap();
    assert_eq!(logging.default_level, "tfmigrate=debug,warn");
    assert_eq!(logging.console_output, ConsoleOutput::None);
}

#[test]
#[serial]
fn test_env_overrides_file_values() {
    clear_tfmigrate_env();
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("tfmigrate.toml"), FULL_CONFIG).unwrap();

    env::set_var("TFMIGRATE_RESOURCES", "zone_settings_override");
    env::set_var("TFMIGRATE_DRY_RUN", "false");
    env::set_var("TFMIGRATE_LOG_LEVEL", "error");

    let config = ConfigLoader::load_from_dir(temp_dir.path()).unwrap();
    let logging =
        LoggingConfig::load(Some(&temp_dir.path().join("tfmigrate.toml")), false).unwrap();

    assert_eq!(config.migrate.resources, ["zone_settings_override"]);
    assert!(!config.migrate.dry_run);
    assert_eq!(logging.default_level, "error");

    clear_tfmigrate_env();
}

#[test]
#[serial]
fn test_unknown_resource_from_env_fails_validation() {
    clear_tfmigrate_env();
    let temp_dir = TempDir::new().unwrap();
    env::set_var("TFMIGRATE_RESOURCES", "dns_record,firewall_rule");

    let config = ConfigLoader::load_from_dir(temp_dir.path()).unwrap();
    let err = ConfigValidator::validate(&config, &resources::available_resources()).unwrap_err();
    assert!(err.to_string().contains("firewall_rule"));

    clear_tfmigrate_env();
}
