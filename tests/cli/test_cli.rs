use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const RECORD: &str = "resource \"cloudflare_record\" \"www\" {\n  name  = \"www\"\n  value = \"192.0.2.1\"\n}\n";

const STATE: &str = r#"{
  "version": 4,
  "resources": [
    {
      "type": "cloudflare_zone_settings_override",
      "name": "main",
      "instances": []
    },
    {
      "type": "cloudflare_record",
      "name": "www",
      "instances": [
        {
          "schema_version": 3,
          "attributes": {
            "value": "192.0.2.1",
            "ttl": 300
          }
        }
      ]
    }
  ]
}
"#;

fn tfmigrate(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tfmigrate"));
    cmd.current_dir(dir)
        .env_remove("TFMIGRATE_RESOURCES")
        .env_remove("TFMIGRATE_DRY_RUN")
        .env_remove("TFMIGRATE_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("infra")).unwrap();
    fs::write(dir.path().join("infra/dns.tf"), RECORD).unwrap();
    fs::write(dir.path().join("terraform.tfstate"), STATE).unwrap();
    dir
}

#[test]
fn test_resources_lists_available_transformers() {
    let dir = TempDir::new().unwrap();
    tfmigrate(dir.path())
        .arg("resources")
        .assert()
        .success()
        .stdout(predicate::str::contains("dns_record"))
        .stdout(predicate::str::contains("cloudflare_zone_settings_override"));
}

#[test]
fn test_run_rewrites_config_and_state() {
    let dir = workspace();
    tfmigrate(dir.path())
        .args(["run", "--config", "infra", "--state", "terraform.tfstate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 of 1 configuration file(s) changed"));

    let config = fs::read_to_string(dir.path().join("infra/dns.tf")).unwrap();
    assert_eq!(
        config,
        "resource \"cloudflare_dns_record\" \"www\" {\n  name    = \"www\"\n  content = \"192.0.2.1\"\n  ttl     = 1\n}\n"
    );

    let state: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("terraform.tfstate")).unwrap())
            .unwrap();
    let resources = state["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["type"], "cloudflare_dns_record");
    assert_eq!(resources[0]["instances"][0]["attributes"]["content"], "192.0.2.1");
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = workspace();
    tfmigrate(dir.path())
        .args([
            "run",
            "--config",
            "infra",
            "--state",
            "terraform.tfstate",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("would change"));

    assert_eq!(fs::read_to_string(dir.path().join("infra/dns.tf")).unwrap(), RECORD);
    assert_eq!(fs::read_to_string(dir.path().join("terraform.tfstate")).unwrap(), STATE);
}

#[test]
fn test_resource_selection_limits_migration() {
    let dir = workspace();
    tfmigrate(dir.path())
        .args(["run", "--config", "infra", "--resource", "zone_settings_override"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 of 1 configuration file(s) changed"));

    assert_eq!(fs::read_to_string(dir.path().join("infra/dns.tf")).unwrap(), RECORD);
}

#[test]
fn test_removed_resource_is_reported_as_warning() {
    let dir = workspace();
    fs::write(
        dir.path().join("infra/zone.tf"),
        "resource \"cloudflare_zone_settings_override\" \"main\" {\n  zone_id = \"z1\"\n}\n",
    )
    .unwrap();
    tfmigrate(dir.path())
        .args(["run", "--config", "infra"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "removed cloudflare_zone_settings_override.main",
        ))
        .stderr(predicate::str::contains("zone.tf"));

    assert_eq!(fs::read_to_string(dir.path().join("infra/zone.tf")).unwrap(), "");
}

#[test]
fn test_run_requires_an_input() {
    let dir = TempDir::new().unwrap();
    tfmigrate(dir.path()).arg("run").assert().failure();
}

#[test]
fn test_resource_flag_requires_config_dir() {
    let dir = workspace();
    tfmigrate(dir.path())
        .args(["run", "--state", "terraform.tfstate", "--resource", "dns_record"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--config"));
}

#[test]
fn test_state_file_extension_is_checked() {
    let dir = workspace();
    fs::write(dir.path().join("state.json"), STATE).unwrap();
    tfmigrate(dir.path())
        .args(["run", "--state", "state.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a state file"));
}

#[test]
fn test_malformed_state_fails_the_run() {
    let dir = workspace();
    fs::write(dir.path().join("terraform.tfstate"), "{\"resources\": [").unwrap();
    tfmigrate(dir.path())
        .args(["run", "--state", "terraform.tfstate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid state JSON"));
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    tfmigrate(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("COMMANDS:"))
        .stdout(predicate::str::contains("resources"));
}
