use crate::{
    cli::args::{ResourcesArgs, RunArgs},
    core::{
        build_pipeline_with_dry_run, build_state_pipeline, ConfigLoader, ConfigValidator,
        DefaultErrorReporter, ErrorReporter, MigrateConfig, MigrateError, TransformerRegistry,
    },
    resources,
    utils::files::{FsConfigProvider, FsSink, FsStateProvider, Sink, SourceProvider},
    Result,
};
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

/// Counters reported at the end of `tfmigrate run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub config_files: usize,
    pub config_changed: usize,
    pub config_failed: usize,
    pub state_changed: bool,
}

fn load_config(config_file: Option<&Path>) -> Result<MigrateConfig> {
    let config = match config_file {
        Some(path) => ConfigLoader::load_explicit(path)?,
        None => ConfigLoader::load_from_dir(Path::new("."))?,
    };
    Ok(config)
}

pub fn run(args: RunArgs) -> Result<RunSummary> {
    let mut config = load_config(args.config_file.as_deref())?;
    if !args.resource.is_empty() {
        config.migrate.resources = args.resource.clone();
    }
    config.migrate.dry_run |= args.dry_run;
    ConfigValidator::validate(&config, &resources::available_resources())?;

    let mut registry = TransformerRegistry::new();
    resources::register_from_factories(&mut registry, &config.migrate.resources);
    let registry = Arc::new(registry);
    tracing::info!(
        resource_types = ?registry.resource_types(),
        dry_run = config.migrate.dry_run,
        "starting migration"
    );

    let mut summary = RunSummary::default();
    let mut sink = FsSink::new(config.migrate.dry_run);

    if let Some(dir) = &args.config {
        migrate_config_dir(dir, &config, Arc::clone(&registry), &mut sink, &mut summary)?;
    }
    if let Some(state) = &args.state {
        summary.state_changed = migrate_state_file(state, &config, registry, &mut sink)?;
    }

    let verb = if config.migrate.dry_run {
        "would change"
    } else {
        "changed"
    };
    println!(
        "{} of {} configuration file(s) {}, {} failed; state {}",
        summary.config_changed,
        summary.config_files,
        verb,
        summary.config_failed,
        if summary.state_changed { verb } else { "unchanged" }
    );
    Ok(summary)
}

fn migrate_config_dir(
    dir: &Path,
    config: &MigrateConfig,
    registry: Arc<TransformerRegistry>,
    sink: &mut FsSink,
    summary: &mut RunSummary,
) -> Result<()> {
    let provider =
        FsConfigProvider::new(dir).with_extensions(config.migrate.config_extensions.clone());
    let pipeline = build_pipeline_with_dry_run(registry, config.migrate.dry_run);
    let reporter = DefaultErrorReporter::new();

    let units = provider.units().with_context(|| {
        format!("failed to collect configuration files from {}", dir.display())
    })?;
    for unit in units {
        summary.config_files += 1;
        let output = match pipeline.transform_unit(&unit.content, &unit.name) {
            Ok(output) => output,
            Err(err) => {
                reporter.report_error(&err);
                summary.config_failed += 1;
                continue;
            }
        };
        for warning in output.diagnostics.warnings() {
            reporter.report_warning(&warning.to_string(), Some(unit.name.clone()));
        }
        if !output.changed {
            tracing::debug!(file = %unit.name, "no changes");
            continue;
        }
        match sink.persist(&unit.name, &output.content) {
            Ok(()) => summary.config_changed += 1,
            Err(err) => {
                reporter.report_error(&MigrateError::from(err));
                summary.config_failed += 1;
            }
        }
    }
    Ok(())
}

fn migrate_state_file(
    path: &Path,
    config: &MigrateConfig,
    registry: Arc<TransformerRegistry>,
    sink: &mut FsSink,
) -> Result<bool> {
    let provider =
        FsStateProvider::new(path).with_extensions(config.migrate.state_extensions.clone());
    let pipeline = build_state_pipeline(registry);

    let mut changed = false;
    for unit in provider.units()? {
        let output = pipeline.transform_state(&unit.content, &unit.name)?;
        if output == unit.content {
            tracing::debug!(file = %unit.name, "state unchanged");
            continue;
        }
        sink.persist(&unit.name, &output)?;
        changed = true;
    }
    Ok(changed)
}

pub fn resources(args: ResourcesArgs) -> Result<()> {
    let config = load_config(args.config_file.as_deref())?;
    let selected = &config.migrate.resources;
    for (name, factory) in resources::factories() {
        let marker = if selected.is_empty() || selected.iter().any(|s| s == name) {
            "*"
        } else {
            " "
        };
        println!("{} {:<24} {}", marker, name, factory().resource_type());
    }
    Ok(())
}
