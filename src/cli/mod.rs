pub mod args;
pub mod commands;

pub use args::{ResourcesArgs, RunArgs};
use crate::core::config::loader::CONFIG_FILE_NAME;
use crate::logging::{self, config::LoggingConfig, LoggingGuard};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
COMMANDS:\n{subcommands}\n";

#[derive(Parser)]
#[command(name = "tfmigrate")]
#[command(version = crate::VERSION)]
#[command(about = "Migrate Terraform configuration and state to a new provider schema")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: preview with --dry-run, then run again to rewrite files in place."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(
        about = "Migrate configuration files and/or a state file",
        long_about = "Run rewrites every configuration file under --config and the state document given by --state. Files whose content does not change are left untouched.",
        after_help = "Example:\n    tfmigrate run --config ./infra --state ./terraform.tfstate --dry-run"
    )]
    Run(RunArgs),
    #[command(
        about = "List the resources that can be migrated",
        after_help = "Example:\n    tfmigrate resources"
    )]
    Resources(ResourcesArgs),
}

impl Command {
    fn config_file(&self) -> Option<&Path> {
        match self {
            Command::Run(args) => args.config_file.as_deref(),
            Command::Resources(args) => args.config_file.as_deref(),
        }
    }

    fn verbose(&self) -> bool {
        match self {
            Command::Run(args) => args.verbose,
            Command::Resources(_) => false,
        }
    }
}

pub fn run(args: Args) -> crate::Result<()> {
    let _guard = init_logging(&args.command)?;
    match args.command {
        Command::Run(run_args) => commands::run(run_args).map(|_| ()),
        Command::Resources(resources_args) => commands::resources(resources_args),
    }
}

fn init_logging(command: &Command) -> crate::Result<LoggingGuard> {
    let config_file = command
        .config_file()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    let config = LoggingConfig::load(Some(&config_file), command.verbose())?;
    let base_dir = config_file.parent().filter(|dir| !dir.as_os_str().is_empty());
    logging::init(&config, base_dir)
}
