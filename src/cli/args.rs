use clap::{ArgGroup, Args};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
#[command(group(
    ArgGroup::new("inputs")
        .args(["config", "state"])
        .required(true)
        .multiple(true)
))]
pub struct RunArgs {
    /// Directory of configuration files to migrate in place
    #[arg(long, value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// State file to migrate in place
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Comma separated resources to migrate (default: all)
    #[arg(
        long,
        value_name = "NAMES",
        value_delimiter = ',',
        requires = "config"
    )]
    pub resource: Vec<String>,

    /// Compute the migration without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Read settings from this file instead of ./tfmigrate.toml
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ResourcesArgs {
    /// Read settings from this file instead of ./tfmigrate.toml
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}
