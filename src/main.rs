use clap::Parser;
use tfmigrate::cli::{self, Args};

fn main() -> tfmigrate::Result<()> {
    cli::run(Args::parse())
}
