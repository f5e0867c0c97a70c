use clap::Parser;
use inventory_collector_config::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;

/// Collects software inventory from exporters and a Juju controller into tarballs.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML config file.
    #[arg(
        short,
        long,
        env = "SOFTWARE_INVENTORY_COLLECTOR_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,

    /// Connect to the Juju controller, then exit without collecting anything.
    #[arg(short, long)]
    pub dry_run: bool,

    /// Enable debug logging. `RUST_LOG` takes precedence.
    #[arg(short, long)]
    pub verbose: bool,
}
