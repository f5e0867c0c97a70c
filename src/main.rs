use clap::Parser;
use color_eyre::Result;
use software_inventory_collector::{
    init_errors,
    init_logging,
    App,
    Args,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_errors()?;
    init_logging(args.verbose)?;
    App::new(args).run().await
}
