use clap::Parser;
use log::info;

use sgegraph::cli::Args;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    info!("sgegraph starting up");

    let args = Args::parse();
    let script = sgegraph::run(args)?;
    info!("Submission script: {}", script.path.display());
    Ok(())
}
