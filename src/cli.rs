use std::path::PathBuf;

use clap::Parser;

/// Submit a task graph to Sun Grid Engine with qsub hold dependencies
#[derive(Debug, Parser)]
#[command(name = "sgegraph", version, about, long_about = None)]
pub struct Args {
    /// Path to a JSON graph request (tasks and dependencies)
    #[arg(short, long, value_name = "PATH")]
    pub request: PathBuf,

    /// Directive header for every batch script, as literal text or a path to a file
    #[arg(short, long, value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// Extra arguments added to every qsub call, e.g. "-q all.q -l h_vmem=4G"
    #[arg(short, long, value_name = "ARGS", allow_hyphen_values = true)]
    pub qsub_args: Option<String>,

    /// Program used to run each task script
    #[arg(short, long, value_name = "PROGRAM")]
    pub interpreter: Option<String>,

    /// Write batch scripts and submit_jobs.sh without running them
    #[arg(long)]
    pub dry_run: bool,
}
