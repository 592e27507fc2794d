//! Generate SGE wrapper scripts for a task graph, wire dependencies with `-hold_jid`, and submit
//! everything through one `submit_jobs.sh`

use anyhow::{Context, Result};
use log::info;

use crate::cli::Args;
use crate::config::GlobalConfig;
use crate::request::message::Message;
use crate::request::schema::load_schema;
use crate::sge::submit::SubmitScript;
use crate::sge::submitter::GraphSubmitter;

pub mod cli;
pub mod config;
pub mod request;
pub mod sge;

/// Read a request, render every script and submit (unless `--dry-run` is set)
pub fn run(args: Args) -> Result<SubmitScript> {
    let config = GlobalConfig::new(args.template.as_deref(), args.qsub_args, args.interpreter)
        .context("Reading template")?;

    let message = Message { path: args.request.clone(), compiled_schema: load_schema()? };
    let request = message
        .read()
        .with_context(|| format!("Loading graph request {}", args.request.display()))?;
    info!("Loaded {} tasks with {} dependency entries", request.tasks.len(), request.dependencies.len());

    let submitter = GraphSubmitter::new(config).dry_run(args.dry_run);
    let script = submitter.submit(&request).context("Submitting graph")?;
    Ok(script)
}
