use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::config::GlobalConfig;
use crate::sge::job::{resolve_args, template_error, BatchScript};
use crate::sge::job_request::{DependencyMap, GraphRequest};

/// Name of the aggregate submission script, written next to the first task script
pub static SUBMIT_SCRIPT: &str = "submit_jobs.sh";

static SHEBANG: &str = "#!/usr/bin/env bash\n";

/// A SubmitScript is the path to the aggregate script that runs qsub once per task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitScript {
    pub path: PathBuf,
}

/// Rendering context for one qsub line
#[derive(Serialize)]
struct SubmitLineContext<'a> {
    job_name: String,
    options: String,
    batch_script: &'a str,
}

/// SGE job name for a submission index, e.g. `job00042`
pub fn job_name(index: usize) -> String {
    format!("job{index:05}")
}

/// `-hold_jid job00002,job00005` for the prerequisites of a task, if it has any
pub fn hold_flag(prerequisites: Option<&BTreeSet<usize>>) -> Option<String> {
    let prerequisites = prerequisites?;
    let names: Vec<String> = prerequisites.iter().map(|&i| job_name(i)).collect();
    match names.is_empty() {
        true => None,
        false => Some(format!("-hold_jid {}", names.join(","))),
    }
}

/// Explicit `-o` and `-e` flags, unless the global qsub arguments already set them
///
/// This is a literal substring check for `-o ` and `-e ` on the *global* arguments only. Task level
/// qsub arguments are not inspected, so a task that sets its own `-o` still gets the default one.
pub fn output_flags(global_qsub_args: &str, batch: &BatchScript) -> (Option<String>, Option<String>) {
    let out = match global_qsub_args.contains("-o ") {
        true => None,
        false => Some(format!("-o {}", batch.out_path.display())),
    };
    let err = match global_qsub_args.contains("-e ") {
        true => None,
        false => Some(format!("-e {}", batch.err_path.display())),
    };
    (out, err)
}

/// Render one `jobNNNNN=$(qsub ...)` line
///
/// Option order is stdout, stderr, extra qsub arguments, then the hold flag. Empty options are
/// dropped so the line never contains doubled spaces.
pub fn render_submit_line(index: usize, batch: &BatchScript, qsub_args: &str, global_qsub_args: &str, hold: Option<&str>) -> io::Result<String> {
    /// included qsub line template
    static SUBMIT_LINE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/submit_line.txt"));
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template("submit_line", SUBMIT_LINE).map_err(template_error)?;

    let (out, err) = output_flags(global_qsub_args, batch);
    let options: Vec<&str> = [out.as_deref(), err.as_deref(), Some(qsub_args.trim()), hold]
        .into_iter()
        .flatten()
        .filter(|option| !option.is_empty())
        .collect();

    let path = batch.path.display().to_string();
    let context = SubmitLineContext {
        job_name: job_name(index),
        options: options.join(" "),
        batch_script: &path,
    };
    tt.render("submit_line", &context).map_err(template_error)
}

impl GraphRequest {
    /// Generate every wrapper script and the aggregate submission script
    ///
    /// Nothing is submitted here. Files written before a failure stay on disk.
    pub fn write_scripts(&self, config: &GlobalConfig) -> io::Result<SubmitScript> {
        let first = self.tasks.first().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "graph request has no tasks")
        })?;
        let batch_dir = first.script.parent().unwrap_or_else(|| Path::new(""));
        let path = batch_dir.join(SUBMIT_SCRIPT);
        info!("Writing {} tasks to submission script {}", self.tasks.len(), path.display());
        warn_dangling(&self.dependencies, self.tasks.len());

        let mut file = File::create(&path)?;
        file.write_all(SHEBANG.as_bytes())?;

        for (index, task) in self.tasks.iter().enumerate() {
            let args = resolve_args(config, task);
            let batch = task.write_batch_script(&args, &config.interpreter)?;
            let hold = hold_flag(self.dependencies.get(&index));
            if hold.is_none() && self.dependencies.contains_key(&index) {
                warn!("Task {index} has an empty dependency list, submitting without a hold");
            }
            let line = render_submit_line(index, &batch, &args.qsub_args, &config.qsub_args, hold.as_deref())?;
            debug!("{}", line.trim_end());
            file.write_all(line.as_bytes())?;
        }

        Ok(SubmitScript { path })
    }
}

/// Log prerequisites that point at tasks which won't be submitted before their dependants
fn warn_dangling(dependencies: &DependencyMap, n_tasks: usize) {
    for (task, prerequisites) in dependencies {
        for prerequisite in prerequisites {
            if *prerequisite >= n_tasks || prerequisite >= task {
                warn!("Task {task} waits on {}, which isn't submitted before it", job_name(*prerequisite));
            }
        }
    }
}
