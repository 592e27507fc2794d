use std::io;

use log::info;

use crate::config::GlobalConfig;
use crate::sge::job_request::GraphRequest;
use crate::sge::launch::{BashLauncher, Launcher};
use crate::sge::submit::SubmitScript;

/// Turns a task graph into SGE submissions
///
/// Submission happens in two phases: every script is written first, then the aggregate script is
/// launched once. Nothing is queued until the submission script describes the whole graph.
pub struct GraphSubmitter<L: Launcher = BashLauncher> {
    config: GlobalConfig,
    launcher: L,
    dry_run: bool,
}

impl GraphSubmitter<BashLauncher> {
    pub fn new(config: GlobalConfig) -> Self {
        GraphSubmitter::with_launcher(config, BashLauncher::default())
    }
}

impl<L: Launcher> GraphSubmitter<L> {
    pub fn with_launcher(config: GlobalConfig, launcher: L) -> Self {
        GraphSubmitter { config, launcher, dry_run: false }
    }

    /// Write scripts but never launch them
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn submit(&self, request: &GraphRequest) -> io::Result<SubmitScript> {
        let script = request.write_scripts(&self.config)?;

        match self.dry_run {
            true => {
                info!("--dry-run set, not running {}", script.path.display());
            }
            false => {
                self.launcher.launch(&script)?;
                info!("Submitted all jobs to queue");
            }
        }

        Ok(script)
    }
}
