use std::io;
use std::process::Command;

use log::info;

use crate::sge::submit::SubmitScript;

/// Runs a generated submission script
pub trait Launcher {
    fn launch(&self, script: &SubmitScript) -> io::Result<()>;
}

/// Runs `bash submit_jobs.sh` with the caller's environment
///
/// Spawn failures and non-zero exit codes come back as `io::Error`. qsub output isn't parsed.
#[derive(Debug, Clone)]
pub struct BashLauncher {
    pub shell: String,
}

impl Default for BashLauncher {
    fn default() -> Self {
        BashLauncher { shell: "bash".to_string() }
    }
}

impl Launcher for BashLauncher {
    fn launch(&self, script: &SubmitScript) -> io::Result<()> {
        let mut shell = Command::new(&self.shell);
        let cmd = shell.arg(&script.path);
        info!("Running submission script {}", script.path.display());
        info!("{:?}", &cmd);

        let status = cmd.status()?;
        match status.success() {
            true => Ok(()),
            false => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} {} exited with {status}", self.shell, script.path.display()),
            )),
        }
    }
}
