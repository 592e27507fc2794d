use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Task index -> indices of the tasks it must wait for
///
/// Prerequisites are expected to point at tasks earlier in submission order, but nothing checks
/// this. A dangling index is rendered into a hold flag for a job that never gets submitted.
pub type DependencyMap = BTreeMap<usize, BTreeSet<usize>>;

/// A complete graph submission, usually deserialised from a JSON request file
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GraphRequest {
    pub tasks: Vec<TaskDescriptor>,
    #[serde(default)]
    pub dependencies: DependencyMap,
}

/// One node of the workflow graph
///
/// The position of a task in [GraphRequest::tasks] is its submission index, which also names the
/// SGE job (`job00000`, `job00001`, ...).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskDescriptor {
    /// Interpretable task script, run by the configured interpreter inside the wrapper
    pub script: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_args: Option<NodeArgs>,
}

/// Per-task overrides of the global configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeArgs {
    /// Literal template text, never read from disk
    pub template: Option<String>,
    pub qsub_args: Option<String>,
    /// Replace the global values instead of appending to them
    #[serde(default)]
    pub overwrite: bool,
}

impl TaskDescriptor {
    pub fn new(script: impl Into<PathBuf>) -> TaskDescriptor {
        TaskDescriptor { script: script.into(), plugin_args: None }
    }

    pub fn with_args(mut self, args: NodeArgs) -> TaskDescriptor {
        self.plugin_args = Some(args);
        self
    }
}
