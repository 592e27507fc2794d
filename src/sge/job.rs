use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::config::GlobalConfig;
use crate::sge::job_request::TaskDescriptor;

/// Effective template and qsub arguments for one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobArgs {
    pub template: String,
    pub qsub_args: String,
}

/// A BatchScript is a generated wrapper script that's submitted to SGE via qsub
///
/// The `.o` and `.e` paths are where qsub is asked to write stdout and stderr. They're only
/// referenced from the submission script and never created here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchScript {
    pub path: PathBuf,
    pub out_path: PathBuf,
    pub err_path: PathBuf,
}

/// Rendering context for a wrapper script
#[derive(Serialize)]
struct BatchScriptContext<'a> {
    template: &'a str,
    interpreter: &'a str,
    script: String,
}

/// Merge task overrides into the global configuration
///
/// Without `overwrite` a task template is added on a new line after the global template, and task
/// qsub arguments are appended after a single space. With `overwrite` they replace the global
/// values. Task templates are always literal text.
pub fn resolve_args(global: &GlobalConfig, task: &TaskDescriptor) -> JobArgs {
    let mut template = global.template.clone();
    let mut qsub_args = global.qsub_args.clone();

    if let Some(args) = &task.plugin_args {
        if let Some(extra) = &args.template {
            template = match args.overwrite {
                true => extra.clone(),
                false => format!("{template}\n{extra}"),
            };
        }
        if let Some(extra) = &args.qsub_args {
            qsub_args = match args.overwrite {
                true => extra.clone(),
                false => format!("{qsub_args} {extra}"),
            };
        }
    }

    JobArgs { template, qsub_args }
}

impl TaskDescriptor {
    /// Render and write the wrapper script next to the task script
    pub fn write_batch_script(&self, args: &JobArgs, interpreter: &str) -> io::Result<BatchScript> {
        let path = batch_script_path(&self.script);
        let content = render_batch_script(&args.template, interpreter, &self.script)?;
        info!("Writing batch script to {}", path.display());
        fs::write(&path, content)?;

        Ok(BatchScript {
            out_path: companion(&path, ".o"),
            err_path: companion(&path, ".e"),
            path,
        })
    }
}

/// `batchscript_<stem>.sh` in the directory of the task script
pub fn batch_script_path(script: &Path) -> PathBuf {
    let stem = script.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let dir = script.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("batchscript_{stem}.sh"))
}

/// Render wrapper content: template, one blank line, then the interpreter line
pub fn render_batch_script(template: &str, interpreter: &str, script: &Path) -> io::Result<String> {
    /// included wrapper template
    static BATCHSCRIPT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/batchscript.txt"));
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template("batchscript", BATCHSCRIPT).map_err(template_error)?;

    let context = BatchScriptContext {
        template: template.trim_end_matches('\n'),
        interpreter,
        script: script.display().to_string(),
    };
    tt.render("batchscript", &context).map_err(template_error)
}

pub(crate) fn template_error(err: tinytemplate::error::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err.to_string())
}

fn companion(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sge::job_request::NodeArgs;

    fn global() -> GlobalConfig {
        GlobalConfig::new(Some("#base"), Some("-q all.q".into()), None).unwrap()
    }

    #[test]
    fn no_overrides_uses_global() {
        let args = resolve_args(&global(), &TaskDescriptor::new("/w/a.py"));
        assert_eq!(args, JobArgs { template: "#base".into(), qsub_args: "-q all.q".into() });
    }

    #[test]
    fn overrides_append_without_overwrite() {
        let task = TaskDescriptor::new("/w/a.py").with_args(NodeArgs {
            template: Some("#extra".into()),
            qsub_args: Some("-l h_vmem=4G".into()),
            overwrite: false,
        });
        let args = resolve_args(&global(), &task);
        assert_eq!(args.template, "#base\n#extra");
        assert_eq!(args.qsub_args, "-q all.q -l h_vmem=4G");
    }

    #[test]
    fn overrides_replace_with_overwrite() {
        let task = TaskDescriptor::new("/w/a.py").with_args(NodeArgs {
            template: Some("#only".into()),
            qsub_args: Some("-q gpu.q".into()),
            overwrite: true,
        });
        let args = resolve_args(&global(), &task);
        assert_eq!(args.template, "#only");
        assert_eq!(args.qsub_args, "-q gpu.q");
    }

    #[test]
    fn overwrite_alone_changes_nothing() {
        let task = TaskDescriptor::new("/w/a.py").with_args(NodeArgs { overwrite: true, ..Default::default() });
        let args = resolve_args(&global(), &task);
        assert_eq!(args.template, "#base");
        assert_eq!(args.qsub_args, "-q all.q");
    }

    #[test]
    fn global_config_is_untouched() {
        let config = global();
        let task = TaskDescriptor::new("/w/a.py").with_args(NodeArgs { qsub_args: Some("-pe smp 4".into()), ..Default::default() });
        resolve_args(&config, &task);
        assert_eq!(config, global());
    }

    #[test]
    fn batch_script_path_strips_final_extension() {
        assert_eq!(batch_script_path(Path::new("/w/a.py")), PathBuf::from("/w/batchscript_a.sh"));
        assert_eq!(batch_script_path(Path::new("/w/pyscript_node.1.py")), PathBuf::from("/w/batchscript_pyscript_node.1.sh"));
    }

    #[test]
    fn batch_script_has_one_blank_line_before_command() {
        let content = render_batch_script("#!/bin/bash\n#$ -V\n", "python", Path::new("/w/a.py")).unwrap();
        assert_eq!(content, "#!/bin/bash\n#$ -V\n\npython /w/a.py\n");
    }

    #[test]
    fn template_text_is_not_escaped() {
        let content = render_batch_script("#$ -l h_rt=01:00:00 & <x>", "python3", Path::new("a.py")).unwrap();
        assert_eq!(content, "#$ -l h_rt=01:00:00 & <x>\n\npython3 a.py\n");
    }

    #[test]
    fn write_batch_script_derives_companions() {
        let dir = tempfile::tempdir().unwrap();
        let task = TaskDescriptor::new(dir.path().join("a.py"));
        let args = JobArgs { template: "#base".into(), qsub_args: String::new() };

        let batch = task.write_batch_script(&args, "python").unwrap();
        assert_eq!(batch.path, dir.path().join("batchscript_a.sh"));
        assert_eq!(batch.out_path, dir.path().join("batchscript_a.sh.o"));
        assert_eq!(batch.err_path, dir.path().join("batchscript_a.sh.e"));
        assert!(!batch.out_path.exists());
        assert!(!batch.err_path.exists());

        let content = fs::read_to_string(&batch.path).unwrap();
        assert_eq!(content, format!("#base\n\npython {}\n", dir.path().join("a.py").display()));
    }

    #[test]
    fn unwritable_directory_is_io_error() {
        let task = TaskDescriptor::new("/no/such/dir/a.py");
        let args = JobArgs { template: "#base".into(), qsub_args: String::new() };
        let err = task.write_batch_script(&args, "python").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
