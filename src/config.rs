//! Global submission configuration, built once and shared read-only by every task

use std::fs;
use std::io;
use std::path::Path;

use log::{info, warn};

/// included default SGE directive header
static DEFAULT_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/header.txt"));

/// Interpreter used to run task scripts when none is configured
pub static DEFAULT_INTERPRETER: &str = "python";

/// Template header, extra qsub arguments, and the interpreter written into every wrapper script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
    pub template: String,
    pub qsub_args: String,
    pub interpreter: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig {
            template: DEFAULT_TEMPLATE.to_string(),
            qsub_args: String::new(),
            interpreter: DEFAULT_INTERPRETER.to_string(),
        }
    }
}

impl GlobalConfig {
    /// Build a configuration from optional overrides
    ///
    /// A template that names an existing file is read once here and its full text becomes the
    /// template. Anything else is used as literal template text.
    pub fn new(template: Option<&str>, qsub_args: Option<String>, interpreter: Option<String>) -> io::Result<GlobalConfig> {
        let defaults = GlobalConfig::default();
        let template = match template {
            Some(value) => resolve_template(value)?,
            None => defaults.template,
        };

        Ok(GlobalConfig {
            template,
            qsub_args: qsub_args.unwrap_or(defaults.qsub_args),
            interpreter: interpreter.unwrap_or(defaults.interpreter),
        })
    }
}

fn resolve_template(value: &str) -> io::Result<String> {
    let path = Path::new(value);
    if path.is_file() {
        info!("Reading template from {}", path.display());
        fs::read_to_string(path)
    } else {
        // single-line values that look like paths are probably typos
        if !value.contains('\n') && value.contains('/') && !value.starts_with('#') {
            warn!("Template {value} is not a file, using it as literal text");
        }
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_template_is_sge_header() {
        let config = GlobalConfig::default();
        assert!(config.template.starts_with("#!/bin/bash\n"));
        assert!(config.template.contains("#$ -V"));
        assert!(config.template.contains("#$ -S /bin/bash"));
        assert_eq!(config.qsub_args, "");
        assert_eq!(config.interpreter, "python");
    }

    #[test]
    fn template_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "#$ -q short.q").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = GlobalConfig::new(Some(&path), None, None).unwrap();
        assert_eq!(config.template, "#$ -q short.q\n");
    }

    #[test]
    fn missing_template_file_is_literal_text() {
        let config = GlobalConfig::new(Some("/no/such/template.sh"), Some("-q long".into()), Some("python3".into())).unwrap();
        assert_eq!(config.template, "/no/such/template.sh");
        assert_eq!(config.qsub_args, "-q long");
        assert_eq!(config.interpreter, "python3");
    }

    #[test]
    fn instances_do_not_share_state() {
        let custom = GlobalConfig::new(Some("#custom"), None, None).unwrap();
        let default = GlobalConfig::new(None, None, None).unwrap();
        assert_eq!(custom.template, "#custom");
        assert_eq!(default, GlobalConfig::default());
    }
}
