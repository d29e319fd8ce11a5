//! Command implementations for the yaml-params CLI
//!
//! Each command module handles the CLI interface and delegates to
//! yaml-params for the actual work.

use std::path::PathBuf;

use anyhow::{Context, Result};
use yaml_params::{ParamsOptions, YamlParams};

pub mod get;
pub mod init;
pub mod normalize;
pub mod set;
pub mod show;

/// Options for a parameter set in `dir` (or the current directory).
pub(crate) fn options(dir: Option<PathBuf>) -> ParamsOptions {
    match dir {
        Some(dir) => ParamsOptions::default().with_directory(dir),
        None => ParamsOptions::default(),
    }
}

/// Load an existing parameter file.
pub(crate) fn open(name: &str, dir: Option<PathBuf>) -> Result<YamlParams> {
    YamlParams::with_options(name, options(dir))
        .with_context(|| format!("Failed to load parameter set '{}'", name))
}
