//! Set command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use yaml_params::{to_plain, ParamValue};

pub fn execute(name: &str, key: &str, value: &str, dir: Option<PathBuf>) -> Result<()> {
    let mut params = super::open(name, dir)?;
    let previous = params.set(key, parse_value(value))?;
    params
        .save_params(None)
        .with_context(|| format!("Failed to write {}", params.file_path().display()))?;
    info!(key, replaced = previous.is_some(), "updated parameter");
    Ok(())
}

/// Read a command-line value as YAML; text that is not valid YAML is kept
/// as a string.
pub(crate) fn parse_value(text: &str) -> ParamValue {
    match params_yaml::parse(text) {
        Ok(document) => to_plain(document.root()),
        Err(_) => ParamValue::String(text.to_string()),
    }
}
