//! Normalize command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};

pub fn execute(name: &str, dir: Option<PathBuf>) -> Result<()> {
    let mut params = super::open(name, dir)?;
    params
        .save_params(None)
        .with_context(|| format!("Failed to write {}", params.file_path().display()))?;
    println!("Normalized {}", params.file_path().display());
    Ok(())
}
