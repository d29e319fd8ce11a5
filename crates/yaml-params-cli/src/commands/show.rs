//! Show command implementation

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(name: &str, dir: Option<PathBuf>) -> Result<()> {
    let mut params = super::open(name, dir)?;
    print!("{}", params.dump_params_text());
    Ok(())
}
