//! Init command implementation

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use yaml_params::YamlParams;

pub fn execute(name: &str, dir: Option<PathBuf>, force: bool) -> Result<()> {
    let path = create(name, dir, force)?;
    println!("Created {}", path.display());
    Ok(())
}

/// Write a default document for `name`, returning its path.
pub(crate) fn create(name: &str, dir: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let mut params = YamlParams::with_options(name, super::options(dir).with_load_file(false))
        .with_context(|| format!("Invalid parameter set '{}'", name))?;
    let path = params.file_path().to_path_buf();
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    params
        .save_params(None)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "initialized parameter file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = create("run", Some(dir.path().to_path_buf()), false).unwrap();
        assert_eq!(path, dir.path().join("run.yaml"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Parameters (params) for YamlParams object 'run'.\n"));
        assert!(text.ends_with("params: {}\n"));

        let err = create("run", Some(dir.path().to_path_buf()), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(create("run", Some(dir.path().to_path_buf()), true).is_ok());
    }
}
