//! Get command implementation

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use yaml_params::{merge, ParamValue};

pub fn execute(name: &str, key: &str, dir: Option<PathBuf>, json: bool) -> Result<()> {
    let params = super::open(name, dir)?;
    let value = params
        .get(key)
        .ok_or_else(|| anyhow!("No parameter '{}' in {}", key, params.file_path().display()))?;
    print!("{}", render(value, json)?);
    Ok(())
}

/// Text of a single value, as YAML or pretty JSON.
pub(crate) fn render(value: &ParamValue, json: bool) -> Result<String> {
    if json {
        Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
    } else {
        Ok(params_yaml::emit_node(&merge(value, None)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_yaml() {
        let value = ParamValue::from_iter([
            ("myint", ParamValue::from(72)),
            ("myfloatarray", ParamValue::from(vec![4.0, 5.0])),
        ]);
        assert_eq!(
            render(&value, false).unwrap(),
            "myint: 72\nmyfloatarray: [4.0, 5.0]\n"
        );
        assert_eq!(render(&ParamValue::from(42), false).unwrap(), "42\n");
    }

    #[test]
    fn test_render_json() {
        let value = ParamValue::from(vec!["a", "b"]);
        assert_eq!(render(&value, true).unwrap(), "[\n  \"a\",\n  \"b\"\n]\n");
    }
}
