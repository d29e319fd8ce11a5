//! Typed view of a document's `info` section.

use params_yaml::scalar::format_float;
use params_yaml::{ScalarValue, YamlNode};
use serde::Serialize;

/// Summary fields describing a parameter set.
///
/// Missing or null fields are `None`; non-string scalars are rendered as they
/// appear in the file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DocumentInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
}

impl DocumentInfo {
    /// Read the fields from an `info` mapping node.
    pub fn from_node(node: &YamlNode) -> Self {
        let field = |key: &str| node.get(key).and_then(scalar_text);
        Self {
            name: field("name"),
            version: field("version"),
            date: field("date"),
            author: field("author"),
            description: field("description"),
        }
    }
}

fn scalar_text(node: &YamlNode) -> Option<String> {
    let scalar = node.as_scalar()?;
    match scalar.value() {
        ScalarValue::Null => None,
        ScalarValue::String(s) => Some(s.clone()),
        ScalarValue::Bool(b) => Some(b.to_string()),
        ScalarValue::Int(i) => Some(scalar.repr().map_or_else(|| i.to_string(), str::to_string)),
        ScalarValue::Float(f) => Some(scalar.repr().map_or_else(|| format_float(*f), str::to_string)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use params_yaml::parse;

    #[test]
    fn test_from_node() {
        let doc = parse(
            "info:\n  name: \"my_name\"\n  version: 1.0\n  author:\n  extra: [1]\n",
        )
        .unwrap();
        let info = DocumentInfo::from_node(doc.get("info").unwrap());
        assert_eq!(
            info,
            DocumentInfo {
                name: Some("my_name".into()),
                version: Some("1.0".into()),
                ..DocumentInfo::default()
            }
        );
    }

    #[test]
    fn test_non_mapping_info_is_empty() {
        let doc = parse("info: [a, b]\n").unwrap();
        assert_eq!(
            DocumentInfo::from_node(doc.get("info").unwrap()),
            DocumentInfo::default()
        );
    }
}
