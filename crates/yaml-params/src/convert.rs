//! Decorated-to-plain conversion.

use params_yaml::{ScalarValue, YamlNode, YamlScalar};

use crate::value::{ParamMap, ParamValue};

/// Strip all decoration from a node, producing plain data.
///
/// Keys and their order are kept; comments, quoting, layout and preserved
/// scalar text are dropped.
pub fn to_plain(node: &YamlNode) -> ParamValue {
    match node {
        YamlNode::Mapping(mapping) => ParamValue::Map(
            mapping
                .entries()
                .iter()
                .map(|entry| (entry.key.clone(), to_plain(&entry.value)))
                .collect::<ParamMap>(),
        ),
        YamlNode::Sequence(sequence) => ParamValue::List(
            sequence
                .items()
                .iter()
                .map(|item| to_plain(&item.value))
                .collect(),
        ),
        YamlNode::Scalar(scalar) => scalar_to_plain(scalar),
    }
}

fn scalar_to_plain(scalar: &YamlScalar) -> ParamValue {
    match scalar.value() {
        ScalarValue::Null => ParamValue::Null,
        ScalarValue::Bool(b) => ParamValue::Bool(*b),
        ScalarValue::Int(i) => ParamValue::Int(*i),
        // Preserved floats (`4.0` with its source text) reduce to the number.
        ScalarValue::Float(f) => ParamValue::Float(*f),
        ScalarValue::String(s) => ParamValue::String(s.clone()),
    }
}
