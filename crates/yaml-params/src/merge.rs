//! Plain-into-decorated merge.
//!
//! Reconciles an edited plain tree with the decorated tree it was loaded
//! from. The merge is additive: keys only present in the decorated tree are
//! left alone. Container decoration (entry comments, key style, mapping
//! layout) survives; lists are always re-laid out inline. A scalar leaf keeps
//! its quoting and source text only while its value is unchanged.

use params_yaml::{
    CollectionStyle, MappingEntry, ScalarValue, SequenceItem, YamlMapping, YamlNode, YamlScalar,
    YamlSequence,
};
use tracing::debug;

use crate::value::{ParamMap, ParamValue};

/// Merge a plain value into an optional decorated node.
///
/// `existing` is consumed; decoration that still applies is moved into the
/// result.
pub fn merge(plain: &ParamValue, existing: Option<YamlNode>) -> YamlNode {
    match (plain, existing) {
        (ParamValue::Map(map), Some(YamlNode::Mapping(mapping))) => {
            YamlNode::Mapping(merge_map(map, mapping))
        }
        (ParamValue::List(items), Some(YamlNode::Sequence(sequence))) => {
            YamlNode::Sequence(merge_list(items, sequence))
        }
        // Type mismatch, or nothing to merge into: start from an empty container.
        (ParamValue::Map(_) | ParamValue::List(_), mismatched) => {
            if let Some(node) = &mismatched {
                debug!(
                    expected = plain.kind_name(),
                    found = node.kind_name(),
                    "replacing decorated node of a different kind"
                );
            }
            merge(plain, empty_node_for(plain))
        }
        (scalar, Some(YamlNode::Scalar(current))) if same_scalar(scalar, current.value()) => {
            YamlNode::Scalar(current)
        }
        (scalar, _) => fresh_scalar(scalar),
    }
}

/// Merge a plain map into a decorated mapping, entry by entry.
pub fn merge_map(plain: &ParamMap, mut mapping: YamlMapping) -> YamlMapping {
    if mapping.is_empty() {
        // `{}` placeholders grow into one-key-per-line mappings.
        mapping.set_style(CollectionStyle::Block);
    }
    for (key, value) in plain {
        match mapping.entry_mut(key) {
            Some(entry) => {
                let current = std::mem::take(&mut entry.value);
                entry.value = merge(value, Some(current));
            }
            None => {
                let node = merge(value, empty_node_for(value));
                mapping.push_entry(MappingEntry::new(key.clone(), node));
            }
        }
    }
    mapping
}

/// Merge a plain list into a decorated sequence.
///
/// The result has exactly the plain list's length, is laid out in flow style
/// and merges item `i` against existing item `i` where there is one.
pub fn merge_list(plain: &[ParamValue], sequence: YamlSequence) -> YamlSequence {
    let mut existing = sequence.into_items().into_iter();
    let mut merged = YamlSequence::flow();
    for value in plain {
        match existing.next() {
            Some(SequenceItem { value: current, comments }) => merged.push_item(SequenceItem {
                value: merge(value, Some(current)),
                comments,
            }),
            None => merged.push(merge(value, empty_node_for(value))),
        }
    }
    merged
}

/// The empty decorated container a plain value is merged into when there is
/// no existing node: a block mapping for maps, a flow sequence for lists.
/// Scalars have no container and yield `None`.
pub fn empty_node_for(plain: &ParamValue) -> Option<YamlNode> {
    match plain {
        ParamValue::Map(_) => Some(YamlMapping::new().into()),
        ParamValue::List(_) => Some(YamlSequence::flow().into()),
        _ => None,
    }
}

fn same_scalar(plain: &ParamValue, decorated: &ScalarValue) -> bool {
    match (plain, decorated) {
        (ParamValue::Null, ScalarValue::Null) => true,
        (ParamValue::Bool(a), ScalarValue::Bool(b)) => a == b,
        (ParamValue::Int(a), ScalarValue::Int(b)) => a == b,
        (ParamValue::Float(a), ScalarValue::Float(b)) => a.total_cmp(b).is_eq(),
        (ParamValue::String(a), ScalarValue::String(b)) => a == b,
        _ => false,
    }
}

fn fresh_scalar(plain: &ParamValue) -> YamlNode {
    match plain {
        ParamValue::Null => YamlScalar::null().into(),
        ParamValue::Bool(b) => YamlNode::from(*b),
        ParamValue::Int(i) => YamlNode::from(*i),
        ParamValue::Float(f) => YamlNode::from(*f),
        ParamValue::String(s) => YamlNode::from(s.as_str()),
        ParamValue::Map(_) | ParamValue::List(_) => merge(plain, None),
    }
}
