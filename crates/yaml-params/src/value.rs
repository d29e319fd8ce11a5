//! Plain parameter values.
//!
//! A `ParamValue` is pure data: no comments, no quoting, no layout. This is
//! the tree callers read and edit; formatting lives in the decorated document
//! and is reconciled on capture.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ordered string-keyed map of parameters.
pub type ParamMap = IndexMap<String, ParamValue>;

/// A plain parameter value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Map(ParamMap),
    List(Vec<ParamValue>),
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    #[default]
    Null,
}

impl ParamValue {
    /// Short name of the value's kind, for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParamValue::Map(_) => "map",
            ParamValue::List(_) => "list",
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::String(_) => "string",
            ParamValue::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    pub fn as_map(&self) -> Option<&ParamMap> {
        match self {
            ParamValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut ParamMap> {
        match self {
            ParamValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value as a float; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(f) => Some(*f),
            ParamValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key if this is a map.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Follow a dotted path (`mydict.myint`). Numeric segments index lists.
    pub fn get_path(&self, path: &str) -> Option<&ParamValue> {
        path.split('.').try_fold(self, |node, segment| match node {
            ParamValue::Map(map) => map.get(segment),
            ParamValue::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

/// Set the value at a dotted path, creating intermediate maps as needed.
///
/// Returns the previous value at that path, if any. Fails if the path is
/// empty or runs through a value that is not a map.
pub fn set_path(map: &mut ParamMap, path: &str, value: ParamValue) -> Result<Option<ParamValue>> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(Error::invalid_argument(
            "path",
            format!("'{}' has an empty segment", path),
        ));
    }
    let Some((last, parents)) = segments.split_last() else {
        return Err(Error::invalid_argument("path", "must not be empty"));
    };

    let mut current = map;
    for (depth, segment) in parents.iter().enumerate() {
        let child = current
            .entry((*segment).to_string())
            .or_insert_with(|| ParamValue::Map(ParamMap::new()));
        current = match child {
            ParamValue::Map(inner) => inner,
            other => {
                return Err(Error::invalid_argument(
                    "path",
                    format!(
                        "'{}' is a {}, not a map",
                        segments[..=depth].join("."),
                        other.kind_name()
                    ),
                ));
            }
        };
    }
    Ok(current.insert((*last).to_string(), value))
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::Int(i64::from(i))
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        ParamValue::Float(f)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<ParamMap> for ParamValue {
    fn from(map: ParamMap) -> Self {
        ParamValue::Map(map)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParamValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ParamValue::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParamValue {
        ParamValue::from_iter([
            ("myint", ParamValue::from(42)),
            ("mylist", ParamValue::from(vec![1.5, 2.5])),
            (
                "mydict",
                ParamValue::from_iter([("mystring", "this is another string")]),
            ),
        ])
    }

    #[test]
    fn test_get_path() {
        let value = sample();
        assert_eq!(value.get_path("myint"), Some(&ParamValue::Int(42)));
        assert_eq!(
            value.get_path("mydict.mystring").and_then(ParamValue::as_str),
            Some("this is another string")
        );
        assert_eq!(value.get_path("mylist.1"), Some(&ParamValue::Float(2.5)));
        assert_eq!(value.get_path("mylist.7"), None);
        assert_eq!(value.get_path("myint.deeper"), None);
    }

    #[test]
    fn test_set_path_creates_maps() {
        let mut map = ParamMap::new();
        let old = set_path(&mut map, "a.b.c", ParamValue::from(true)).unwrap();
        assert_eq!(old, None);
        assert_eq!(
            ParamValue::Map(map.clone()).get_path("a.b.c"),
            Some(&ParamValue::Bool(true))
        );

        let old = set_path(&mut map, "a.b.c", ParamValue::from(false)).unwrap();
        assert_eq!(old, Some(ParamValue::Bool(true)));
    }

    #[test]
    fn test_set_path_through_scalar_fails() {
        let mut map = ParamMap::new();
        map.insert("a".into(), ParamValue::from(1));
        let err = set_path(&mut map, "a.b", ParamValue::Null).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument `path`: 'a' is a int, not a map"
        );
        assert!(set_path(&mut map, "a..b", ParamValue::Null).is_err());
        assert!(set_path(&mut map, "", ParamValue::Null).is_err());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ParamValue::from(3).as_f64(), Some(3.0));
        assert_eq!(ParamValue::from(3.5).as_i64(), None);
        assert_eq!(ParamValue::from(None::<i64>), ParamValue::Null);
        assert_eq!(ParamValue::default().kind_name(), "null");
    }

    #[test]
    fn test_serde_untagged() {
        let value = sample();
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(
            json,
            r#"{"myint":42,"mylist":[1.5,2.5],"mydict":{"mystring":"this is another string"}}"#
        );
        let back: ParamValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
        let null: ParamValue = serde_json::from_str("null").unwrap();
        assert_eq!(null, ParamValue::Null);
    }
}
