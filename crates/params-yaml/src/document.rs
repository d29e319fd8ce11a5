//! Decorated YAML document model.
//!
//! A decorated node carries the same data as a plain YAML value plus the
//! layout a human gave it: comments around mapping entries and sequence items,
//! block-vs-flow style for every container, and the quoting style and verbatim
//! text of every scalar.

use std::fmt;

/// Layout of a mapping or sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionStyle {
    /// One entry per line, indented under the parent.
    #[default]
    Block,

    /// Inline bracketed form: `[1, 2, 3]` or `{a: 1}`.
    Flow,
}

/// Quoting style of a scalar as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl ScalarStyle {
    pub fn is_quoted(self) -> bool {
        matches!(self, ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted)
    }

    pub fn is_block(self) -> bool {
        matches!(self, ScalarStyle::Literal | ScalarStyle::Folded)
    }
}

/// Typed content of a scalar.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScalarValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ScalarValue {
    /// Short type name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ScalarValue::Null => "null",
            ScalarValue::Bool(_) => "boolean",
            ScalarValue::Int(_) => "integer",
            ScalarValue::Float(_) => "float",
            ScalarValue::String(_) => "string",
        }
    }
}

/// Comments attached to a mapping entry or sequence item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comments {
    /// Full-line comments (`# text`) and blank lines (empty strings) that
    /// precede the entry, in source order.
    pub before: Vec<String>,

    /// End-of-line comment (`# text`) written after the entry.
    pub trailing: Option<String>,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.trailing.is_none()
    }

    /// Attach an end-of-line comment, adding the `# ` marker if missing.
    pub fn set_trailing(&mut self, text: impl AsRef<str>) {
        self.trailing = Some(comment_line(text.as_ref()));
    }
}

/// A scalar leaf.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct YamlScalar {
    value: ScalarValue,
    style: ScalarStyle,
    repr: Option<String>,
}

impl YamlScalar {
    /// A fresh plain scalar with no recorded representation.
    pub fn new(value: ScalarValue) -> Self {
        Self {
            value,
            style: ScalarStyle::Plain,
            repr: None,
        }
    }

    pub fn null() -> Self {
        Self::new(ScalarValue::Null)
    }

    pub(crate) fn parsed(value: ScalarValue, style: ScalarStyle, repr: Option<String>) -> Self {
        Self { value, style, repr }
    }

    pub fn with_style(mut self, style: ScalarStyle) -> Self {
        self.style = style;
        self
    }

    /// Record the verbatim text to emit for a plain scalar.
    pub fn with_repr(mut self, repr: impl Into<String>) -> Self {
        self.repr = Some(repr.into());
        self
    }

    pub fn value(&self) -> &ScalarValue {
        &self.value
    }

    pub fn into_value(self) -> ScalarValue {
        self.value
    }

    pub fn style(&self) -> ScalarStyle {
        self.style
    }

    /// Verbatim source text of a plain scalar, if it came from a parse.
    pub fn repr(&self) -> Option<&str> {
        self.repr.as_deref()
    }

    /// True for a float whose source text is kept for re-emission
    /// (e.g. `4.0` or `2.718281828`).
    pub fn is_preserved_float(&self) -> bool {
        matches!(self.value, ScalarValue::Float(_)) && self.repr.is_some()
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A key/value pair of a mapping, with the comments around it.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    pub key: String,
    pub key_style: ScalarStyle,
    pub value: YamlNode,
    pub comments: Comments,
}

impl MappingEntry {
    pub fn new(key: impl Into<String>, value: YamlNode) -> Self {
        Self {
            key: key.into(),
            key_style: ScalarStyle::Plain,
            value,
            comments: Comments::default(),
        }
    }

    pub fn with_comments(mut self, comments: Comments) -> Self {
        self.comments = comments;
        self
    }
}

/// An ordered mapping with string keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct YamlMapping {
    entries: Vec<MappingEntry>,
    style: CollectionStyle,
}

impl YamlMapping {
    /// An empty block mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty flow mapping.
    pub fn flow() -> Self {
        Self {
            entries: Vec::new(),
            style: CollectionStyle::Flow,
        }
    }

    pub fn style(&self) -> CollectionStyle {
        self.style
    }

    pub fn set_style(&mut self, style: CollectionStyle) {
        self.style = style;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        self.entry(key).map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut YamlNode> {
        self.entry_mut(key).map(|entry| &mut entry.value)
    }

    pub fn entry(&self, key: &str) -> Option<&MappingEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn entry_mut(&mut self, key: &str) -> Option<&mut MappingEntry> {
        self.entries.iter_mut().find(|entry| entry.key == key)
    }

    /// Set the value at `key`.
    ///
    /// An existing entry keeps its position, key style and comments; a new key
    /// is appended. Returns the replaced value.
    pub fn insert(&mut self, key: impl Into<String>, value: YamlNode) -> Option<YamlNode> {
        let key = key.into();
        match self.entry_mut(&key) {
            Some(entry) => Some(std::mem::replace(&mut entry.value, value)),
            None => {
                self.entries.push(MappingEntry::new(key, value));
                None
            }
        }
    }

    /// Append an entry, replacing the value of an existing entry with the same key.
    pub fn push_entry(&mut self, entry: MappingEntry) {
        match self.entry_mut(&entry.key) {
            Some(existing) => existing.value = entry.value,
            None => self.entries.push(entry),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<MappingEntry> {
        let index = self.entries.iter().position(|entry| entry.key == key)?;
        Some(self.entries.remove(index))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<MappingEntry> {
        self.entries
    }
}

/// An item of a sequence, with the comments around it.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceItem {
    pub value: YamlNode,
    pub comments: Comments,
}

impl SequenceItem {
    pub fn new(value: YamlNode) -> Self {
        Self {
            value,
            comments: Comments::default(),
        }
    }
}

/// An ordered sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct YamlSequence {
    items: Vec<SequenceItem>,
    style: CollectionStyle,
}

impl YamlSequence {
    /// An empty block sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty flow sequence.
    pub fn flow() -> Self {
        Self {
            items: Vec::new(),
            style: CollectionStyle::Flow,
        }
    }

    pub fn style(&self) -> CollectionStyle {
        self.style
    }

    pub fn set_style(&mut self, style: CollectionStyle) {
        self.style = style;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&YamlNode> {
        self.items.get(index).map(|item| &item.value)
    }

    pub fn push(&mut self, value: YamlNode) {
        self.items.push(SequenceItem::new(value));
    }

    pub fn push_item(&mut self, item: SequenceItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[SequenceItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<SequenceItem> {
        self.items
    }
}

/// A decorated YAML node.
#[derive(Debug, Clone, PartialEq)]
pub enum YamlNode {
    Mapping(YamlMapping),
    Sequence(YamlSequence),
    Scalar(YamlScalar),
}

impl Default for YamlNode {
    fn default() -> Self {
        YamlNode::Scalar(YamlScalar::null())
    }
}

impl YamlNode {
    /// Short type name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            YamlNode::Mapping(_) => "mapping",
            YamlNode::Sequence(_) => "sequence",
            YamlNode::Scalar(scalar) => scalar.value().kind_name(),
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, YamlNode::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, YamlNode::Sequence(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, YamlNode::Scalar(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, YamlNode::Scalar(scalar) if *scalar.value() == ScalarValue::Null)
    }

    pub fn as_mapping(&self) -> Option<&YamlMapping> {
        match self {
            YamlNode::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut YamlMapping> {
        match self {
            YamlNode::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&YamlSequence> {
        match self {
            YamlNode::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&YamlScalar> {
        match self {
            YamlNode::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Look up a key if this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        self.as_mapping().and_then(|mapping| mapping.get(key))
    }
}

impl From<YamlMapping> for YamlNode {
    fn from(mapping: YamlMapping) -> Self {
        YamlNode::Mapping(mapping)
    }
}

impl From<YamlSequence> for YamlNode {
    fn from(sequence: YamlSequence) -> Self {
        YamlNode::Sequence(sequence)
    }
}

impl From<YamlScalar> for YamlNode {
    fn from(scalar: YamlScalar) -> Self {
        YamlNode::Scalar(scalar)
    }
}

impl From<ScalarValue> for YamlNode {
    fn from(value: ScalarValue) -> Self {
        YamlNode::Scalar(YamlScalar::new(value))
    }
}

impl From<bool> for YamlNode {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value).into()
    }
}

impl From<i64> for YamlNode {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value).into()
    }
}

impl From<f64> for YamlNode {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value).into()
    }
}

impl From<&str> for YamlNode {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string()).into()
    }
}

impl From<String> for YamlNode {
    fn from(value: String) -> Self {
        ScalarValue::String(value).into()
    }
}

/// A whole YAML document: the root node plus the comments outside it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct YamlDocument {
    header: Vec<String>,
    root: YamlNode,
    footer: Vec<String>,
}

impl YamlDocument {
    pub fn new(root: impl Into<YamlNode>) -> Self {
        Self {
            header: Vec::new(),
            root: root.into(),
            footer: Vec::new(),
        }
    }

    pub(crate) fn from_parts(header: Vec<String>, root: YamlNode, footer: Vec<String>) -> Self {
        Self {
            header,
            root,
            footer,
        }
    }

    pub fn root(&self) -> &YamlNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut YamlNode {
        &mut self.root
    }

    pub fn into_root(self) -> YamlNode {
        self.root
    }

    /// Comment and blank lines written before the root node.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn set_header(&mut self, lines: Vec<String>) {
        self.header = lines;
    }

    /// Replace the header with `text`, one `# ` comment per line.
    pub fn set_start_comment(&mut self, text: &str) {
        self.header = text.lines().map(comment_line).collect();
    }

    /// Comment lines written after the last node.
    pub fn footer(&self) -> &[String] {
        &self.footer
    }

    pub fn set_footer(&mut self, lines: Vec<String>) {
        self.footer = lines;
    }

    /// Look up a top-level key if the root is a mapping.
    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        self.root.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut YamlNode> {
        self.root.as_mapping_mut().and_then(|mapping| mapping.get_mut(key))
    }
}

impl fmt::Display for YamlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::emit(self))
    }
}

fn comment_line(text: &str) -> String {
    let text = text.trim_end();
    if text.is_empty() || text.starts_with('#') {
        text.to_string()
    } else {
        format!("# {}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_entry_comments() {
        let mut mapping = YamlMapping::new();
        let mut entry = MappingEntry::new("a", YamlNode::from(1));
        entry.comments.set_trailing("first");
        mapping.push_entry(entry);

        let old = mapping.insert("a", YamlNode::from(2));

        assert_eq!(old, Some(YamlNode::from(1)));
        let entry = mapping.entry("a").unwrap();
        assert_eq!(entry.comments.trailing.as_deref(), Some("# first"));
        assert_eq!(entry.value, YamlNode::from(2));
    }

    #[test]
    fn test_insert_appends_new_keys_in_order() {
        let mut mapping = YamlMapping::new();
        mapping.insert("b", YamlNode::from(true));
        mapping.insert("a", YamlNode::from("x"));
        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_remove() {
        let mut mapping = YamlMapping::new();
        mapping.insert("a", YamlNode::from(1));
        mapping.insert("b", YamlNode::from(2));
        assert!(mapping.remove("a").is_some());
        assert!(mapping.remove("a").is_none());
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_preserved_float() {
        let scalar = YamlScalar::new(ScalarValue::Float(4.0)).with_repr("4.0");
        assert!(scalar.is_preserved_float());
        assert!(!YamlScalar::new(ScalarValue::Float(4.0)).is_preserved_float());
    }

    #[test]
    fn test_set_start_comment() {
        let mut doc = YamlDocument::new(YamlMapping::new());
        doc.set_start_comment("first line\n# second line");
        assert_eq!(doc.header(), ["# first line", "# second line"]);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(YamlNode::from(YamlMapping::new()).kind_name(), "mapping");
        assert_eq!(YamlNode::from(YamlSequence::flow()).kind_name(), "sequence");
        assert_eq!(YamlNode::from(1.5).kind_name(), "float");
        assert_eq!(YamlNode::default().kind_name(), "null");
    }
}
