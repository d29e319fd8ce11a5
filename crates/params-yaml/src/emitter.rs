//! Serialization of decorated documents back to YAML text.
//!
//! Layout rules:
//! - two spaces of indentation per nesting level
//! - block mappings one key per line, block sequences as `- item` lines
//!   indented under their key
//! - flow and empty containers inline (`[1, 2, 3]`, `{a: 1}`, `[]`, `{}`)
//! - scalars in their recorded style; fresh strings plain unless quoting is
//!   needed to read them back unchanged
//! - comments at the indentation of the entry they belong to, end-of-line
//!   comments two spaces after the value
//! - block keys too long for `key: value` use the explicit `? key` form

use crate::document::{
    CollectionStyle, MappingEntry, ScalarStyle, ScalarValue, YamlDocument, YamlMapping, YamlNode,
    YamlScalar, YamlSequence,
};
use crate::scalar::{
    breaks_plain_syntax, double_quoted, format_float, key_needs_quotes, needs_escapes, needs_quotes,
    single_quoted,
};

const INDENT: usize = 2;

/// Longest key readers accept before the `:` of a block mapping entry.
const MAX_IMPLICIT_KEY: usize = 1024;

/// Serialize a document, including its header and footer comments.
///
/// # Example
///
/// ```rust
/// use params_yaml::{emit, parse};
///
/// let text = "# settings\nsizes: [1, 2, 3]\nname: 'demo'  # quoted\n";
/// assert_eq!(emit(&parse(text).unwrap()), text);
/// ```
pub fn emit(document: &YamlDocument) -> String {
    let mut emitter = Emitter::default();
    emitter.comment_lines(document.header(), 0);
    emitter.root(document.root());
    emitter.comment_lines(document.footer(), 0);
    emitter.out
}

/// Serialize a single node as a standalone document.
pub fn emit_node(node: &YamlNode) -> String {
    let mut emitter = Emitter::default();
    emitter.root(node);
    emitter.out
}

#[derive(Default)]
struct Emitter {
    out: String,
}

impl Emitter {
    fn indent(&mut self, width: usize) {
        self.out.extend(std::iter::repeat_n(' ', width));
    }

    fn comment_lines(&mut self, lines: &[String], indent: usize) {
        for line in lines {
            if !line.is_empty() {
                self.indent(indent);
                self.out.push_str(line);
            }
            self.out.push('\n');
        }
    }

    fn trailing(&mut self, comment: Option<&str>) {
        if let Some(comment) = comment {
            self.out.push_str("  ");
            self.out.push_str(comment);
        }
    }

    fn root(&mut self, node: &YamlNode) {
        match node {
            YamlNode::Mapping(mapping) if is_block_mapping(mapping) => {
                self.block_mapping(mapping, 0, false);
            }
            YamlNode::Sequence(sequence) if is_block_sequence(sequence) => {
                self.block_sequence(sequence, 0);
            }
            YamlNode::Scalar(scalar) if block_scalar_text(scalar).is_some() => {
                self.out.push_str("---");
                self.value_after_indicator(node, 0, None);
            }
            other => {
                let text = inline(other, false);
                self.out.push_str(if text.is_empty() { "null" } else { &text });
                self.out.push('\n');
            }
        }
    }

    /// Entries of a block mapping. With `first_inline`, the first key goes
    /// on the current line (after a `- ` sequence indicator).
    fn block_mapping(&mut self, mapping: &YamlMapping, indent: usize, first_inline: bool) {
        for (index, entry) in mapping.entries().iter().enumerate() {
            if !(first_inline && index == 0) {
                self.comment_lines(&entry.comments.before, indent);
                self.indent(indent);
            }
            let key = key_text(entry, false);
            let trailing = entry.comments.trailing.as_deref();
            if key.chars().count() > MAX_IMPLICIT_KEY {
                self.out.push_str("? ");
                self.out.push_str(&key);
                self.trailing(trailing);
                self.out.push('\n');
                self.indent(indent);
                self.out.push(':');
                self.value_after_indicator(&entry.value, indent, None);
            } else {
                self.out.push_str(&key);
                self.out.push(':');
                self.value_after_indicator(&entry.value, indent, trailing);
            }
        }
    }

    fn block_sequence(&mut self, sequence: &YamlSequence, indent: usize) {
        for item in sequence.items() {
            self.comment_lines(&item.comments.before, indent);
            match &item.value {
                YamlNode::Mapping(mapping) if is_block_mapping(mapping) => {
                    if let Some(comment) = item.comments.trailing.as_deref() {
                        // `- # comment` keeps the whole mapping below the indicator.
                        self.indent(indent);
                        self.out.push('-');
                        self.trailing(Some(comment));
                        self.out.push('\n');
                        self.block_mapping(mapping, indent + INDENT, false);
                        continue;
                    }
                    if let Some(first) = mapping.entries().first() {
                        self.comment_lines(&first.comments.before, indent);
                    }
                    self.indent(indent);
                    self.out.push_str("- ");
                    self.block_mapping(mapping, indent + INDENT, true);
                }
                value => {
                    self.indent(indent);
                    self.out.push('-');
                    self.value_after_indicator(value, indent, item.comments.trailing.as_deref());
                }
            }
        }
    }

    /// The rest of a line that started with `key:` or `-`.
    fn value_after_indicator(&mut self, node: &YamlNode, indent: usize, trailing: Option<&str>) {
        match node {
            YamlNode::Mapping(mapping) if is_block_mapping(mapping) => {
                self.trailing(trailing);
                self.out.push('\n');
                self.block_mapping(mapping, indent + INDENT, false);
            }
            YamlNode::Sequence(sequence) if is_block_sequence(sequence) => {
                self.trailing(trailing);
                self.out.push('\n');
                self.block_sequence(sequence, indent + INDENT);
            }
            YamlNode::Scalar(scalar) => match block_scalar_text(scalar) {
                Some(text) => self.literal_block(text, indent + INDENT, trailing),
                None => self.inline_value(node, trailing),
            },
            other => self.inline_value(other, trailing),
        }
    }

    fn inline_value(&mut self, node: &YamlNode, trailing: Option<&str>) {
        let text = inline(node, false);
        if !text.is_empty() {
            self.out.push(' ');
            self.out.push_str(&text);
        }
        self.trailing(trailing);
        self.out.push('\n');
    }

    fn literal_block(&mut self, text: &str, indent: usize, trailing: Option<&str>) {
        let (chomp, body) = if text.ends_with("\n\n") {
            ("+", &text[..text.len() - 1])
        } else if let Some(body) = text.strip_suffix('\n') {
            ("", body)
        } else {
            ("-", text)
        };

        self.out.push_str(" |");
        self.out.push_str(chomp);
        self.trailing(trailing);
        self.out.push('\n');
        for line in body.split('\n') {
            if !line.is_empty() {
                self.indent(indent);
                self.out.push_str(line);
            }
            self.out.push('\n');
        }
    }
}

fn is_block_mapping(mapping: &YamlMapping) -> bool {
    mapping.style() == CollectionStyle::Block && !mapping.is_empty()
}

fn is_block_sequence(sequence: &YamlSequence) -> bool {
    sequence.style() == CollectionStyle::Block && !sequence.is_empty()
}

/// Text of a literal/folded scalar that can be written as a `|` block.
fn block_scalar_text(scalar: &YamlScalar) -> Option<&str> {
    if !scalar.style().is_block() {
        return None;
    }
    let text = scalar.as_str()?;
    let writable = !text.is_empty()
        && !text.starts_with([' ', '\n'])
        && !text.chars().any(|c| c.is_control() && c != '\n');
    writable.then_some(text)
}

/// Single-line rendering of a node; containers use flow syntax.
fn inline(node: &YamlNode, in_flow: bool) -> String {
    match node {
        YamlNode::Scalar(scalar) => scalar_text(scalar, in_flow),
        YamlNode::Sequence(sequence) => {
            let items: Vec<String> = sequence
                .items()
                .iter()
                .map(|item| inline(&item.value, true))
                .collect();
            format!("[{}]", items.join(", "))
        }
        YamlNode::Mapping(mapping) => {
            if mapping.is_empty() {
                return "{}".to_string();
            }
            let entries: Vec<String> = mapping
                .entries()
                .iter()
                .map(|entry| format!("{}: {}", key_text(entry, true), inline(&entry.value, true)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

fn scalar_text(scalar: &YamlScalar, in_flow: bool) -> String {
    match scalar.value() {
        ScalarValue::String(text) => string_text(text, scalar, in_flow),
        value => match scalar.repr() {
            Some(repr) if !(repr.is_empty() && in_flow) => repr.to_string(),
            _ => canonical_text(value, in_flow),
        },
    }
}

fn canonical_text(value: &ScalarValue, in_flow: bool) -> String {
    match value {
        ScalarValue::Null if in_flow => "null".to_string(),
        ScalarValue::Null => String::new(),
        ScalarValue::Bool(b) => b.to_string(),
        ScalarValue::Int(i) => i.to_string(),
        ScalarValue::Float(f) => format_float(*f),
        ScalarValue::String(s) => s.clone(),
    }
}

fn string_text(text: &str, scalar: &YamlScalar, in_flow: bool) -> String {
    match scalar.style() {
        ScalarStyle::Plain => match scalar.repr() {
            // Text read as a plain scalar stays as it was written while it is
            // still a single plain line where it is emitted.
            Some(repr) if repr == text && plain_repr_fits(repr, in_flow) => repr.to_string(),
            _ if needs_quotes(text, in_flow) => quoted(text),
            _ => text.to_string(),
        },
        ScalarStyle::SingleQuoted => quoted(text),
        ScalarStyle::DoubleQuoted | ScalarStyle::Literal | ScalarStyle::Folded => {
            double_quoted(text)
        }
    }
}

fn plain_repr_fits(repr: &str, in_flow: bool) -> bool {
    !needs_escapes(repr) && !(in_flow && breaks_plain_syntax(repr, true))
}

/// Single quotes unless the text needs escape sequences.
fn quoted(text: &str) -> String {
    if needs_escapes(text) {
        double_quoted(text)
    } else {
        single_quoted(text)
    }
}

fn key_text(entry: &MappingEntry, in_flow: bool) -> String {
    match entry.key_style {
        ScalarStyle::SingleQuoted => quoted(&entry.key),
        ScalarStyle::DoubleQuoted => double_quoted(&entry.key),
        _ if key_needs_quotes(&entry.key, in_flow) => quoted(&entry.key),
        _ => entry.key.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Comments, MappingEntry};
    use crate::parse;

    fn roundtrip(text: &str) -> String {
        emit(&parse(text).unwrap())
    }

    #[test]
    fn test_untouched_document_is_stable() {
        let text = "\
# Summary information
info:
  name: \"my_name\"
  version: 'v1.0.0'

# Parameters
params:
  myint: 42
  myfloat: 4.0  # keep the zero
  mylist: [1, 2, 3]
  nested:
    deep: {a: 1, b: [x, y]}
  empty:
  tilde: ~
";
        assert_eq!(roundtrip(text), text);
    }

    #[test]
    fn test_block_sequences() {
        let text = "\
items:
  - a
  # second
  - b  # bee
  - name: x
    size: 2
  -
    - nested
";
        assert_eq!(roundtrip(text), text);
    }

    #[test]
    fn test_indentless_sequence_is_reindented() {
        assert_eq!(roundtrip("k:\n- a\n- b\n"), "k:\n  - a\n  - b\n");
    }

    #[test]
    fn test_literal_block_scalars() {
        let text = "a: |\n  one\n  two\nb: |-\n  tight\nc: after\n";
        assert_eq!(roundtrip(text), text);
        assert_eq!(roundtrip("f: >\n  folded\n  text\n"), "f: |\n  folded text\n");
    }

    #[test]
    fn test_fresh_nodes_are_quoted_when_needed() {
        let mut mapping = YamlMapping::new();
        mapping.insert("author", YamlNode::from("YamlParams, kind: SELF_GENERATED"));
        mapping.insert("count", YamlNode::from("42"));
        mapping.insert("plain", YamlNode::from("this is a string."));
        mapping.insert("multi", YamlNode::from("line one\nline two"));
        let mut list = YamlSequence::flow();
        list.push(YamlNode::from("three and four"));
        list.push(YamlNode::from("a, b"));
        list.push(YamlNode::from(1.0));
        mapping.insert("list", list.into());

        insta::assert_snapshot!(emit_node(&mapping.into()), @r#"
author: 'YamlParams, kind: SELF_GENERATED'
count: '42'
plain: this is a string.
multi: "line one\nline two"
list: [three and four, 'a, b', 1.0]
"#);
    }

    #[test]
    fn test_empty_containers() {
        let mut mapping = YamlMapping::new();
        mapping.insert("map", YamlMapping::new().into());
        mapping.insert("seq", YamlSequence::new().into());
        mapping.insert("nothing", YamlNode::default());
        assert_eq!(emit_node(&mapping.into()), "map: {}\nseq: []\nnothing:\n");
    }

    #[test]
    fn test_flow_nulls_are_explicit() {
        let mut list = YamlSequence::flow();
        list.push(YamlNode::default());
        let mut mapping = YamlMapping::new();
        mapping.insert("k", list.into());
        assert_eq!(emit_node(&mapping.into()), "k: [null]\n");
    }

    #[test]
    fn test_comments_follow_entry_indentation() {
        let mut inner = YamlMapping::new();
        inner.push_entry(MappingEntry::new("x", YamlNode::from(1)).with_comments(Comments {
            before: vec!["# about x".into()],
            trailing: Some("# one".into()),
        }));
        let mut outer = YamlMapping::new();
        outer.insert("inner", inner.into());
        let mut doc = YamlDocument::new(outer);
        doc.set_start_comment("Top");
        doc.set_footer(vec!["# end".into()]);

        assert_eq!(
            emit(&doc),
            "# Top\ninner:\n  # about x\n  x: 1  # one\n# end\n"
        );
    }

    #[test]
    fn test_quoted_keys() {
        assert_eq!(roundtrip("'a: b': 1\n\"q\": 2\n3: c\n"), "'a: b': 1\n\"q\": 2\n3: c\n");
    }

    #[test]
    fn test_flow_mapping_keys_avoid_flow_indicators() {
        let mut item = YamlMapping::new();
        item.insert("a,b", YamlNode::from(1));
        item.insert("{c}", YamlNode::from("d:e"));
        let mut list = YamlSequence::flow();
        list.push(item.into());
        let mut mapping = YamlMapping::new();
        mapping.insert("l", list.into());

        let text = emit_node(&mapping.into());
        assert_eq!(text, "l: [{'a,b': 1, '{c}': 'd:e'}]\n");

        let doc = parse(&text).unwrap();
        let list = doc.root().get("l").and_then(YamlNode::as_sequence).unwrap();
        let item = list.get(0).and_then(YamlNode::as_mapping).unwrap();
        let keys: Vec<&str> = item.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["a,b", "{c}"]);
    }

    #[test]
    fn test_untouched_flow_strings_keep_their_text() {
        let text = "k: [yes, No, x]\nm: {on: off}\n";
        assert_eq!(roundtrip(text), text);
    }

    #[test]
    fn test_plain_text_moved_into_flow_is_quoted() {
        let doc = parse("s: a,b\n").unwrap();
        let mut list = YamlSequence::flow();
        list.push(doc.root().get("s").unwrap().clone());
        let mut mapping = YamlMapping::new();
        mapping.insert("l", list.into());
        assert_eq!(emit_node(&mapping.into()), "l: ['a,b']\n");
    }

    #[test]
    fn test_multiline_quoted_scalar() {
        assert_eq!(
            roundtrip("a: \"line one\n  # still string\"\nb: 1\n"),
            "a: \"line one # still string\"\nb: 1\n"
        );
        assert_eq!(
            roundtrip("a: 'one\n  two'  # c\nb: 1\n"),
            "a: 'one two'  # c\nb: 1\n"
        );
    }

    #[test]
    fn test_plain_scalar_with_line_break_is_quoted() {
        assert_eq!(roundtrip("a: one\n\n  two\nb: 1\n"), "a: \"one\\ntwo\"\n\nb: 1\n");
    }

    #[test]
    fn test_comment_on_mapping_item_indicator() {
        let text = "items:\n  -  # note\n    a: 1\n    b: 2\n  - c: 3\n";
        assert_eq!(roundtrip(text), text);
    }

    #[test]
    fn test_long_keys_use_explicit_form() {
        let long = "k".repeat(1100);
        let nested_key = "q".repeat(1100);
        let mut inner = YamlMapping::new();
        inner.insert("x", YamlNode::from(1));
        let mut mapping = YamlMapping::new();
        mapping.insert(long.as_str(), YamlNode::from(1));
        mapping.insert(nested_key.as_str(), inner.into());
        mapping.insert("short", YamlNode::from(2));

        let text = emit_node(&mapping.into());
        assert_eq!(text, format!("? {long}\n: 1\n? {nested_key}\n:\n  x: 1\nshort: 2\n"));

        let doc = parse(&text).unwrap();
        let root = doc.root();
        assert_eq!(
            root.get(&long).and_then(YamlNode::as_scalar).map(YamlScalar::value),
            Some(&ScalarValue::Int(1))
        );
        assert!(root.get(&nested_key).and_then(|node| node.get("x")).is_some());
        assert_eq!(emit(&doc), text);
    }

    #[test]
    fn test_root_scalar() {
        assert_eq!(roundtrip("hello\n"), "hello\n");
    }
}
