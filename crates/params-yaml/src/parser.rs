//! YAML parser that builds decorated documents.
//!
//! Data comes from yaml-rust2's event stream. Layout that the event stream
//! does not report is recovered from the source text at each event's marker:
//! `[`/`{` for flow containers, and the comment and blank lines between
//! mapping keys and sequence items (see [`crate::comments`]).

use std::collections::HashMap;

use tracing::trace;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::comments::{LineKind, SourceLines};
use crate::document::{
    CollectionStyle, Comments, MappingEntry, ScalarStyle, ScalarValue, SequenceItem, YamlDocument,
    YamlMapping, YamlNode, YamlScalar, YamlSequence,
};
use crate::scalar::{format_float, resolve_plain};
use crate::{Error, Result, SourceInfo};

/// Parse YAML text into a decorated document.
///
/// Only the first document of a multi-document stream is read.
///
/// # Example
///
/// ```rust
/// use params_yaml::parse;
///
/// let doc = parse("title: Report  # shown on the cover\n").unwrap();
/// let entry = doc.root().as_mapping().unwrap().entry("title").unwrap();
/// assert_eq!(entry.comments.trailing.as_deref(), Some("# shown on the cover"));
/// ```
///
/// # Errors
///
/// Returns an error if the text is not valid YAML, is empty, or uses a
/// collection as a mapping key.
pub fn parse(content: &str) -> Result<YamlDocument> {
    parse_impl(content, None)
}

/// Parse YAML text with an associated filename used in error locations.
pub fn parse_file(content: &str, filename: &str) -> Result<YamlDocument> {
    parse_impl(content, Some(filename))
}

fn parse_impl(content: &str, filename: Option<&str>) -> Result<YamlDocument> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = DocumentBuilder::new(content);

    parser
        .load(&mut builder, false)
        .map_err(|err| Error::from(err).with_file(filename))?;

    let document = builder.finish().map_err(|err| err.with_file(filename))?;
    trace!(
        file = filename.unwrap_or("<string>"),
        header_lines = document.header().len(),
        "parsed YAML document"
    );
    Ok(document)
}

/// A mapping key waiting for its value.
struct PendingKey {
    offset: usize,
    key: String,
    style: ScalarStyle,
    comments: Comments,
}

/// A container being constructed during parsing.
enum BuildNode {
    Sequence {
        anchor: usize,
        start: usize,
        sequence: YamlSequence,
        /// Comments gathered for the item currently being built.
        item_comments: Comments,
    },

    Mapping {
        anchor: usize,
        start: usize,
        mapping: YamlMapping,
        pending_key: Option<PendingKey>,
        /// Comments gathered for the key currently being read.
        key_comments: Comments,
    },
}

impl BuildNode {
    fn is_flow(&self) -> bool {
        match self {
            BuildNode::Sequence { sequence, .. } => sequence.style() == CollectionStyle::Flow,
            BuildNode::Mapping { mapping, .. } => mapping.style() == CollectionStyle::Flow,
        }
    }
}

/// Builder that implements MarkedEventReceiver to construct a YamlDocument.
struct DocumentBuilder {
    lines: SourceLines,

    /// Stack of containers being constructed
    stack: Vec<BuildNode>,

    /// The completed root node
    root: Option<YamlNode>,

    /// Comment lines before the root node
    header: Vec<String>,

    /// Completed anchored nodes, copied at each alias
    anchors: HashMap<usize, YamlNode>,

    /// First source line not yet claimed for comments
    next_line: usize,

    /// Last line whose end-of-line comment has been handed out
    trailing_claimed: Option<usize>,

    /// Lines after a literal or folded scalar are content, not comments
    skip_block_content: bool,

    /// First structural error; later events are ignored
    error: Option<Error>,
}

impl DocumentBuilder {
    fn new(source: &str) -> Self {
        Self {
            lines: SourceLines::new(source),
            stack: Vec::new(),
            root: None,
            header: Vec::new(),
            anchors: HashMap::new(),
            next_line: 0,
            trailing_claimed: None,
            skip_block_content: false,
            error: None,
        }
    }

    fn finish(mut self) -> Result<YamlDocument> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        let root = self.root.take().ok_or_else(|| Error::ParseError {
            message: "No YAML document found".into(),
            location: None,
        })?;

        let mut footer = self.take_before_lines(self.lines.len());
        while footer.last().is_some_and(String::is_empty) {
            footer.pop();
        }

        Ok(YamlDocument::from_parts(self.header, root, footer))
    }

    fn location(&self, offset: usize) -> SourceInfo {
        SourceInfo::from_offset(offset, self.lines.line_starts())
    }

    /// Claim the comment and blank lines above `line`.
    fn take_before_lines(&mut self, line: usize) -> Vec<String> {
        let skip = std::mem::take(&mut self.skip_block_content);
        let mut before = Vec::new();
        if !skip {
            for index in self.next_line..line {
                match self.lines.kind(index) {
                    Some(LineKind::Blank) => before.push(String::new()),
                    Some(LineKind::Comment(text)) => before.push(text.clone()),
                    _ => {}
                }
            }
        }
        self.next_line = self.next_line.max(line + 1);
        before
    }

    /// Claim the end-of-line comment of `line`, once.
    fn take_trailing(&mut self, line: usize) -> Option<String> {
        if self.trailing_claimed.is_some_and(|claimed| claimed >= line) {
            return None;
        }
        match self.lines.kind(line) {
            Some(LineKind::Content {
                trailing: Some(text),
            }) => {
                self.trailing_claimed = Some(line);
                Some(text.clone())
            }
            _ => None,
        }
    }

    /// A node starts at `offset`: hand it the comments that belong to it.
    ///
    /// Block mapping keys and block sequence items own the lines above them;
    /// keys and scalar items also own the end-of-line comment of their line.
    fn open_slot(&mut self, offset: usize, leaf: bool) {
        let line = self.lines.line_of(offset);
        match self.stack.last() {
            None => {
                self.header = self.take_before_lines(line);
                // The root's first line still holds its first key or item.
                self.next_line = line;
                return;
            }
            Some(BuildNode::Mapping {
                pending_key: Some(_),
                ..
            }) => return,
            Some(parent) if parent.is_flow() => return,
            Some(_) => {}
        }

        let indicator = if leaf {
            None
        } else {
            self.item_indicator_line(line)
        };
        let comments = match indicator {
            // `- # note` on its own line, the collection below it.
            Some(indicator) => Comments {
                before: self.take_before_lines(indicator),
                trailing: self.take_trailing(indicator),
            },
            None => Comments {
                before: self.take_before_lines(line),
                trailing: if leaf { self.take_trailing(line) } else { None },
            },
        };

        match self.stack.last_mut() {
            Some(BuildNode::Sequence { item_comments, .. }) => *item_comments = comments,
            Some(BuildNode::Mapping { key_comments, .. }) => *key_comments = comments,
            None => {}
        }
    }

    /// Line of the `-` of a block sequence item whose collection value starts
    /// on a later line.
    fn item_indicator_line(&self, line: usize) -> Option<usize> {
        if self.skip_block_content || !matches!(self.stack.last(), Some(BuildNode::Sequence { .. }))
        {
            return None;
        }
        (self.next_line..line)
            .rev()
            .find(|&index| {
                !matches!(
                    self.lines.kind(index),
                    Some(LineKind::Blank | LineKind::Comment(_))
                )
            })
            .filter(|&index| self.lines.first_char(index) == Some('-'))
    }

    /// A quoted scalar starting at `offset` ran onto later lines: those lines
    /// are data, and the comment after the closing quote is the scalar's.
    fn close_quoted(&mut self, offset: usize, quote: char) {
        let Some(end) = self.lines.quoted_end(offset, quote) else {
            return;
        };
        let end_line = self.lines.line_of(end);
        if end_line <= self.lines.line_of(offset) {
            return;
        }
        self.next_line = self.next_line.max(end_line + 1);
        let Some(comment) = self.take_trailing(end_line) else {
            return;
        };
        match self.stack.last_mut() {
            Some(BuildNode::Mapping {
                pending_key: Some(key),
                ..
            }) => {
                key.comments.trailing.get_or_insert(comment);
            }
            Some(BuildNode::Sequence { item_comments, .. }) => {
                item_comments.trailing.get_or_insert(comment);
            }
            _ => {}
        }
    }

    fn is_tilde_token(&self, offset: usize) -> bool {
        self.lines.char_at(offset) == Some('~') && !self.at_following_key(offset)
    }

    /// An empty mapping value is reported at the token after it. That token
    /// is the next key when it starts a later line, no further right than the
    /// key waiting for a value.
    fn at_following_key(&self, offset: usize) -> bool {
        let Some(BuildNode::Mapping {
            pending_key: Some(key),
            ..
        }) = self.stack.last()
        else {
            return false;
        };
        self.lines.line_of(offset) > self.lines.line_of(key.offset)
            && self.column(offset) <= self.column(key.offset)
    }

    fn column(&self, offset: usize) -> usize {
        let start = self
            .lines
            .line_starts()
            .get(self.lines.line_of(offset))
            .copied()
            .unwrap_or(0);
        offset - start
    }

    fn collection_style(&self, offset: usize, opener: char) -> CollectionStyle {
        let parent_is_flow = self.stack.last().is_some_and(BuildNode::is_flow);
        if parent_is_flow || self.lines.char_at(offset) == Some(opener) {
            CollectionStyle::Flow
        } else {
            CollectionStyle::Block
        }
    }

    fn complete(&mut self, node: YamlNode, anchor: usize, offset: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }
        self.push_complete(node, offset);
    }

    fn push_complete(&mut self, node: YamlNode, offset: usize) {
        let Some(parent) = self.stack.last_mut() else {
            self.root = Some(node);
            return;
        };

        let rejected_key = match parent {
            BuildNode::Sequence {
                sequence,
                item_comments,
                ..
            } => {
                sequence.push_item(SequenceItem {
                    value: node,
                    comments: std::mem::take(item_comments),
                });
                None
            }
            BuildNode::Mapping {
                mapping,
                pending_key,
                key_comments,
                ..
            } => match (pending_key.take(), node) {
                (Some(key), value) => {
                    mapping.push_entry(MappingEntry {
                        key: key.key,
                        key_style: key.style,
                        value,
                        comments: key.comments,
                    });
                    None
                }
                (None, YamlNode::Scalar(scalar)) => {
                    *pending_key = Some(PendingKey {
                        offset,
                        style: scalar.style(),
                        key: key_text(scalar),
                        comments: std::mem::take(key_comments),
                    });
                    None
                }
                (None, other) => Some(other.kind_name()),
            },
        };

        if let Some(kind) = rejected_key {
            self.error = Some(Error::InvalidStructure {
                message: format!("mapping keys must be scalars, found a {}", kind),
                location: Some(self.location(offset)),
            });
        }
    }

    fn build_scalar(
        &self,
        value: String,
        style: TScalarStyle,
        tag: Option<&Tag>,
        offset: usize,
    ) -> YamlScalar {
        let style = match style {
            TScalarStyle::Plain => ScalarStyle::Plain,
            TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
            TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
            TScalarStyle::Literal => ScalarStyle::Literal,
            TScalarStyle::Folded => ScalarStyle::Folded,
        };

        if style != ScalarStyle::Plain {
            return YamlScalar::parsed(ScalarValue::String(value), style, None);
        }
        if tag.is_some_and(|tag| is_core_tag(tag, "str")) {
            return YamlScalar::new(ScalarValue::String(value));
        }

        // yaml-rust2 reports an empty value (`key:`) as `~`
        let repr = if value == "~" && !self.is_tilde_token(offset) {
            String::new()
        } else {
            value.clone()
        };
        YamlScalar::parsed(resolve_plain(&value), style, Some(repr))
    }
}

impl MarkedEventReceiver for DocumentBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }
        let offset = marker.index();

        match ev {
            Event::Nothing => {}

            Event::StreamStart => {}
            Event::StreamEnd => {}
            Event::DocumentStart => {}
            Event::DocumentEnd => {}

            Event::Scalar(value, style, anchor, tag) => {
                self.open_slot(offset, true);
                match style {
                    TScalarStyle::SingleQuoted => self.close_quoted(offset, '\''),
                    TScalarStyle::DoubleQuoted => self.close_quoted(offset, '"'),
                    _ => {}
                }
                let scalar = self.build_scalar(value, style, tag.as_ref(), offset);
                let is_block = scalar.style().is_block();
                self.complete(YamlNode::Scalar(scalar), anchor, offset);
                if is_block {
                    self.skip_block_content = true;
                }
            }

            Event::SequenceStart(anchor, _tag) => {
                self.open_slot(offset, false);
                let mut sequence = YamlSequence::new();
                sequence.set_style(self.collection_style(offset, '['));
                self.stack.push(BuildNode::Sequence {
                    anchor,
                    start: offset,
                    sequence,
                    item_comments: Comments::default(),
                });
            }

            Event::SequenceEnd => match self.stack.pop() {
                Some(BuildNode::Sequence {
                    anchor,
                    start,
                    sequence,
                    ..
                }) => self.complete(YamlNode::Sequence(sequence), anchor, start),
                _ => {
                    self.error = Some(Error::InvalidStructure {
                        message: "sequence end without a matching start".into(),
                        location: Some(self.location(offset)),
                    });
                }
            },

            Event::MappingStart(anchor, _tag) => {
                self.open_slot(offset, false);
                let mut mapping = YamlMapping::new();
                mapping.set_style(self.collection_style(offset, '{'));
                self.stack.push(BuildNode::Mapping {
                    anchor,
                    start: offset,
                    mapping,
                    pending_key: None,
                    key_comments: Comments::default(),
                });
            }

            Event::MappingEnd => match self.stack.pop() {
                Some(BuildNode::Mapping {
                    anchor,
                    start,
                    mapping,
                    ..
                }) => self.complete(YamlNode::Mapping(mapping), anchor, start),
                _ => {
                    self.error = Some(Error::InvalidStructure {
                        message: "mapping end without a matching start".into(),
                        location: Some(self.location(offset)),
                    });
                }
            },

            Event::Alias(anchor) => {
                self.open_slot(offset, true);
                match self.anchors.get(&anchor).cloned() {
                    Some(node) => self.push_complete(node, offset),
                    None => {
                        self.error = Some(Error::InvalidStructure {
                            message: "alias refers to an unknown anchor".into(),
                            location: Some(self.location(offset)),
                        });
                    }
                }
            }
        }
    }
}

fn is_core_tag(tag: &Tag, suffix: &str) -> bool {
    tag.suffix == suffix && (tag.handle == "!!" || tag.handle == "tag:yaml.org,2002:")
}

/// Text of a scalar used as a mapping key.
fn key_text(scalar: YamlScalar) -> String {
    if let Some(repr) = scalar.repr() {
        return repr.to_string();
    }
    match scalar.into_value() {
        ScalarValue::String(s) => s,
        ScalarValue::Null => String::new(),
        ScalarValue::Bool(b) => b.to_string(),
        ScalarValue::Int(i) => i.to_string(),
        ScalarValue::Float(f) => format_float(f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(doc: &YamlDocument) -> &YamlMapping {
        doc.root().as_mapping().expect("root mapping")
    }

    #[test]
    fn test_parse_scalar() {
        let doc = parse("hello").unwrap();
        let scalar = doc.root().as_scalar().unwrap();
        assert_eq!(scalar.as_str(), Some("hello"));
    }

    #[test]
    fn test_parse_typed_scalars() {
        let doc = parse("i: 42\nf: 4.0\nb: true\nn: ~\ne:\ns: '42'\n").unwrap();
        let m = mapping(&doc);
        let value = |key: &str| m.get(key).unwrap().as_scalar().unwrap().value().clone();
        assert_eq!(value("i"), ScalarValue::Int(42));
        assert_eq!(value("f"), ScalarValue::Float(4.0));
        assert_eq!(value("b"), ScalarValue::Bool(true));
        assert_eq!(value("n"), ScalarValue::Null);
        assert_eq!(value("e"), ScalarValue::Null);
        assert_eq!(value("s"), ScalarValue::String("42".into()));
    }

    #[test]
    fn test_float_keeps_source_text() {
        let doc = parse("x: 4.0\ny: 2.718281828\n").unwrap();
        let x = mapping(&doc).get("x").unwrap().as_scalar().unwrap();
        assert!(x.is_preserved_float());
        assert_eq!(x.repr(), Some("4.0"));
    }

    #[test]
    fn test_quote_styles() {
        let doc = parse("a: \"dq\"\nb: 'sq'\nc: plain\n").unwrap();
        let m = mapping(&doc);
        let style = |key: &str| m.get(key).unwrap().as_scalar().unwrap().style();
        assert_eq!(style("a"), ScalarStyle::DoubleQuoted);
        assert_eq!(style("b"), ScalarStyle::SingleQuoted);
        assert_eq!(style("c"), ScalarStyle::Plain);
    }

    #[test]
    fn test_collection_styles() {
        let doc = parse("flow: [1, 2]\nblock:\n  - 1\n  - 2\nmap: {a: 1}\n").unwrap();
        let m = mapping(&doc);
        assert_eq!(
            m.get("flow").unwrap().as_sequence().unwrap().style(),
            CollectionStyle::Flow
        );
        assert_eq!(
            m.get("block").unwrap().as_sequence().unwrap().style(),
            CollectionStyle::Block
        );
        assert_eq!(
            m.get("map").unwrap().as_mapping().unwrap().style(),
            CollectionStyle::Flow
        );
        assert_eq!(m.style(), CollectionStyle::Block);
    }

    #[test]
    fn test_comments_attach_to_entries() {
        let doc = parse(
            "# header\ninfo:\n  name: x\n\n# about params\nparams:\n  a: 1  # the a\n  # before b\n  b: 2\n# footer\n",
        )
        .unwrap();
        assert_eq!(doc.header(), ["# header"]);
        assert_eq!(doc.footer(), ["# footer"]);

        let root = mapping(&doc);
        let params = root.entry("params").unwrap();
        assert_eq!(params.comments.before, ["", "# about params"]);

        let inner = params.value.as_mapping().unwrap();
        assert_eq!(
            inner.entry("a").unwrap().comments.trailing.as_deref(),
            Some("# the a")
        );
        assert_eq!(inner.entry("b").unwrap().comments.before, ["# before b"]);
    }

    #[test]
    fn test_comment_on_key_of_nested_mapping() {
        let doc = parse("outer:  # note\n  inner: 1\n").unwrap();
        let entry = mapping(&doc).entry("outer").unwrap();
        assert_eq!(entry.comments.trailing.as_deref(), Some("# note"));
        let inner = entry.value.as_mapping().unwrap().entry("inner").unwrap();
        assert!(inner.comments.is_empty());
    }

    #[test]
    fn test_sequence_item_comments() {
        let doc = parse("- a  # first\n# second up next\n- b\n").unwrap();
        let seq = doc.root().as_sequence().unwrap();
        assert_eq!(seq.items()[0].comments.trailing.as_deref(), Some("# first"));
        assert_eq!(seq.items()[1].comments.before, ["# second up next"]);
    }

    #[test]
    fn test_block_scalar_content_is_not_comment() {
        let doc = parse("text: |\n  # not a comment\n  body\nnext: 1\n").unwrap();
        let m = mapping(&doc);
        assert_eq!(
            m.get("text").unwrap().as_scalar().unwrap().as_str(),
            Some("# not a comment\nbody\n")
        );
        assert!(m.entry("next").unwrap().comments.before.is_empty());
    }

    #[test]
    fn test_quoted_scalar_lines_are_not_comments() {
        let doc = parse("a: \"line one\n  # still string\"\n\nb: 'x\n\n  y'  # why\nc: 1\n").unwrap();
        let m = mapping(&doc);
        assert_eq!(
            m.get("a").unwrap().as_scalar().unwrap().as_str(),
            Some("line one # still string")
        );
        assert_eq!(m.entry("b").unwrap().comments.before, [""]);
        assert_eq!(m.entry("b").unwrap().comments.trailing.as_deref(), Some("# why"));
        assert_eq!(m.get("b").unwrap().as_scalar().unwrap().as_str(), Some("x\ny"));
        assert!(m.entry("c").unwrap().comments.is_empty());
    }

    #[test]
    fn test_comment_on_item_indicator_line() {
        let doc = parse("- # first\n  # about a\n  a: 1\n-  # second\n  - x\n").unwrap();
        let seq = doc.root().as_sequence().unwrap();
        let first = &seq.items()[0];
        assert_eq!(first.comments.trailing.as_deref(), Some("# first"));
        assert!(first.comments.before.is_empty());
        let a = first.value.as_mapping().unwrap().entry("a").unwrap();
        assert_eq!(a.comments.before, ["# about a"]);
        assert_eq!(seq.items()[1].comments.trailing.as_deref(), Some("# second"));
    }

    #[test]
    fn test_empty_value_before_tilde_key() {
        let doc = parse("a:\n~: 1\nb:\n~x: 2\nc:\n  ~\n").unwrap();
        let m = mapping(&doc);
        let repr = |key: &str| m.get(key).unwrap().as_scalar().unwrap().repr().map(str::to_string);
        assert_eq!(repr("a").as_deref(), Some(""));
        assert_eq!(repr("~").as_deref(), Some("1"));
        assert_eq!(repr("b").as_deref(), Some(""));
        assert_eq!(repr("c").as_deref(), Some("~"));
        assert_eq!(m.get("c").unwrap().as_scalar().unwrap().value(), &ScalarValue::Null);
    }

    #[test]
    fn test_alias_copies_anchor() {
        let doc = parse("base: &b {x: 1}\ncopy: *b\n").unwrap();
        let m = mapping(&doc);
        assert_eq!(m.get("base"), m.get("copy"));
    }

    #[test]
    fn test_str_tag_forces_string() {
        let doc = parse("v: !!str 42\n").unwrap();
        let scalar = mapping(&doc).get("v").unwrap().as_scalar().unwrap().clone();
        assert_eq!(scalar.value(), &ScalarValue::String("42".into()));
    }

    #[test]
    fn test_collection_key_is_rejected() {
        let err = parse("? [a, b]\n: value\n").unwrap_err();
        assert!(matches!(err, Error::InvalidStructure { .. }));
    }

    #[test]
    fn test_syntax_error_has_location() {
        let err = parse_file("a: [1, 2\n", "broken.yaml").unwrap_err();
        assert!(matches!(err, Error::ParseError { .. }));
        assert_eq!(
            err.location().and_then(|loc| loc.file.as_deref()),
            Some("broken.yaml")
        );
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(parse("").is_err());
        assert!(parse("# only a comment\n").is_err());
    }
}
