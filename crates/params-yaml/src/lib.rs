//! # params-yaml
//!
//! Comment-preserving YAML documents for parameter files.
//!
//! This crate provides `YamlDocument`, a decorated YAML tree that remembers
//! what a plain data model forgets: full-line and end-of-line comments, the
//! quoting style of scalars and keys, block or flow layout of collections, and
//! the exact text of plain scalars (so `4.0` stays `4.0`).
//!
//! ## Design
//!
//! yaml-rust2 provides the event stream; comments are recovered from the
//! source lines the events point at. Each comment attaches to the node that
//! follows it (or, for end-of-line comments, the node on that line). Content
//! before the root and after the last node becomes the document header and
//! footer.
//!
//! ## Example
//!
//! ```rust
//! use params_yaml::{parse, YamlNode};
//!
//! let content = "# run settings\nsteps: 10  # per epoch\nrate: 4.0\n";
//!
//! let mut doc = parse(content).unwrap();
//! if let Some(mapping) = doc.root_mut().as_mapping_mut() {
//!     mapping.insert("steps", YamlNode::from(20));
//! }
//! assert_eq!(
//!     doc.to_string(),
//!     "# run settings\nsteps: 20  # per epoch\nrate: 4.0\n"
//! );
//! ```

mod comments;
mod document;
mod emitter;
mod error;
mod parser;
pub mod scalar;
mod source_info;

pub use document::{
    CollectionStyle, Comments, MappingEntry, ScalarStyle, ScalarValue, SequenceItem, YamlDocument,
    YamlMapping, YamlNode, YamlScalar, YamlSequence,
};
pub use emitter::{emit, emit_node};
pub use error::{Error, Result};
pub use parser::{parse, parse_file};
pub use source_info::SourceInfo;
