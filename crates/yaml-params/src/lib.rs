//! Named parameter sets stored in comment-preserving YAML files.
//!
//! A parameter file has two top-level sections: `info`, a short record
//! describing the set, and `params`, arbitrary nested values. [`YamlParams`]
//! loads such a file, hands out the parameters as plain [`ParamValue`] data,
//! and writes edits back without disturbing the comments and layout a person
//! gave the file.
//!
//! # Architecture
//!
//! - [`to_plain`]: decorated document node to plain value
//! - [`merge`]: plain value back into a decorated node (additive; lists are
//!   re-laid out inline)
//! - [`default_document`]: the document for a set that has no file yet,
//!   stamped by an injected [`Clock`]
//!
//! # Example
//!
//! ```rust,no_run
//! use yaml_params::{ParamValue, YamlParams};
//!
//! let mut params = YamlParams::new("my_obj")?;
//! params.params_mut().insert("myint".into(), ParamValue::from(43));
//! params.save_params(None)?;
//! # Ok::<(), yaml_params::Error>(())
//! ```

mod bootstrap;
mod convert;
mod error;
mod info;
mod merge;
mod params;
mod value;

pub use bootstrap::{
    default_document, Clock, FixedClock, GenerationKind, SystemClock, DATE_FORMAT,
    DEFAULT_DESCRIPTION, DEFAULT_VERSION,
};
pub use convert::to_plain;
pub use error::{Error, Result};
pub use info::DocumentInfo;
pub use merge::{empty_node_for, merge, merge_list, merge_map};
pub use params::{ParamsOptions, YamlParams, PARAMS_EXTENSION};
pub use value::{set_path, ParamMap, ParamValue};

pub use params_yaml;
