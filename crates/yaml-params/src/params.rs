//! Named parameter sets backed by a YAML file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use params_yaml::{YamlDocument, YamlMapping, YamlNode};
use tracing::{debug, info, warn};

use crate::bootstrap::{default_document, Clock, GenerationKind, SystemClock};
use crate::convert::to_plain;
use crate::error::{Error, Result};
use crate::info::DocumentInfo;
use crate::merge::merge_map;
use crate::value::{set_path, ParamMap, ParamValue};

/// Extension of parameter files: `<directory>/<name>.yaml`.
pub const PARAMS_EXTENSION: &str = "yaml";

const INFO_KEY: &str = "info";
const PARAMS_KEY: &str = "params";

/// How a [`YamlParams`] is set up.
#[derive(Debug, Clone)]
pub struct ParamsOptions {
    /// Directory holding the parameter file. Defaults to the current directory.
    pub directory: Option<PathBuf>,
    /// Initial parameters. When given, no file is read.
    pub params: Option<ParamValue>,
    /// Read `<directory>/<name>.yaml` when no initial parameters are given.
    pub load_file: bool,
    /// Timestamp source for generated documents.
    pub clock: Arc<dyn Clock>,
}

impl Default for ParamsOptions {
    fn default() -> Self {
        Self {
            directory: None,
            params: None,
            load_file: true,
            clock: Arc::new(SystemClock),
        }
    }
}

impl ParamsOptions {
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn with_params(mut self, params: impl Into<ParamValue>) -> Self {
        self.params = Some(params.into());
        self
    }

    pub fn with_load_file(mut self, load_file: bool) -> Self {
        self.load_file = load_file;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }
}

/// A named set of parameters and the decorated document they live in.
///
/// `params` is plain data the caller edits freely. The document keeps the
/// file's comments and layout; edits are merged into it by
/// [`capture_params`](Self::capture_params), which dumping and saving run
/// first.
#[derive(Debug, Clone)]
pub struct YamlParams {
    name: String,
    directory: PathBuf,
    file_path: PathBuf,
    document: YamlDocument,
    params: ParamMap,
}

impl YamlParams {
    /// Load `<current directory>/<name>.yaml`.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_options(name, ParamsOptions::default())
    }

    pub fn with_options(name: impl Into<String>, options: ParamsOptions) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;

        let directory = match options.directory {
            Some(directory) => absolute(&directory)?,
            None => current_dir()?,
        };
        if directory.to_str().is_none() {
            return Err(Error::invalid_argument(
                "directory",
                format!("{} is not valid UTF-8", directory.display()),
            ));
        }
        let file_path = directory.join(format!("{}.{}", name, PARAMS_EXTENSION));

        let (document, params) = match options.params {
            Some(ParamValue::Map(params)) => {
                let document =
                    default_document(&name, GenerationKind::PassedParams, options.clock.as_ref());
                (document, params)
            }
            Some(other) => {
                return Err(Error::invalid_argument(
                    "params",
                    format!("expected a map, got a {}", other.kind_name()),
                ));
            }
            None if options.load_file => read_document(&file_path)?,
            None => {
                let document =
                    default_document(&name, GenerationKind::SelfGenerated, options.clock.as_ref());
                (document, ParamMap::new())
            }
        };

        debug!(name = %name, path = %file_path.display(), "created parameter set");
        Ok(Self {
            name,
            directory,
            file_path,
            document,
            params,
        })
    }

    /// Reload the document from `path`, or from the current file path.
    ///
    /// With a `path`, the name becomes the file name up to its first `.` and
    /// the directory becomes the file's directory. On any error the object is
    /// left unchanged.
    pub fn read_config(&mut self, path: Option<&Path>) -> Result<()> {
        let target = match path {
            Some(path) => absolute(path)?,
            None => self.file_path.clone(),
        };
        let renamed = match path {
            Some(_) => Some(location_of(&target)?),
            None => None,
        };
        let (document, params) = read_document(&target)?;

        if let Some((name, directory)) = renamed {
            self.name = name;
            self.directory = directory;
            self.file_path = target;
        }
        self.document = document;
        self.params = params;
        Ok(())
    }

    /// Merge the plain parameters into the document's `params` section.
    pub fn capture_params(&mut self) {
        if !self.document.root().is_mapping() {
            warn!(
                name = %self.name,
                found = self.document.root().kind_name(),
                "document root is not a mapping, params not captured"
            );
            return;
        }
        let Some(root) = self.document.root_mut().as_mapping_mut() else {
            return;
        };
        let existing = match root.get_mut(PARAMS_KEY).map(std::mem::take) {
            Some(YamlNode::Mapping(mapping)) => mapping,
            Some(other) => {
                debug!(found = other.kind_name(), "replacing non-mapping params section");
                YamlMapping::new()
            }
            None => YamlMapping::new(),
        };
        let merged = merge_map(&self.params, existing);
        root.insert(PARAMS_KEY, merged.into());
        debug!(name = %self.name, keys = self.params.len(), "captured params");
    }

    /// Capture, then render the whole document as YAML text.
    pub fn dump_params_text(&mut self) -> String {
        self.capture_params();
        params_yaml::emit(&self.document)
    }

    /// Capture, then write the document to `path` or the current file path.
    pub fn save_params(&mut self, path: Option<&Path>) -> Result<()> {
        let text = self.dump_params_text();
        let target = path.unwrap_or(self.file_path.as_path());
        fs::write(target, text).map_err(|source| Error::Io {
            path: target.to_path_buf(),
            source,
        })?;
        info!(path = %target.display(), "saved parameters");
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// The decorated document as of the last load or capture.
    pub fn document(&self) -> &YamlDocument {
        &self.document
    }

    pub fn info(&self) -> DocumentInfo {
        self.document
            .get(INFO_KEY)
            .map(DocumentInfo::from_node)
            .unwrap_or_default()
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParamMap {
        &mut self.params
    }

    pub fn set_params(&mut self, params: ParamMap) {
        self.params = params;
    }

    /// Look up a parameter by dotted path (`mydict.myint`).
    pub fn get(&self, path: &str) -> Option<&ParamValue> {
        match path.split_once('.') {
            Some((head, rest)) => self.params.get(head)?.get_path(rest),
            None => self.params.get(path),
        }
    }

    /// Set a parameter by dotted path, creating intermediate maps.
    pub fn set(&mut self, path: &str, value: impl Into<ParamValue>) -> Result<Option<ParamValue>> {
        set_path(&mut self.params, path, value.into())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_argument("name", "must not be empty"));
    }
    if name.chars().any(std::path::is_separator) {
        return Err(Error::invalid_argument(
            "name",
            format!("'{}' contains a path separator", name),
        ));
    }
    Ok(())
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|source| Error::Io {
        path: PathBuf::from("."),
        source,
    })
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Name and directory of a parameter file path.
fn location_of(path: &Path) -> Result<(String, PathBuf)> {
    let file_name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        Error::invalid_argument(
            "path",
            format!("{} has no UTF-8 file name", path.display()),
        )
    })?;
    let name = file_name.split('.').next().unwrap_or_default();
    validate_name(name)?;
    let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok((name.to_string(), directory))
}

/// Read and validate a parameter file.
fn read_document(path: &Path) -> Result<(YamlDocument, ParamMap)> {
    let text = fs::read_to_string(path).map_err(|source| Error::from_io(path, source))?;
    let document = params_yaml::parse_file(&text, &path.display().to_string())
        .map_err(|err| Error::malformed(Some(path), err.to_string()))?;
    let loaded = split_document(document, Some(path))?;
    info!(path = %path.display(), keys = loaded.1.len(), "loaded parameters");
    Ok(loaded)
}

/// Check the `info`/`params` layout and extract the plain parameters.
///
/// A `params:` with no value is repaired to an empty mapping.
pub(crate) fn split_document(
    mut document: YamlDocument,
    path: Option<&Path>,
) -> Result<(YamlDocument, ParamMap)> {
    let kind = document.root().kind_name();
    let Some(root) = document.root_mut().as_mapping_mut() else {
        return Err(Error::malformed(
            path,
            format!("document root is a {}, expected a mapping", kind),
        ));
    };

    match root.get(INFO_KEY) {
        Some(YamlNode::Mapping(_)) => {}
        Some(other) => {
            return Err(Error::malformed(
                path,
                format!("`info` is a {}, expected a mapping", other.kind_name()),
            ));
        }
        None => return Err(Error::malformed(path, "missing `info` section")),
    }

    let params = match root.get_mut(PARAMS_KEY) {
        Some(node) if node.is_null() => {
            warn!(
                path = %path.map(|p| p.display().to_string()).unwrap_or_default(),
                "`params` is empty; treating it as an empty mapping"
            );
            *node = YamlMapping::new().into();
            ParamMap::new()
        }
        Some(node) if node.is_mapping() => match to_plain(node) {
            ParamValue::Map(map) => map,
            _ => ParamMap::new(),
        },
        Some(other) => {
            return Err(Error::malformed(
                path,
                format!("`params` is a {}, expected a mapping", other.kind_name()),
            ));
        }
        None => return Err(Error::malformed(path, "missing `params` section")),
    };

    Ok((document, params))
}
