//! Default documents for parameter sets that have no file yet.

use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime};
use params_yaml::{YamlDocument, YamlMapping, YamlNode};

/// Version written into freshly generated `info` sections.
pub const DEFAULT_VERSION: &str = "v0.1.0";

/// Description written into freshly generated `info` sections.
pub const DEFAULT_DESCRIPTION: &str = "Parameter set managed by YamlParams.";

/// `strftime` format of the `info.date` field.
pub const DATE_FORMAT: &str = "%A, %d. %B %Y %I:%M%p";

/// Source of the timestamp stamped into generated documents.
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Clock stopped at the given local date and time.
    ///
    /// Returns `None` for an invalid date or time.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// How a default document came to be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    /// No file and no initial parameters.
    SelfGenerated,
    /// Built around parameters passed in by the caller.
    PassedParams,
}

impl GenerationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationKind::SelfGenerated => "SELF_GENERATED",
            GenerationKind::PassedParams => "PASSED_PARAM_DICT",
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the document for a parameter set without a file: a header comment,
/// an `info` section stamped with the clock's time, and empty `params`.
pub fn default_document(name: &str, kind: GenerationKind, clock: &dyn Clock) -> YamlDocument {
    let mut info = YamlMapping::new();
    info.insert("name", YamlNode::from(name));
    info.insert("version", YamlNode::from(DEFAULT_VERSION));
    info.insert(
        "date",
        YamlNode::from(clock.now().format(DATE_FORMAT).to_string()),
    );
    info.insert("author", YamlNode::from(format!("YamlParams, kind: {}", kind)));
    info.insert("description", YamlNode::from(DEFAULT_DESCRIPTION));

    let mut root = YamlMapping::new();
    root.insert("info", info.into());
    root.insert("params", YamlMapping::new().into());

    let mut document = YamlDocument::new(root);
    document.set_start_comment(&format!(
        "Parameters (params) for YamlParams object '{}'.",
        name
    ));
    document
}
