//! Source location information for parse errors.

use serde::{Deserialize, Serialize};

/// Position of a YAML element in the original source text.
///
/// Only used for error reporting: decorated nodes do not carry locations,
/// since merged content has no source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Optional filename or source identifier
    pub file: Option<String>,

    /// Character offset from start of source (0-based)
    pub offset: usize,

    /// Line number (1-based)
    pub line: usize,

    /// Column number (1-based, in characters not bytes)
    pub col: usize,
}

impl SourceInfo {
    /// Create a new SourceInfo with all fields specified.
    pub fn new(file: Option<String>, offset: usize, line: usize, col: usize) -> Self {
        Self {
            file,
            offset,
            line,
            col,
        }
    }

    /// Create a SourceInfo from a character offset, resolving line and column
    /// against the given line start table.
    pub(crate) fn from_offset(offset: usize, line_starts: &[usize]) -> Self {
        let line = line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let col = offset - line_starts.get(line).copied().unwrap_or(0);
        Self {
            file: None,
            offset,
            line: line + 1,
            col: col + 1,
        }
    }

    /// Set the filename for this source location.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl Default for SourceInfo {
    fn default() -> Self {
        Self {
            file: None,
            offset: 0,
            line: 1,
            col: 1,
        }
    }
}

impl std::fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.col),
            None => write!(f, "{}:{}", self.line, self.col),
        }
    }
}
