//! Error types for YAML parsing.

use crate::SourceInfo;
use std::fmt;

/// Result type alias for params-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a decorated document.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// YAML syntax error
    ParseError {
        message: String,
        location: Option<SourceInfo>,
    },

    /// Well-formed YAML that cannot be represented as a decorated document
    InvalidStructure {
        message: String,
        location: Option<SourceInfo>,
    },
}

impl Error {
    /// Location of the error in the source text, if known.
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            Error::ParseError { location, .. } | Error::InvalidStructure { location, .. } => {
                location.as_ref()
            }
        }
    }

    pub(crate) fn with_file(self, file: Option<&str>) -> Self {
        let Some(file) = file else {
            return self;
        };
        match self {
            Error::ParseError { message, location } => Error::ParseError {
                message,
                location: location.map(|loc| loc.with_file(file)),
            },
            Error::InvalidStructure { message, location } => Error::InvalidStructure {
                message,
                location: location.map(|loc| loc.with_file(file)),
            },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ParseError { message, location } => {
                write!(f, "Parse error: {}", message)?;
                if let Some(loc) = location {
                    write!(f, " (at {})", loc)?;
                }
                Ok(())
            }
            Error::InvalidStructure { message, location } => {
                write!(f, "Invalid YAML structure: {}", message)?;
                if let Some(loc) = location {
                    write!(f, " (at {})", loc)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        let marker = err.marker();
        Error::ParseError {
            message: err.info().to_string(),
            location: Some(SourceInfo::new(
                None,
                marker.index(),
                marker.line(),
                marker.col() + 1,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location() {
        let err = Error::InvalidStructure {
            message: "mapping keys must be scalars".into(),
            location: Some(SourceInfo::new(None, 4, 2, 1)),
        };
        assert_eq!(
            err.to_string(),
            "Invalid YAML structure: mapping keys must be scalars (at 2:1)"
        );
    }

    #[test]
    fn test_with_file_tags_location() {
        let err = Error::ParseError {
            message: "bad".into(),
            location: Some(SourceInfo::default()),
        }
        .with_file(Some("params.yaml"));
        assert_eq!(
            err.location().and_then(|loc| loc.file.as_deref()),
            Some("params.yaml")
        );
    }
}
