//! Error types for yaml-params

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    #[error("Parameter file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed parameter document{}: {reason}", describe_path(path.as_deref()))]
    MalformedDocument {
        path: Option<PathBuf>,
        reason: String,
    },
}

impl Error {
    pub(crate) fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(path: Option<&Path>, reason: impl Into<String>) -> Self {
        Error::MalformedDocument {
            path: path.map(Path::to_path_buf),
            reason: reason.into(),
        }
    }

    /// Map an I/O failure on `path`, reporting a missing file as `FileNotFound`.
    pub(crate) fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

fn describe_path(path: Option<&Path>) -> String {
    path.map(|p| format!(" {}", p.display())).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
