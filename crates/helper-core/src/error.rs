use std::{fmt, path::PathBuf};

use helper_model::ConfigError;
use thiserror::Error;

/// Why an image could not be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLoadReason {
    NotFound,
    Unreadable(String),
    UnsupportedFormat,
    Corrupt,
}

impl fmt::Display for ImageLoadReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageLoadReason::NotFound => f.write_str("file not found"),
            ImageLoadReason::Unreadable(e) => write!(f, "unreadable: {e}"),
            ImageLoadReason::UnsupportedFormat => f.write_str("unsupported format"),
            ImageLoadReason::Corrupt => f.write_str("corrupt or truncated data"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Could not open image file: {} ({reason})", .path.display())]
pub struct ImageLoadError {
    pub path: PathBuf,
    pub reason: ImageLoadReason,
}

impl ImageLoadError {
    pub fn new(path: impl Into<PathBuf>, reason: ImageLoadReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

/// Validation failure reported by a runner builder, shown to the operator verbatim.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BuilderError(pub String);

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("could not start {program}: {reason}")]
    Spawn { program: String, reason: String },
    #[error("host program exited with code {code}")]
    NonZeroExit { code: i32 },
    #[error("io error: {0}")]
    Io(String),
    #[error("{0}")]
    Runner(String),
}

impl From<std::io::Error> for ExecutionError {
    fn from(e: std::io::Error) -> Self {
        ExecutionError::Io(e.to_string())
    }
}

/// Any reason a launch stops before the sweep finishes.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Unknown tracking metrics type: {0}")]
    UnknownMetrics(String),
    #[error(transparent)]
    ImageLoad(#[from] ImageLoadError),
    #[error(transparent)]
    Builder(#[from] BuilderError),
    #[error("Parameter sweep failed: {0}")]
    Execution(#[from] ExecutionError),
}
