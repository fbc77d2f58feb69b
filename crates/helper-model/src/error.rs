use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Problem with a single key of the task definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    Missing(&'static str),
    Mistyped {
        field: &'static str,
        expected: &'static str,
    },
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}

impl FieldIssue {
    pub fn field(&self) -> &'static str {
        match self {
            FieldIssue::Missing(field) => field,
            FieldIssue::Mistyped { field, .. } => field,
            FieldIssue::OutOfRange { field, .. } => field,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::Missing(field) => write!(f, "missing required key '{field}'"),
            FieldIssue::Mistyped { field, expected } => {
                write!(f, "key '{field}' must be {expected}")
            }
            FieldIssue::OutOfRange { field, reason } => write!(f, "key '{field}' {reason}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read task file {path}: {reason}")]
    Read { path: PathBuf, reason: String },
    #[error("Task file {path} is not valid JSON: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("Task file {path} does not contain a JSON object")]
    NotAnObject { path: PathBuf },
    #[error("Invalid task definition: {}", join(.0))]
    Invalid(Vec<FieldIssue>),
}

impl ConfigError {
    /// Issues found while validating keys, empty for file-level failures.
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            ConfigError::Invalid(issues) => issues,
            _ => &[],
        }
    }
}

fn join(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
