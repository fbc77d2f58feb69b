use tracing_subscriber::EnvFilter;

use crate::logger::error::LoggerError;

/// Filter directive for the diagnostic subscriber (`"info"`, `"helper_core=debug,warn"`, ...).
///
/// Validated on construction so that a bad directive is reported before the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerLevel(String);

impl LoggerLevel {
    pub fn new(directive: impl Into<String>) -> Result<Self, LoggerError> {
        let directive = directive.into();
        EnvFilter::try_new(&directive)
            .map_err(|_| LoggerError::InvalidLogLevel(directive.clone()))?;
        Ok(Self(directive))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn filter(&self) -> Result<EnvFilter, LoggerError> {
        EnvFilter::try_new(&self.0).map_err(|_| LoggerError::InvalidLogLevel(self.0.clone()))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_targeted_directives() {
        assert_eq!(LoggerLevel::new("debug").unwrap().as_str(), "debug");
        assert!(LoggerLevel::new("helper_core=trace,warn").is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            LoggerLevel::new("helper_core=verbose"),
            Err(LoggerError::InvalidLogLevel(_))
        ));
    }
}
