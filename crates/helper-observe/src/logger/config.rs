use std::io::IsTerminal;

use helper_model::LoggingSection;

use crate::logger::{error::LoggerError, format::LoggerFormat, level::LoggerLevel};

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: LoggerLevel,
    pub with_targets: bool,
    pub use_color: bool,
}

impl LoggerConfig {
    /// Applies the `logging` section of a task file over the defaults.
    pub fn from_section(section: &LoggingSection) -> Result<Self, LoggerError> {
        let mut cfg = Self::default();
        if let Some(level) = &section.level {
            cfg.level = LoggerLevel::new(level.as_str())?;
        }
        if let Some(format) = &section.format {
            cfg.format = format.parse()?;
        }
        Ok(cfg)
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let use_color = cfg!(test) || std::io::stderr().is_terminal();
        Self {
            format: LoggerFormat::Text,
            level: LoggerLevel::default(),
            with_targets: true,
            use_color,
        }
    }
}
