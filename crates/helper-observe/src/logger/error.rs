use thiserror::Error;

/// Problems with the `logging` section or with installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown logging format '{0}', use one of: text, json, journald")]
    InvalidFormat(String),
    #[error("logging format 'journald' needs Linux and the 'journald' feature")]
    JournaldNotSupported,
    #[error("a diagnostic subscriber is already installed")]
    AlreadyInitialized,
    #[error("diagnostic subscriber setup failed: {0}")]
    InitializationFailed(String),
    #[error("invalid logging level directive '{0}'")]
    InvalidLogLevel(String),
}
