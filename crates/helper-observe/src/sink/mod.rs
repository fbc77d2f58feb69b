mod circular;
pub use circular::CircularLogFile;

/// Destination for the messages a runner emits while it works.
///
/// Shared between several bindings of the same run, hence `&self` everywhere.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);

    fn error(&self, message: &str);

    /// Fraction of the run completed, in `0.0..=1.0`.
    fn set_progress(&self, _progress: f64) {}

    fn set_status(&self, _status: &str) {}
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}
