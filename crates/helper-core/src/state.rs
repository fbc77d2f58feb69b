use std::fmt;

/// Steps of a single launch, in order.
///
/// Any failure jumps from the current state to `AbortedOnError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Start,
    ConfigLoaded,
    MetricsSelected,
    ImageResolved,
    RunnerBuilt,
    Executing,
    Completed,
    Cancelled,
    AbortedOnError,
}

impl LaunchState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LaunchState::Completed | LaunchState::Cancelled | LaunchState::AbortedOnError
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchState::Start => "start",
            LaunchState::ConfigLoaded => "config_loaded",
            LaunchState::MetricsSelected => "metrics_selected",
            LaunchState::ImageResolved => "image_resolved",
            LaunchState::RunnerBuilt => "runner_built",
            LaunchState::Executing => "executing",
            LaunchState::Completed => "completed",
            LaunchState::Cancelled => "cancelled",
            LaunchState::AbortedOnError => "aborted_on_error",
        }
    }
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
