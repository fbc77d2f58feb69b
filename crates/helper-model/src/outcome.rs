use std::fmt;

/// Final state of a parameter sweep that was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The runner returned without a cancellation reason.
    Completed,
    /// The runner stopped early and reported why.
    Cancelled { reason: String },
}

impl RunOutcome {
    /// Builds the outcome from the optional reason a runner reports after `run` returns.
    pub fn from_cancel_reason(reason: Option<String>) -> Self {
        match reason {
            Some(reason) => RunOutcome::Cancelled { reason },
            None => RunOutcome::Completed,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }

    pub fn cancel_reason(&self) -> Option<&str> {
        match self {
            RunOutcome::Completed => None,
            RunOutcome::Cancelled { reason } => Some(reason),
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed => f.write_str("Parameter sweep completed."),
            RunOutcome::Cancelled { reason } => write!(f, "Parameter sweep cancelled: {reason}"),
        }
    }
}
