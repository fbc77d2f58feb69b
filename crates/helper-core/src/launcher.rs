use std::{io::Write, path::Path, sync::Arc};

use helper_model::{LOG_CAPACITY_BYTES, RunOutcome, TaskConfig};
use helper_observe::{CircularLogFile, LogSink, NullSink};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    error::LaunchError,
    loader::load_task_file,
    metrics::select_metrics,
    ports::{ImageLoader, RunnerBuilder},
    printer::print_value,
    request::RunnerRequest,
    state::LaunchState,
};

/// Nesting level the task file content is printed at.
const TASK_PRINT_LEVEL: usize = 4;

/// Drives one launch: task file to finished sweep.
///
/// Operator-facing text goes to the writer given to each call; diagnostics go through `tracing`.
pub struct Launcher {
    images: Arc<dyn ImageLoader>,
    builder: Arc<dyn RunnerBuilder>,
    log_capacity: usize,
}

impl Launcher {
    pub fn new(images: Arc<dyn ImageLoader>, builder: Arc<dyn RunnerBuilder>) -> Self {
        Self {
            images,
            builder,
            log_capacity: LOG_CAPACITY_BYTES,
        }
    }

    /// Overrides the byte capacity of the circular run log.
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    /// Loads the task file, then launches it.
    pub async fn run<W: Write>(
        &self,
        task_file: &Path,
        out: &mut W,
    ) -> Result<RunOutcome, LaunchError> {
        let config = self.load(task_file, out)?;
        self.launch(&config, out).await
    }

    /// Reads, echoes and validates a task file.
    pub fn load<W: Write>(&self, task_file: &Path, out: &mut W) -> Result<TaskConfig, LaunchError> {
        say(out, &format!("Task file: {}", task_file.display()));

        let map = load_task_file(task_file)
            .map_err(LaunchError::from)
            .inspect_err(|e| abort(LaunchState::Start, e))?;
        say(out, "Task file content:");
        print_value(out, &Value::Object(map.clone()), TASK_PRINT_LEVEL);

        let config = TaskConfig::from_map(&map)
            .map_err(LaunchError::from)
            .inspect_err(|e| abort(LaunchState::Start, e))?;
        info!(state = %LaunchState::ConfigLoaded, metrics = %config.metrics, "task loaded");
        Ok(config)
    }

    /// Runs the steps after a task is loaded.
    ///
    /// Returns once the runner is done; nothing is retried.
    #[instrument(level = "debug", skip_all, fields(image = %config.source_image_path.display()))]
    pub async fn launch<W: Write>(
        &self,
        config: &TaskConfig,
        out: &mut W,
    ) -> Result<RunOutcome, LaunchError> {
        let mut state = LaunchState::ConfigLoaded;
        let result = self.advance(config, out, &mut state).await;
        if let Err(e) = &result {
            abort(state, e);
        }
        result
    }

    async fn advance<W: Write>(
        &self,
        config: &TaskConfig,
        out: &mut W,
        state: &mut LaunchState,
    ) -> Result<RunOutcome, LaunchError> {
        let metrics = select_metrics(&config.metrics, config.spt_max_linking_distance)?;
        *state = LaunchState::MetricsSelected;
        info!(state = %state, metrics = metrics.tag(), "tracking metrics selected");

        let image = self.images.open(&config.source_image_path)?;
        *state = LaunchState::ImageResolved;
        info!(
            state = %state,
            format = image.format.name(),
            bytes = image.size_bytes,
            "source image opened"
        );

        let sink = self.open_sink(config, out);
        let request = RunnerRequest::assemble(config, metrics, image, sink);
        let mut runner = self.builder.build(request)?;
        *state = LaunchState::RunnerBuilt;
        info!(state = %state, runner = runner.name(), "runner built");

        say(out, "Starting parameter sweep");
        *state = LaunchState::Executing;
        runner.run().await?;

        let outcome = RunOutcome::from_cancel_reason(runner.cancel_reason());
        *state = if outcome.is_completed() {
            LaunchState::Completed
        } else {
            LaunchState::Cancelled
        };
        info!(state = %state, reason = outcome.cancel_reason(), "parameter sweep returned");

        say(out, &outcome.to_string());
        say(out, "Done.");
        Ok(outcome)
    }

    fn open_sink<W: Write>(&self, config: &TaskConfig, out: &mut W) -> Arc<dyn LogSink> {
        if config.has_log_file() {
            say(
                out,
                &format!("Appending log to file: {}", config.log_file.display()),
            );
            Arc::new(CircularLogFile::new(&config.log_file, self.log_capacity))
        } else {
            say(out, "No log file specified.");
            Arc::new(NullSink)
        }
    }
}

/// Prints the operator message for a failed launch.
pub fn print_error<W: Write>(out: &mut W, error: &LaunchError) {
    say(out, &format!("Error. {error}"));
}

fn say<W: Write>(out: &mut W, line: &str) {
    let _ = writeln!(out, "{line}");
}

fn abort(from: LaunchState, error: &LaunchError) {
    warn!(from = %from, state = %LaunchState::AbortedOnError, error = %error, "launch aborted");
}
