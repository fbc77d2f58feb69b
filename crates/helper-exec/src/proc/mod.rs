//! Process-backed runner: the sweep is carried out by a host program.
//!
//! The request is written as JSON into the save folder and its path is passed as the last argument.
//! The host's stdout is forwarded to the batch logger, its stderr to the per-test logger.

mod document;
pub use document::RequestDocument;

use std::{fs, io, path::Path, process::ExitStatus, process::Stdio, sync::Arc};

use async_trait::async_trait;
use helper_core::{BuilderError, ExecutionError, Runner, RunnerBuilder, RunnerRequest};
use helper_model::HostCommand;
use serde_json::Value;
use tracing::{debug, info};

use crate::util::{Channel, cmd_program, forward_lines};

/// Name of the request file written into the save folder.
pub const REQUEST_FILE_NAME: &str = "helper-request.json";

/// Exit code of a host that was interrupted (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Validates requests and builds [`ProcessRunner`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunnerBuilder;

impl ProcessRunnerBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Every problem with the request, one message each.
    pub fn validate(&self, request: &RunnerRequest) -> Vec<String> {
        let mut problems = Vec::new();

        let gt = &request.ground_truth_path;
        if gt.as_os_str().is_empty() {
            problems.push("Please specify the path to a ground-truth file or folder.".to_string());
        } else if !gt.exists() {
            problems.push(format!(
                "Could not find the ground-truth file or folder: {}",
                gt.display()
            ));
        }

        if let Err(msg) = check_settings_file(&request.task_definition_path) {
            problems.push(msg);
        }

        if !is_writable_dir(&request.save_folder) {
            problems.push(format!(
                "Cannot write to results folder: {}",
                request.save_folder.display()
            ));
        }

        if request.target_channel == 0 {
            problems.push("Target channel must be 1 or greater.".to_string());
        }

        if request
            .host
            .as_ref()
            .is_none_or(|h| h.program.trim().is_empty())
        {
            problems.push(
                "Please specify the host program that runs the parameter sweep.".to_string(),
            );
        }

        problems
    }
}

impl RunnerBuilder for ProcessRunnerBuilder {
    fn build(&self, request: RunnerRequest) -> Result<Box<dyn Runner>, BuilderError> {
        let problems = self.validate(&request);
        if !problems.is_empty() {
            debug!(count = problems.len(), "runner request rejected");
            return Err(BuilderError(problems.join("\n")));
        }
        let Some(host) = request.host.clone() else {
            return Err(BuilderError(
                "Please specify the host program that runs the parameter sweep.".to_string(),
            ));
        };
        Ok(Box::new(ProcessRunner::new(request, host)))
    }
}

fn check_settings_file(path: &Path) -> Result<(), String> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => format!(
            "Could not find the helper runner settings file: {}",
            path.display()
        ),
        _ => format!(
            "Could not read the helper runner settings file: {}: {e}",
            path.display()
        ),
    })?;

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(_)) => Ok(()),
        Ok(_) => Err(format!(
            "Could not parse the helper runner settings file: {}: expected a JSON object",
            path.display()
        )),
        Err(e) => Err(format!(
            "Could not parse the helper runner settings file: {}: {e}",
            path.display()
        )),
    }
}

/// Creates and removes a scratch file; permission bits alone do not say whether this user
/// may write.
fn is_writable_dir(path: &Path) -> bool {
    path.is_dir()
        && tempfile::Builder::new()
            .prefix(".helper-write-check")
            .tempfile_in(path)
            .is_ok()
}

/// Runs one sweep through the host program.
pub struct ProcessRunner {
    name: &'static str,
    request: RunnerRequest,
    host: HostCommand,
    cancel_reason: Option<String>,
}

impl ProcessRunner {
    pub fn new(request: RunnerRequest, host: HostCommand) -> Self {
        Self {
            name: "proc",
            request,
            host,
            cancel_reason: None,
        }
    }

    pub fn request_file(&self) -> std::path::PathBuf {
        self.request.save_folder.join(REQUEST_FILE_NAME)
    }

    async fn write_request(&self) -> Result<std::path::PathBuf, ExecutionError> {
        let path = self.request_file();
        let body = serde_json::to_vec_pretty(&RequestDocument::from(&self.request))
            .map_err(|e| ExecutionError::Io(format!("request encoding: {e}")))?;
        tokio::fs::write(&path, body).await?;
        Ok(path)
    }
}

#[async_trait]
impl Runner for ProcessRunner {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(&mut self) -> Result<(), ExecutionError> {
        self.cancel_reason = None;

        let request_file = self.write_request().await?;
        let batch = Arc::clone(&self.request.batch_logger);
        let trackmate = Arc::clone(&self.request.trackmate_logger);

        let mut cmd = cmd_program(&self.host.program, &self.host.args);
        cmd.arg(&request_file)
            .envs(&self.host.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::trace!(
            target: "helper.exec.proc",
            program = %self.host.program,
            args = ?self.host.args,
            "spawn"
        );
        let mut child = cmd.spawn().map_err(|e| ExecutionError::Spawn {
            program: self.host.program.clone(),
            reason: e.to_string(),
        })?;
        batch.set_status("running");
        batch.log(&format!(
            "Parameter sweep on {} with {}",
            self.request.image.path.display(),
            self.request.metrics.name()
        ));

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (status, (), ()) = tokio::join!(
            child.wait(),
            forward_lines(stdout, batch.as_ref(), Channel::Log),
            forward_lines(stderr, trackmate.as_ref(), Channel::Error),
        );
        let status = status?;

        self.cancel_reason = interpret(status)?;
        match &self.cancel_reason {
            None => {
                batch.set_progress(1.0);
                info!(target: "helper.exec.proc", "host program finished");
            }
            Some(reason) => {
                info!(target: "helper.exec.proc", reason = %reason, "host program cancelled")
            }
        }
        batch.set_status("done");
        Ok(())
    }

    fn cancel_reason(&self) -> Option<String> {
        self.cancel_reason.clone()
    }
}

/// Maps the host's exit status to a cancellation reason, or an error for plain failures.
fn interpret(status: ExitStatus) -> Result<Option<String>, ExecutionError> {
    if status.success() {
        return Ok(None);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Ok(Some(format!("host program terminated by signal {signal}")));
        }
    }

    match status.code() {
        Some(INTERRUPTED_EXIT_CODE) => Ok(Some("host program was interrupted".to_string())),
        Some(code) => Err(ExecutionError::NonZeroExit { code }),
        None => Ok(Some("host program terminated without an exit code".to_string())),
    }
}

#[cfg(test)]
mod tests;
