use std::{fmt, path::PathBuf, sync::Arc};

use helper_model::{HostCommand, ImageHandle, MetricsDescriptor, TaskConfig};
use helper_observe::LogSink;

/// Everything a runner builder receives.
pub struct RunnerRequest {
    pub metrics: MetricsDescriptor,
    pub ground_truth_path: PathBuf,
    pub save_folder: PathBuf,
    pub task_definition_path: PathBuf,
    pub image: ImageHandle,
    /// Progress of the sweep as a whole.
    pub batch_logger: Arc<dyn LogSink>,
    /// Output of individual tracking tests.
    pub trackmate_logger: Arc<dyn LogSink>,
    pub target_channel: u32,
    pub save_trackmate_files: bool,
    pub host: Option<HostCommand>,
    /// Where the sinks write, if anywhere.
    pub log_file: Option<PathBuf>,
}

impl RunnerRequest {
    /// Combines a task with the resolved metrics, image and log sink.
    ///
    /// The same sink is bound as both batch and per-test logger.
    pub fn assemble(
        config: &TaskConfig,
        metrics: MetricsDescriptor,
        image: ImageHandle,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            metrics,
            ground_truth_path: config.ground_truth_path.clone(),
            save_folder: config.save_folder.clone(),
            task_definition_path: config.helper_task_definition_path.clone(),
            image,
            batch_logger: Arc::clone(&sink),
            trackmate_logger: sink,
            target_channel: config.target_channel,
            save_trackmate_files: config.save_trackmate_files,
            host: config.host.clone(),
            log_file: config.has_log_file().then(|| config.log_file.clone()),
        }
    }
}

impl fmt::Debug for RunnerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerRequest")
            .field("metrics", &self.metrics)
            .field("ground_truth_path", &self.ground_truth_path)
            .field("save_folder", &self.save_folder)
            .field("task_definition_path", &self.task_definition_path)
            .field("image", &self.image)
            .field("target_channel", &self.target_channel)
            .field("save_trackmate_files", &self.save_trackmate_files)
            .field("host", &self.host)
            .field("log_file", &self.log_file)
            .finish_non_exhaustive()
    }
}
