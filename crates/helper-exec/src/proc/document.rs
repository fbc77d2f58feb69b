use std::path::Path;

use helper_core::RunnerRequest;
use helper_model::{ImageHandle, MetricValue, MetricsDescriptor};
use serde::Serialize;

/// Request file handed to the host program.
#[derive(Debug, Serialize)]
pub struct RequestDocument<'a> {
    pub metrics: &'a MetricsDescriptor,
    pub metrics_name: &'static str,
    pub csv_suffix: &'static str,
    pub default_metric: &'static str,
    pub metric_columns: Vec<MetricValue>,
    pub ground_truth_path: &'a Path,
    pub save_folder: &'a Path,
    pub task_definition_path: &'a Path,
    pub image: &'a ImageHandle,
    pub target_channel: u32,
    pub save_trackmate_files: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<&'a Path>,
}

impl<'a> From<&'a RunnerRequest> for RequestDocument<'a> {
    fn from(r: &'a RunnerRequest) -> Self {
        Self {
            metrics: &r.metrics,
            metrics_name: r.metrics.name(),
            csv_suffix: r.metrics.csv_suffix(),
            default_metric: r.metrics.default_metric().key,
            metric_columns: r.metrics.metrics(),
            ground_truth_path: &r.ground_truth_path,
            save_folder: &r.save_folder,
            task_definition_path: &r.task_definition_path,
            image: &r.image,
            target_channel: r.target_channel,
            save_trackmate_files: r.save_trackmate_files,
            log_file: r.log_file.as_deref(),
        }
    }
}
