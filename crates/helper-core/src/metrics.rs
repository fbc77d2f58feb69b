use helper_model::{ConfigError, FieldIssue, MetricsDescriptor, TaskConfig};
use tracing::debug;

use crate::error::LaunchError;

/// Maps the `metrics` value of a task file to a descriptor.
///
/// SPT needs a finite, positive linking distance. CTC ignores it.
pub fn select_metrics(
    metrics: &str,
    spt_max_linking_distance: Option<f64>,
) -> Result<MetricsDescriptor, LaunchError> {
    let descriptor = match metrics.trim() {
        "SPT" => {
            let distance = spt_max_linking_distance.ok_or_else(|| {
                ConfigError::Invalid(vec![FieldIssue::Missing(
                    TaskConfig::SPT_MAX_LINKING_DISTANCE,
                )])
            })?;
            if !distance.is_finite() || distance <= 0.0 {
                return Err(ConfigError::Invalid(vec![FieldIssue::OutOfRange {
                    field: TaskConfig::SPT_MAX_LINKING_DISTANCE,
                    reason: "must be a positive number",
                }])
                .into());
            }
            MetricsDescriptor::spt(distance)
        }
        "CTC" => MetricsDescriptor::ctc(),
        _ => return Err(LaunchError::UnknownMetrics(metrics.to_string())),
    };

    debug!(metrics = descriptor.tag(), name = descriptor.name(), "metrics selected");
    Ok(descriptor)
}
