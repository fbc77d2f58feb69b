mod constants;
pub use constants::{IMAGE_UNITS, LOG_CAPACITY_BYTES};

mod error;
pub use error::{ConfigError, FieldIssue};

mod config;
pub use config::{HostCommand, LoggingSection, TaskConfig};

mod metrics;
pub use metrics::{
    COMMON_METRICS, CTC_METRICS, MetricBound, MetricOptimum, MetricValue, MetricsDescriptor,
    SPT_METRICS,
};

mod image;
pub use image::{ImageFormat, ImageHandle};

mod outcome;
pub use outcome::RunOutcome;
