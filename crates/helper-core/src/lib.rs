pub mod error;
pub use error::{BuilderError, ExecutionError, ImageLoadError, ImageLoadReason, LaunchError};

pub mod loader;
pub use loader::load_task_file;

pub mod printer;
pub use printer::{print_value, render};

pub mod metrics;
pub use metrics::select_metrics;

pub mod ports;
pub use ports::{ImageLoader, Runner, RunnerBuilder};

pub mod request;
pub use request::RunnerRequest;

pub mod state;
pub use state::LaunchState;

pub mod launcher;
pub use launcher::{Launcher, print_error};
