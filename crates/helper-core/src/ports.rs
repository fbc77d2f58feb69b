//! Capabilities the launcher needs from its host.
//!
//! The launcher never looks behind these traits: adapters decide how an image is opened,
//! how a request is validated and what running a sweep means.

use std::path::Path;

use async_trait::async_trait;
use helper_model::ImageHandle;

use crate::{
    error::{BuilderError, ExecutionError, ImageLoadError},
    request::RunnerRequest,
};

/// Materialises the source image.
pub trait ImageLoader: Send + Sync {
    fn open(&self, path: &Path) -> Result<ImageHandle, ImageLoadError>;
}

/// Validates a request in one step and turns it into a runner.
pub trait RunnerBuilder: Send + Sync {
    fn build(&self, request: RunnerRequest) -> Result<Box<dyn Runner>, BuilderError>;
}

/// A parameter sweep ready to execute.
#[async_trait]
pub trait Runner: Send {
    fn name(&self) -> &str;

    /// Runs the whole sweep; resolves only once it is over.
    async fn run(&mut self) -> Result<(), ExecutionError>;

    /// Why the last run stopped early, if it did.
    fn cancel_reason(&self) -> Option<String>;
}
