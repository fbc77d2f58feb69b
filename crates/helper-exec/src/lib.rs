mod image;
pub use image::FsImageLoader;

#[cfg(feature = "proc")]
pub mod proc;
#[cfg(feature = "proc")]
pub use proc::{ProcessRunner, ProcessRunnerBuilder};

mod util;
