use std::{
    fs::{self, File},
    io::{self, Read},
    path::Path,
};

use helper_core::{ImageLoadError, ImageLoadReason, ImageLoader};
use helper_model::{ImageFormat, ImageHandle};
use tracing::debug;

/// Opens source images from the local filesystem.
///
/// Only the leading bytes are read: the container is identified, pixels are left to the runner.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageLoader;

impl FsImageLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ImageLoader for FsImageLoader {
    fn open(&self, path: &Path) -> Result<ImageHandle, ImageLoadError> {
        let fail = |reason| ImageLoadError::new(path, reason);

        let meta = fs::metadata(path).map_err(|e| fail(io_reason(&e)))?;
        if meta.is_dir() {
            return Err(fail(ImageLoadReason::Unreadable("is a directory".into())));
        }

        let mut head = [0u8; ImageFormat::SIGNATURE_LEN];
        let n = File::open(path)
            .and_then(|mut f| read_head(&mut f, &mut head))
            .map_err(|e| fail(io_reason(&e)))?;

        let format = match ImageFormat::from_signature(&head[..n]) {
            Some(format) => format,
            None if n < head.len() => return Err(fail(ImageLoadReason::Corrupt)),
            None => return Err(fail(ImageLoadReason::UnsupportedFormat)),
        };

        debug!(path = %path.display(), format = format.name(), "image header recognised");
        Ok(ImageHandle {
            path: path.to_path_buf(),
            format,
            size_bytes: meta.len(),
        })
    }
}

fn io_reason(e: &io::Error) -> ImageLoadReason {
    match e.kind() {
        io::ErrorKind::NotFound => ImageLoadReason::NotFound,
        _ => ImageLoadReason::Unreadable(e.to_string()),
    }
}

/// Fills `buf` as far as the file allows, returns the byte count.
fn read_head(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
