use std::path::PathBuf;

use serde::Serialize;

/// Image container recognised from its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Tiff,
    BigTiff,
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Number of leading bytes needed to tell every supported format apart.
    pub const SIGNATURE_LEN: usize = 8;

    /// Detects the container from the start of a file.
    ///
    /// Returns `None` for unknown signatures and for headers shorter than the signature they
    /// would need.
    pub fn from_signature(head: &[u8]) -> Option<Self> {
        match head {
            // TIFF headers carry the first IFD offset right after the magic.
            [b'I', b'I', 0x2a, 0x00, _, _, _, _, ..] | [b'M', b'M', 0x00, 0x2a, _, _, _, _, ..] => {
                Some(ImageFormat::Tiff)
            }
            [b'I', b'I', 0x2b, 0x00, _, _, _, _, ..] | [b'M', b'M', 0x00, 0x2b, _, _, _, _, ..] => {
                Some(ImageFormat::BigTiff)
            }
            [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, ..] => Some(ImageFormat::Png),
            [0xff, 0xd8, 0xff, ..] => Some(ImageFormat::Jpeg),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(ImageFormat::Gif),
            [b'B', b'M', ..] => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Tiff => "tiff",
            ImageFormat::BigTiff => "bigtiff",
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
        }
    }
}

/// An opened source image, as handed to the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageHandle {
    pub path: PathBuf,
    pub format: ImageFormat,
    pub size_bytes: u64,
}
