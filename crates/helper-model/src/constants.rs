/// Spatial units reported with SPT linking distances.
///
/// The task file carries no calibration, so distances are expressed in the image's own units.
pub const IMAGE_UNITS: &str = "image units";

/// Capacity of the circular run log, in bytes.
pub const LOG_CAPACITY_BYTES: usize = 100_000;
