//! Image header helpers via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Only the header is read;
//! pixel data is never decoded.

use crate::detect::Detection;
use crate::geometry::Corners;
use crate::util::{YoloBoxError, YoloBoxResult};
use std::path::Path;

/// Returns `(width, height)` of the image at `path`.
pub fn image_dimensions<P: AsRef<Path>>(path: P) -> YoloBoxResult<(u32, u32)> {
    image::image_dimensions(path).map_err(|err| YoloBoxError::ImageIo {
        reason: err.to_string(),
    })
}

/// Rescales every detection to the pixel size of the image at `path`.
pub fn corners_for_image<P: AsRef<Path>>(
    detections: &[Detection],
    path: P,
) -> YoloBoxResult<Vec<Corners>> {
    let (width, height) = image_dimensions(path)?;
    Ok(detections
        .iter()
        .map(|det| det.corners_for(width, height))
        .collect())
}
