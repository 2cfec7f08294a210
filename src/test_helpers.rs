//! Shared test utilities.
//!
//! Small raster fixtures built in memory or written to a temp directory.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let red = solid(4, 4, [255, 0, 0, 255]);
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = write_solid_png(tmp.path(), "red.png", 4, 4, [255, 0, 0, 255]);
//! ```

use crate::raster::RasterImage;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// A `width × height` raster filled with `pixel`.
pub fn solid(width: u32, height: u32, pixel: [u8; 4]) -> RasterImage {
    RasterImage::new(RgbaImage::from_pixel(width, height, Rgba(pixel)))
}

/// Opaque horizontal gray ramp, black at `x = 0`.
pub fn gradient(width: u32, height: u32) -> RasterImage {
    let span = width.saturating_sub(1).max(1);
    RasterImage::new(RgbaImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / span) as u8;
        Rgba([v, v, v, 255])
    }))
}

/// Write a solid PNG into `dir` and return its path.
pub fn write_solid_png(
    dir: &Path,
    name: &str,
    width: u32,
    height: u32,
    pixel: [u8; 4],
) -> PathBuf {
    let path = dir.join(name);
    solid(width, height, pixel).save(&path).unwrap();
    path
}

