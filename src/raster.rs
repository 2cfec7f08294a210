//! The domain image type: a finite RGBA8 raster.
//!
//! [`RasterImage`] is what callers hand to the executor and what they get
//! back. It is cheap to clone (the pixel buffer is shared), which matters
//! because recipes carry images as parameters (composite backgrounds, masks,
//! displacement maps) and recipes are cloned freely.

use crate::geometry::{Color, Rect, Size};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Deserializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),
}

/// Shared, immutable RGBA8 pixel buffer.
#[derive(Clone)]
pub struct RasterImage(Arc<RgbaImage>);

impl RasterImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self(Arc::new(pixels))
    }

    /// The 0×0 image, returned when nothing at all could be produced.
    pub fn empty() -> Self {
        Self::new(RgbaImage::new(0, 0))
    }

    /// A `width × height` image filled with one color.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, Rgba(color.to_rgba8())))
    }

    /// Decode any format the `image` crate was built with.
    pub fn open(path: &Path) -> Result<Self, RasterError> {
        Ok(Self::new(image::open(path)?.to_rgba8()))
    }

    /// Encode, inferring the format from the extension.
    pub fn save(&self, path: &Path) -> Result<(), RasterError> {
        self.0.save(path)?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn size(&self) -> Size {
        Size::new(self.width() as f32, self.height() as f32)
    }

    /// Bounds anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.0.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// The single color every pixel shares, if the image is uniform.
    pub fn uniform_color(&self) -> Option<[u8; 4]> {
        let mut pixels = self.0.pixels();
        let first = pixels.next()?.0;
        pixels.all(|p| p.0 == first).then_some(first)
    }

    /// SHA-256 over dimensions and raw pixels, as a hex string.
    ///
    /// Two rasters with the same digest are pixel-identical.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width().to_le_bytes());
        hasher.update(self.height().to_le_bytes());
        hasher.update(self.0.as_raw());
        format!("{:x}", hasher.finalize())
    }
}

impl Default for RasterImage {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for RasterImage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RasterImage({}x{})", self.width(), self.height())
    }
}

impl From<RgbaImage> for RasterImage {
    fn from(pixels: RgbaImage) -> Self {
        Self::new(pixels)
    }
}

/// In recipe files an image parameter is a path, decoded when the file is read.
impl<'de> Deserialize<'de> for RasterImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        RasterImage::open(Path::new(&path))
            .map_err(|e| serde::de::Error::custom(format!("failed to load image {path}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_zero_sized() {
        let img = RasterImage::empty();
        assert!(img.is_empty());
        assert_eq!(img.uniform_color(), None);
    }

    #[test]
    fn solid_is_uniform() {
        let img = RasterImage::solid(4, 3, Color::RED);
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 3);
        assert_eq!(img.uniform_color(), Some([255, 0, 0, 255]));
    }

    #[test]
    fn digest_tracks_pixels_and_dimensions() {
        let a = RasterImage::solid(4, 4, Color::BLUE);
        let b = RasterImage::solid(4, 4, Color::BLUE);
        let c = RasterImage::solid(2, 8, Color::BLUE);
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
    }

    #[test]
    fn save_and_open_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("solid.png");
        let img = RasterImage::solid(5, 5, Color::GREEN);
        img.save(&path).unwrap();

        let loaded = RasterImage::open(&path).unwrap();
        assert_eq!(loaded, img);
    }

    #[test]
    fn deserialize_missing_file_is_an_error() {
        #[derive(serde::Deserialize, Debug)]
        struct Wrapper {
            #[allow(dead_code)]
            image: RasterImage,
        }
        let err = toml::from_str::<Wrapper>("image = \"/nonexistent/mask.png\"").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mask.png"));
    }
}
