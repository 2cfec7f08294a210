//! Blur operations.

use crate::geometry::Point;
use crate::raster::RasterImage;

recipe_family! {
    /// Softening and smoothing.
    pub enum Blur {
        /// Averages each pixel with a square neighborhood.
        Box("box") => BoxBlur("CIBoxBlur") {
            radius: Option<f32> => Radius,
        },
        /// Averages each pixel with a circular neighborhood.
        Disc("disc") => DiscBlur("CIDiscBlur") {
            radius: Option<f32> => Radius,
        },
        /// Gaussian-weighted blur; `radius` is the standard deviation.
        Gaussian("gaussian") => GaussianBlur("CIGaussianBlur") {
            radius: Option<f32> => Radius,
        },
        /// Blur strength follows the grayscale values of `mask`.
        MaskedVariable("masked_variable") => MaskedVariableBlur("CIMaskedVariableBlur") {
            mask: Option<RasterImage> => Mask,
            radius: Option<f32> => Radius,
        },
        /// 3×3 median, removing speckle noise.
        Median("median") => MedianFilter("CIMedianFilter") {},
        /// Blur along a direction, as if the camera moved during exposure.
        Motion("motion") => MotionBlur("CIMotionBlur") {
            radius: Option<f32> => Radius,
            angle: Option<f32> => Angle,
        },
        NoiseReduction("noise_reduction") => NoiseReduction("CINoiseReduction") {
            noise_level: Option<f32> => NoiseLevel,
            sharpness: Option<f32> => Sharpness,
        },
        /// Radial blur around `center`, as if zooming during exposure.
        Zoom("zoom") => ZoomBlur("CIZoomBlur") {
            center: Option<Point> => Center,
            amount: Option<f32> => Amount,
        },
    }
}
