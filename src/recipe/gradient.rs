//! Gradient generators.

use crate::geometry::{Color, Point};

recipe_family! {
    pub enum Gradient {
        /// Gaussian falloff from `color0` at `center` to `color1`.
        Gaussian("gaussian") => GaussianGradient("CIGaussianGradient") {
            center: Option<Point> => Center,
            color0: Color => Color0,
            color1: Color => Color1,
            radius: Option<f32> => Radius,
        },
        Linear("linear") => LinearGradient("CILinearGradient") {
            point0: Option<Point> => Point0,
            point1: Option<Point> => Point1,
            color0: Color => Color0,
            color1: Color => Color1,
        },
        /// Blends between two circles sharing `center`.
        Radial("radial") => RadialGradient("CIRadialGradient") {
            center: Option<Point> => Center,
            radius0: Option<f32> => Radius0,
            radius1: Option<f32> => Radius1,
            color0: Color => Color0,
            color1: Color => Color1,
        },
        /// Linear gradient with an S-curve instead of linear interpolation.
        SmoothLinear("smooth_linear") => SmoothLinearGradient("CISmoothLinearGradient") {
            point0: Option<Point> => Point0,
            point1: Option<Point> => Point1,
            color0: Color => Color0,
            color1: Color => Color1,
        },
    }
}
