//! Halftone screens.

use crate::geometry::Point;

recipe_family! {
    pub enum HalftoneEffect {
        CircularScreen("circular_screen") => CircularScreen("CICircularScreen") {
            center: Option<Point> => Center,
            width: Option<f32> => Width,
            sharpness: Option<f32> => Sharpness,
        },
        /// `gcr` and `ucr` are gray-component and under-color removal.
        CmykHalftone("cmyk_halftone") => CmykHalftone("CICMYKHalftone") {
            center: Option<Point> => Center,
            width: Option<f32> => Width,
            angle: Option<f32> => Angle,
            sharpness: Option<f32> => Sharpness,
            gcr: Option<f32> => Gcr,
            ucr: Option<f32> => Ucr,
        },
        DotScreen("dot_screen") => DotScreen("CIDotScreen") {
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
            width: Option<f32> => Width,
            sharpness: Option<f32> => Sharpness,
        },
        HatchedScreen("hatched_screen") => HatchedScreen("CIHatchedScreen") {
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
            width: Option<f32> => Width,
            sharpness: Option<f32> => Sharpness,
        },
        LineScreen("line_screen") => LineScreen("CILineScreen") {
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
            width: Option<f32> => Width,
            sharpness: Option<f32> => Sharpness,
        },
    }
}
