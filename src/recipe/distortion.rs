//! Geometric distortion operations.

use crate::geometry::{Point, Size};
use crate::raster::RasterImage;

recipe_family! {
    pub enum DistortionEffect {
        /// Concave or convex bump; negative `scale` pinches.
        BumpDistortion("bump_distortion") => BumpDistortion("CIBumpDistortion") {
            center: Option<Point> => Center,
            radius: Option<f32> => Radius,
            scale: Option<f32> => Scale,
        },
        BumpDistortionLinear("bump_distortion_linear") => BumpDistortionLinear("CIBumpDistortionLinear") {
            center: Option<Point> => Center,
            radius: Option<f32> => Radius,
            angle: Option<f32> => Angle,
            scale: Option<f32> => Scale,
        },
        CircleSplashDistortion("circle_splash_distortion") => CircleSplashDistortion("CICircleSplashDistortion") {
            center: Option<Point> => Center,
            radius: Option<f32> => Radius,
        },
        CircularWrap("circular_wrap") => CircularWrap("CICircularWrap") {
            center: Option<Point> => Center,
            radius: Option<f32> => Radius,
            angle: Option<f32> => Angle,
        },
        /// Recursive spiral in the style of M. C. Escher.
        Droste("droste") => Droste("CIDroste") {
            inset_point0: Option<Point> => InsetPoint0,
            inset_point1: Option<Point> => InsetPoint1,
            strands: Option<f32> => Strands,
            periodicity: Option<f32> => Periodicity,
            rotation: Option<f32> => Rotation,
            zoom: Option<f32> => Zoom,
        },
        /// Offsets pixels by the grayscale values of `displacement_image`.
        DisplacementDistortion("displacement_distortion") => DisplacementDistortion("CIDisplacementDistortion") {
            displacement_image: RasterImage => DisplacementImage,
            scale: Option<f32> => Scale,
        },
        GlassDistortion("glass_distortion") => GlassDistortion("CIGlassDistortion") {
            texture: RasterImage => Texture,
            center: Option<Point> => Center,
            scale: Option<f32> => Scale,
        },
        GlassLozenge("glass_lozenge") => GlassLozenge("CIGlassLozenge") {
            point0: Option<Point> => Point0,
            point1: Option<Point> => Point1,
            radius: Option<f32> => Radius,
            refraction: Option<f32> => Refraction,
        },
        HoleDistortion("hole_distortion") => HoleDistortion("CIHoleDistortion") {
            center: Option<Point> => Center,
            radius: Option<f32> => Radius,
        },
        LightTunnel("light_tunnel") => LightTunnel("CILightTunnel") {
            center: Option<Point> => Center,
            rotation: Option<f32> => Rotation,
            radius: Option<f32> => Radius,
        },
        PinchDistortion("pinch_distortion") => PinchDistortion("CIPinchDistortion") {
            center: Option<Point> => Center,
            radius: Option<f32> => Radius,
            scale: Option<f32> => Scale,
        },
        /// Stretches and crops to `size`.
        StretchCrop("stretch_crop") => StretchCrop("CIStretchCrop") {
            size: Size => Size,
            crop_amount: f32 => CropAmount,
            center_stretch_amount: f32 => CenterStretchAmount,
        },
        TorusLensDistortion("torus_lens_distortion") => TorusLensDistortion("CITorusLensDistortion") {
            center: Option<Point> => Center,
            radius: Option<f32> => Radius,
            width: Option<f32> => Width,
            refraction: Option<f32> => Refraction,
        },
        TwirlDistortion("twirl_distortion") => TwirlDistortion("CITwirlDistortion") {
            center: Option<Point> => Center,
            radius: Option<f32> => Radius,
            angle: Option<f32> => Angle,
        },
        VortexDistortion("vortex_distortion") => VortexDistortion("CIVortexDistortion") {
            center: Option<Point> => Center,
            radius: Option<f32> => Radius,
            angle: Option<f32> => Angle,
        },
    }
}
