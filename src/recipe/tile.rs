//! Tiling operations. All of them produce output of infinite extent.

use crate::geometry::{AffineTransform, Point};

recipe_family! {
    pub enum TileEffect {
        /// Transforms the image and extends its edge pixels outward.
        AffineClamp("affine_clamp") => AffineClamp("CIAffineClamp") {
            transform: AffineTransform => Transform,
        },
        AffineTile("affine_tile") => AffineTile("CIAffineTile") {
            transform: AffineTransform => Transform,
        },
        EightfoldReflectedTile("eightfold_reflected_tile") => EightfoldReflectedTile("CIEightfoldReflectedTile") {
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
            width: Option<f32> => Width,
        },
        FourfoldReflectedTile("fourfold_reflected_tile") => FourfoldReflectedTile("CIFourfoldReflectedTile") {
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
            acute_angle: Option<f32> => AcuteAngle,
            width: Option<f32> => Width,
        },
        FourfoldRotatedTile("fourfold_rotated_tile") => FourfoldRotatedTile("CIFourfoldRotatedTile") {
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
            width: Option<f32> => Width,
        },
        FourfoldTranslatedTile("fourfold_translated_tile") => FourfoldTranslatedTile("CIFourfoldTranslatedTile") {
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
            acute_angle: Option<f32> => AcuteAngle,
            width: Option<f32> => Width,
        },
        GlideReflectedTile("glide_reflected_tile") => GlideReflectedTile("CIGlideReflectedTile") {
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
            width: Option<f32> => Width,
        },
        Kaleidoscope("kaleidoscope") => Kaleidoscope("CIKaleidoscope") {
            count: Option<f32> => Count,
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
        },
        OpTile("op_tile") => OpTile("CIOpTile") {
            center: Option<Point> => Center,
            scale: Option<f32> => Scale,
            angle: Option<f32> => Angle,
            width: Option<f32> => Width,
        },
        ParallelogramTile("parallelogram_tile") => ParallelogramTile("CIParallelogramTile") {
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
            acute_angle: Option<f32> => AcuteAngle,
            width: Option<f32> => Width,
        },
        PerspectiveTile("perspective_tile") => PerspectiveTile("CIPerspectiveTile") {
            top_left: Option<Point> => TopLeft,
            top_right: Option<Point> => TopRight,
            bottom_right: Option<Point> => BottomRight,
            bottom_left: Option<Point> => BottomLeft,
        },
        SixfoldReflectedTile("sixfold_reflected_tile") => SixfoldReflectedTile("CISixfoldReflectedTile") {
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
            width: Option<f32> => Width,
        },
        SixfoldRotatedTile("sixfold_rotated_tile") => SixfoldRotatedTile("CISixfoldRotatedTile") {
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
            width: Option<f32> => Width,
        },
        TriangleKaleidoscope("triangle_kaleidoscope") => TriangleKaleidoscope("CITriangleKaleidoscope") {
            point: Option<Point> => Point,
            size: Option<f32> => Size,
            rotation: Option<f32> => Rotation,
            decay: Option<f32> => Decay,
        },
        TriangleTile("triangle_tile") => TriangleTile("CITriangleTile") {
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
            width: Option<f32> => Width,
        },
        TwelvefoldReflectedTile("twelvefold_reflected_tile") => TwelvefoldReflectedTile("CITwelvefoldReflectedTile") {
            center: Option<Point> => Center,
            angle: Option<f32> => Angle,
            width: Option<f32> => Width,
        },
    }
}
