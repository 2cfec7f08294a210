//! Stylizing operations: masks, convolutions, pixellation and lighting.

use crate::geometry::{Color, Point};
use crate::matrix::Matrix;
use crate::raster::RasterImage;

recipe_family! {
    pub enum Stylize {
        /// Mask alpha 0 shows the background, 1 shows the pipeline image.
        BlendWithAlphaMask("blend_with_alpha_mask") => BlendWithAlphaMask("CIBlendWithAlphaMask") {
            background_image: RasterImage => BackgroundImage,
            mask_image: RasterImage => MaskImage,
        },
        /// Like [`BlendWithAlphaMask`] but driven by mask luminance.
        BlendWithMask("blend_with_mask") => BlendWithMask("CIBlendWithMask") {
            background_image: RasterImage => BackgroundImage,
            mask_image: RasterImage => MaskImage,
        },
        Bloom("bloom") => Bloom("CIBloom") {
            radius: Option<f32> => Radius,
            intensity: Option<f32> => Intensity,
        },
        ComicEffect("comic_effect") => ComicEffect("CIComicEffect") {},
        /// Each output component is the weighted sum of its 3×3 neighborhood
        /// plus `bias`, clamped to `0..=1`.
        Convolution3x3("convolution3x3") => Convolution3x3("CIConvolution3X3") {
            weights: Option<Matrix<f32>> => Weights,
            bias: Option<f32> => Bias,
        },
        Convolution5x5("convolution5x5") => Convolution5x5("CIConvolution5X5") {
            weights: Option<Matrix<f32>> => Weights,
            bias: Option<f32> => Bias,
        },
        Convolution7x7("convolution7x7") => Convolution7x7("CIConvolution7X7") {
            weights: Option<Matrix<f32>> => Weights,
            bias: Option<f32> => Bias,
        },
        /// Nine-tap horizontal kernel.
        Convolution9Horizontal("convolution9_horizontal") => Convolution9Horizontal("CIConvolution9Horizontal") {
            weights: Option<Vec<f32>> => Weights,
            bias: Option<f32> => Bias,
        },
        Convolution9Vertical("convolution9_vertical") => Convolution9Vertical("CIConvolution9Vertical") {
            weights: Option<Vec<f32>> => Weights,
            bias: Option<f32> => Bias,
        },
        Crystallize("crystallize") => Crystallize("CICrystallize") {
            radius: Option<f32> => Radius,
            center: Option<Point> => Center,
        },
        /// Tilt-shift: sharp along the `point0`–`point1` line, blurred away from it.
        DepthOfField("depth_of_field") => DepthOfField("CIDepthOfField") {
            point0: Point => Point0,
            point1: Point => Point1,
            saturation: f32 => Saturation,
            unsharp_mask_radius: f32 => UnsharpMaskRadius,
            unsharp_mask_intensity: f32 => UnsharpMaskIntensity,
            radius: f32 => Radius,
        },
        Edges("edges") => Edges("CIEdges") {
            intensity: Option<f32> => Intensity,
        },
        EdgeWork("edge_work") => EdgeWork("CIEdgeWork") {
            radius: Option<f32> => Radius,
        },
        Gloom("gloom") => Gloom("CIGloom") {
            radius: Option<f32> => Radius,
            intensity: Option<f32> => Intensity,
        },
        HeightFieldFromMask("height_field_from_mask") => HeightFieldFromMask("CIHeightFieldFromMask") {
            radius: Option<f32> => Radius,
        },
        HexagonalPixellate("hexagonal_pixellate") => HexagonalPixellate("CIHexagonalPixellate") {
            center: Option<Point> => Center,
            scale: Option<f32> => Scale,
        },
        HighlightShadowAdjust("highlight_shadow_adjust") => HighlightShadowAdjust("CIHighlightShadowAdjust") {
            highlight_amount: Option<f32> => HighlightAmount,
            shadow_amount: Option<f32> => ShadowAmount,
        },
        /// Sketch-like outline. `nr_*` control the noise-reduction pass.
        LineOverlay("line_overlay") => LineOverlay("CILineOverlay") {
            nr_noise_level: Option<f32> => NrNoiseLevel,
            nr_sharpness: Option<f32> => NrSharpness,
            edge_intensity: Option<f32> => EdgeIntensity,
            threshold: Option<f32> => Threshold,
            contrast: Option<f32> => Contrast,
        },
        /// Square cells of side `scale`, aligned on `center`.
        Pixellate("pixellate") => Pixellate("CIPixellate") {
            center: Option<Point> => Center,
            scale: Option<f32> => Scale,
        },
        Pointillize("pointillize") => Pointillize("CIPointillize") {
            radius: Option<f32> => Radius,
            center: Option<Point> => Center,
        },
        ShadedMaterial("shaded_material") => ShadedMaterial("CIShadedMaterial") {
            shading_image: RasterImage => ShadingImage,
            scale: Option<f32> => Scale,
        },
        /// Replaces up to three color ranges.
        SpotColor("spot_color") => SpotColor("CISpotColor") {
            center_color1: Color => CenterColor1,
            replacement_color1: Color => ReplacementColor1,
            closeness1: Option<f32> => Closeness1,
            contrast1: Option<f32> => Contrast1,
            center_color2: Option<Color> => CenterColor2,
            replacement_color2: Option<Color> => ReplacementColor2,
            closeness2: Option<f32> => Closeness2,
            contrast2: Option<f32> => Contrast2,
            center_color3: Option<Color> => CenterColor3,
            replacement_color3: Option<Color> => ReplacementColor3,
            closeness3: Option<f32> => Closeness3,
            contrast3: Option<f32> => Contrast3,
        },
        /// Positions are `[x, y, z]`.
        SpotLight("spot_light") => SpotLight("CISpotLight") {
            light_position: Option<[f32; 3]> => LightPosition,
            light_points_at: Option<[f32; 3]> => LightPointsAt,
            brightness: Option<f32> => Brightness,
            concentration: Option<f32> => Concentration,
            color: Color => Color,
        },
    }
}
