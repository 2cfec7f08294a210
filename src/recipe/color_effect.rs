//! Color effect operations.

use crate::convert::{CrossPolynomialCoefficients, CubeData};
use crate::geometry::{Color, Point};
use crate::raster::RasterImage;

recipe_family! {
    pub enum ColorEffect {
        /// Each output channel is a degree-3 polynomial over all three input
        /// channels. Each coefficient list must hold exactly ten values
        /// (`1, r, g, b, r², g², b², rg, gb, br`) or it is left unset.
        ColorCrossPolynomial("color_cross_polynomial") => ColorCrossPolynomial("CIColorCrossPolynomial") {
            red: Option<CrossPolynomialCoefficients> => RedCoefficients,
            green: Option<CrossPolynomialCoefficients> => GreenCoefficients,
            blue: Option<CrossPolynomialCoefficients> => BlueCoefficients,
        },
        /// 3D lookup table of `cube_dimension³` RGBA entries.
        ColorCube("color_cube") => ColorCube("CIColorCube") {
            cube_dimension: Option<u32> => CubeDimension,
            cube_data: CubeData => CubeData,
        },
        ColorCubeWithColorSpace("color_cube_with_color_space") => ColorCubeWithColorSpace("CIColorCubeWithColorSpace") {
            cube_dimension: Option<u32> => CubeDimension,
            cube_data: CubeData => CubeData,
            /// Engine color space name, e.g. `"sRGB"`.
            color_space: Option<String> => ColorSpace,
        },
        ColorInvert("color_invert") => ColorInvert("CIColorInvert") {},
        /// Maps luminance through a horizontal gradient image.
        ColorMap("color_map") => ColorMap("CIColorMap") {
            gradient_image: Option<RasterImage> => GradientImage,
        },
        ColorMonochrome("color_monochrome") => ColorMonochrome("CIColorMonochrome") {
            color: Option<Color> => Color,
            intensity: Option<f32> => Intensity,
        },
        ColorPosterize("color_posterize") => ColorPosterize("CIColorPosterize") {
            levels: Option<f32> => Levels,
        },
        /// Maps luminance onto a blend between two colors.
        FalseColor("false_color") => FalseColor("CIFalseColor") {
            color0: Option<Color> => Color0,
            color1: Option<Color> => Color1,
        },
        /// Grayscale to alpha: white becomes opaque, black transparent.
        MaskToAlpha("mask_to_alpha") => MaskToAlpha("CIMaskToAlpha") {},
        MaximumComponent("maximum_component") => MaximumComponent("CIMaximumComponent") {},
        MinimumComponent("minimum_component") => MinimumComponent("CIMinimumComponent") {},
        PhotoEffectChrome("photo_effect_chrome") => PhotoEffectChrome("CIPhotoEffectChrome") {},
        PhotoEffectFade("photo_effect_fade") => PhotoEffectFade("CIPhotoEffectFade") {},
        PhotoEffectInstant("photo_effect_instant") => PhotoEffectInstant("CIPhotoEffectInstant") {},
        PhotoEffectMono("photo_effect_mono") => PhotoEffectMono("CIPhotoEffectMono") {},
        PhotoEffectNoir("photo_effect_noir") => PhotoEffectNoir("CIPhotoEffectNoir") {},
        PhotoEffectProcess("photo_effect_process") => PhotoEffectProcess("CIPhotoEffectProcess") {},
        PhotoEffectTonal("photo_effect_tonal") => PhotoEffectTonal("CIPhotoEffectTonal") {},
        PhotoEffectTransfer("photo_effect_transfer") => PhotoEffectTransfer("CIPhotoEffectTransfer") {},
        SepiaTone("sepia_tone") => SepiaTone("CISepiaTone") {
            intensity: Option<f32> => Intensity,
        },
        Vignette("vignette") => Vignette("CIVignette") {
            radius: Option<f32> => Radius,
            intensity: Option<f32> => Intensity,
        },
        VignetteEffect("vignette_effect") => VignetteEffect("CIVignetteEffect") {
            center: Option<Point> => Center,
            intensity: Option<f32> => Intensity,
            radius: Option<f32> => Radius,
        },
    }
}
