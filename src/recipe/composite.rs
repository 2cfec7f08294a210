//! Compositing and blend modes.
//!
//! Every operation combines the pipeline image (foreground) with a required
//! `background_image`.

use crate::raster::RasterImage;

recipe_family! {
    pub enum CompositeOperation {
        AdditionCompositing("addition_compositing") => AdditionCompositing("CIAdditionCompositing") {
            background_image: RasterImage => BackgroundImage,
        },
        ColorBlendMode("color_blend_mode") => ColorBlendMode("CIColorBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        ColorBurnBlendMode("color_burn_blend_mode") => ColorBurnBlendMode("CIColorBurnBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        ColorDodgeBlendMode("color_dodge_blend_mode") => ColorDodgeBlendMode("CIColorDodgeBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        DarkenBlendMode("darken_blend_mode") => DarkenBlendMode("CIDarkenBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        DifferenceBlendMode("difference_blend_mode") => DifferenceBlendMode("CIDifferenceBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        DivideBlendMode("divide_blend_mode") => DivideBlendMode("CIDivideBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        ExclusionBlendMode("exclusion_blend_mode") => ExclusionBlendMode("CIExclusionBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        HardLightBlendMode("hard_light_blend_mode") => HardLightBlendMode("CIHardLightBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        HueBlendMode("hue_blend_mode") => HueBlendMode("CIHueBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        LightenBlendMode("lighten_blend_mode") => LightenBlendMode("CILightenBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        LinearBurnBlendMode("linear_burn_blend_mode") => LinearBurnBlendMode("CILinearBurnBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        LinearDodgeBlendMode("linear_dodge_blend_mode") => LinearDodgeBlendMode("CILinearDodgeBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        LuminosityBlendMode("luminosity_blend_mode") => LuminosityBlendMode("CILuminosityBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        MaximumCompositing("maximum_compositing") => MaximumCompositing("CIMaximumCompositing") {
            background_image: RasterImage => BackgroundImage,
        },
        MinimumCompositing("minimum_compositing") => MinimumCompositing("CIMinimumCompositing") {
            background_image: RasterImage => BackgroundImage,
        },
        MultiplyBlendMode("multiply_blend_mode") => MultiplyBlendMode("CIMultiplyBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        MultiplyCompositing("multiply_compositing") => MultiplyCompositing("CIMultiplyCompositing") {
            background_image: RasterImage => BackgroundImage,
        },
        OverlayBlendMode("overlay_blend_mode") => OverlayBlendMode("CIOverlayBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        PinLightBlendMode("pin_light_blend_mode") => PinLightBlendMode("CIPinLightBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        SaturationBlendMode("saturation_blend_mode") => SaturationBlendMode("CISaturationBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        ScreenBlendMode("screen_blend_mode") => ScreenBlendMode("CIScreenBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        SoftLightBlendMode("soft_light_blend_mode") => SoftLightBlendMode("CISoftLightBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
        SourceAtopCompositing("source_atop_compositing") => SourceAtopCompositing("CISourceAtopCompositing") {
            background_image: RasterImage => BackgroundImage,
        },
        SourceInCompositing("source_in_compositing") => SourceInCompositing("CISourceInCompositing") {
            background_image: RasterImage => BackgroundImage,
        },
        SourceOutCompositing("source_out_compositing") => SourceOutCompositing("CISourceOutCompositing") {
            background_image: RasterImage => BackgroundImage,
        },
        SourceOverCompositing("source_over_compositing") => SourceOverCompositing("CISourceOverCompositing") {
            background_image: RasterImage => BackgroundImage,
        },
        SubtractBlendMode("subtract_blend_mode") => SubtractBlendMode("CISubtractBlendMode") {
            background_image: RasterImage => BackgroundImage,
        },
    }
}
