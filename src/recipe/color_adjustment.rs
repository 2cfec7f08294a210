//! Color adjustment operations.
//!
//! Four-component vectors are `[r, g, b, a]` unless noted otherwise.

use crate::geometry::{Color, Point};

recipe_family! {
    pub enum ColorAdjustment {
        /// Clamps every component into `[min_components, max_components]`.
        ColorClamp("color_clamp") => ColorClamp("CIColorClamp") {
            min_components: Option<[f32; 4]> => MinComponents,
            max_components: Option<[f32; 4]> => MaxComponents,
        },
        ColorControls("color_controls") => ColorControls("CIColorControls") {
            saturation: Option<f32> => Saturation,
            brightness: Option<f32> => Brightness,
            contrast: Option<f32> => Contrast,
        },
        /// Each output channel is the dot product of the input pixel with its
        /// vector, plus `bias`.
        ColorMatrix("color_matrix") => ColorMatrix("CIColorMatrix") {
            r: Option<[f32; 4]> => RVector,
            g: Option<[f32; 4]> => GVector,
            b: Option<[f32; 4]> => BVector,
            a: Option<[f32; 4]> => AVector,
            bias: Option<[f32; 4]> => BiasVector,
        },
        /// Cubic polynomial per channel; coefficients are `[c, x, x², x³]`.
        ColorPolynomial("color_polynomial") => ColorPolynomial("CIColorPolynomial") {
            red: Option<[f32; 4]> => RedCoefficients,
            green: Option<[f32; 4]> => GreenCoefficients,
            blue: Option<[f32; 4]> => BlueCoefficients,
            alpha: Option<[f32; 4]> => AlphaCoefficients,
        },
        /// Exposure change in f-stops.
        ExposureAdjust("exposure_adjust") => ExposureAdjust("CIExposureAdjust") {
            ev: Option<f32> => Ev,
        },
        GammaAdjust("gamma_adjust") => GammaAdjust("CIGammaAdjust") {
            power: Option<f32> => Power,
        },
        /// Rotates hue by `angle` radians.
        HueAdjust("hue_adjust") => HueAdjust("CIHueAdjust") {
            angle: Option<f32> => Angle,
        },
        LinearToSrgbToneCurve("linear_to_srgb_tone_curve") => LinearToSrgbToneCurve("CILinearToSRGBToneCurve") {},
        SrgbToneCurveToLinear("srgb_tone_curve_to_linear") => SrgbToneCurveToLinear("CISRGBToneCurveToLinear") {},
        /// Neutral points are `[temperature, tint]`.
        TemperatureAndTint("temperature_and_tint") => TemperatureAndTint("CITemperatureAndTint") {
            neutral: Option<[f32; 2]> => Neutral,
            target_neutral: Option<[f32; 2]> => TargetNeutral,
        },
        /// Spline through five `(tone, lightness)` points.
        ToneCurve("tone_curve") => ToneCurve("CIToneCurve") {
            point0: Option<Point> => Point0,
            point1: Option<Point> => Point1,
            point2: Option<Point> => Point2,
            point3: Option<Point> => Point3,
            point4: Option<Point> => Point4,
        },
        /// Boosts saturation of the less saturated colors.
        Vibrance("vibrance") => Vibrance("CIVibrance") {
            amount: Option<f32> => Amount,
        },
        WhitePointAdjust("white_point_adjust") => WhitePointAdjust("CIWhitePointAdjust") {
            color: Option<Color> => Color,
        },
    }
}
