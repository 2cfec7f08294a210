//! Engine option keys.
//!
//! One closed enum instead of string literals scattered through the recipe
//! tables: a misspelt key is a compile error, and the engine-facing string is
//! fixed in exactly one place.

use std::fmt;

macro_rules! option_keys {
    ($($key:ident => $name:literal),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum OptionKey {
            $($key,)*
        }

        impl OptionKey {
            pub const ALL: &'static [OptionKey] = &[$(OptionKey::$key,)*];

            /// The key string the engine expects.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(OptionKey::$key => $name,)*
                }
            }
        }
    };
}

option_keys! {
    AcuteAngle => "inputAcuteAngle",
    AlwaysSpecifyCompaction => "inputAlwaysSpecifyCompaction",
    Amount => "inputAmount",
    Angle => "inputAngle",
    AVector => "inputAVector",
    AlphaCoefficients => "inputAlphaCoefficients",
    BackgroundImage => "inputBackgroundImage",
    Bias => "inputBias",
    BiasVector => "inputBiasVector",
    BlueCoefficients => "inputBlueCoefficients",
    BottomLeft => "inputBottomLeft",
    BottomRight => "inputBottomRight",
    Brightness => "inputBrightness",
    BVector => "inputBVector",
    Center => "inputCenter",
    CenterColor1 => "inputCenterColor1",
    CenterColor2 => "inputCenterColor2",
    CenterColor3 => "inputCenterColor3",
    CenterStretchAmount => "inputCenterStretchAmount",
    Closeness1 => "inputCloseness1",
    Closeness2 => "inputCloseness2",
    Closeness3 => "inputCloseness3",
    Color => "inputColor",
    Color0 => "inputColor0",
    Color1 => "inputColor1",
    ColorSpace => "inputColorSpace",
    CompactionMode => "inputCompactionMode",
    CompactStyle => "inputCompactStyle",
    Concentration => "inputConcentration",
    Contrast => "inputContrast",
    Contrast1 => "inputContrast1",
    Contrast2 => "inputContrast2",
    Contrast3 => "inputContrast3",
    CorrectionLevel => "inputCorrectionLevel",
    Count => "inputCount",
    CropAmount => "inputCropAmount",
    CrossAngle => "inputCrossAngle",
    CrossOpacity => "inputCrossOpacity",
    CrossScale => "inputCrossScale",
    CrossWidth => "inputCrossWidth",
    CubeData => "inputCubeData",
    CubeDimension => "inputCubeDimension",
    DataColumns => "inputDataColumns",
    Decay => "inputDecay",
    DisplacementImage => "inputDisplacementImage",
    EdgeIntensity => "inputEdgeIntensity",
    Epsilon => "inputEpsilon",
    Ev => "inputEV",
    Gcr => "inputGCR",
    GradientImage => "inputGradientImage",
    GreenCoefficients => "inputGreenCoefficients",
    GVector => "inputGVector",
    HaloOverlap => "inputHaloOverlap",
    HaloRadius => "inputHaloRadius",
    HaloWidth => "inputHaloWidth",
    HighlightAmount => "inputHighlightAmount",
    InsetPoint0 => "inputInsetPoint0",
    InsetPoint1 => "inputInsetPoint1",
    Intensity => "inputIntensity",
    Layers => "inputLayers",
    Levels => "inputLevels",
    LightPointsAt => "inputLightPointsAt",
    LightPosition => "inputLightPosition",
    Mask => "inputMask",
    MaskImage => "inputMaskImage",
    MaxComponents => "inputMaxComponents",
    MaxHeight => "inputMaxHeight",
    MaxStriationRadius => "inputMaxStriationRadius",
    MaxWidth => "inputMaxWidth",
    Message => "inputMessage",
    MinComponents => "inputMinComponents",
    MinHeight => "inputMinHeight",
    MinWidth => "inputMinWidth",
    NoiseLevel => "inputNoiseLevel",
    NrNoiseLevel => "inputNRNoiseLevel",
    NrSharpness => "inputNRSharpness",
    Neutral => "inputNeutral",
    Periodicity => "inputPeriodicity",
    Point => "inputPoint",
    Point0 => "inputPoint0",
    Point1 => "inputPoint1",
    Point2 => "inputPoint2",
    Point3 => "inputPoint3",
    Point4 => "inputPoint4",
    Power => "inputPower",
    PreferredAspectRatio => "inputPreferredAspectRatio",
    QuietSpace => "inputQuietSpace",
    Radius => "inputRadius",
    Radius0 => "inputRadius0",
    Radius1 => "inputRadius1",
    RedCoefficients => "inputRedCoefficients",
    Refraction => "inputRefraction",
    ReplacementColor1 => "inputReplacementColor1",
    ReplacementColor2 => "inputReplacementColor2",
    ReplacementColor3 => "inputReplacementColor3",
    Rotation => "inputRotation",
    Rows => "inputRows",
    RVector => "inputRVector",
    Saturation => "inputSaturation",
    Scale => "inputScale",
    ShadingImage => "inputShadingImage",
    ShadowAmount => "inputShadowAmount",
    Sharpness => "inputSharpness",
    Size => "inputSize",
    Strands => "inputStrands",
    StriationContrast => "inputStriationContrast",
    StriationStrength => "inputStriationStrength",
    SunRadius => "inputSunRadius",
    TargetNeutral => "inputTargetNeutral",
    Texture => "inputTexture",
    Threshold => "inputThreshold",
    Time => "inputTime",
    TopLeft => "inputTopLeft",
    TopRight => "inputTopRight",
    Transform => "inputTransform",
    Ucr => "inputUCR",
    UnsharpMaskIntensity => "inputUnsharpMaskIntensity",
    UnsharpMaskRadius => "inputUnsharpMaskRadius",
    Weights => "inputWeights",
    Width => "inputWidth",
    Zoom => "inputZoom",
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn key_strings_are_unique_and_prefixed() {
        let mut seen = HashSet::new();
        for key in OptionKey::ALL {
            let name = key.as_str();
            assert!(name.starts_with("input"), "{name}");
            assert!(seen.insert(name), "duplicate key string {name}");
        }
    }

    #[test]
    fn irregular_capitalization_is_preserved() {
        assert_eq!(OptionKey::Ev.as_str(), "inputEV");
        assert_eq!(OptionKey::Gcr.as_str(), "inputGCR");
        assert_eq!(OptionKey::NrSharpness.as_str(), "inputNRSharpness");
        assert_eq!(OptionKey::BiasVector.to_string(), "inputBiasVector");
    }
}
