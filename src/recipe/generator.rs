//! Generators: operations that produce an image without a primary input.
//!
//! Barcode messages are encoded to bytes during resolution. A message that
//! cannot be represented in the symbology's encoding is left unset, and the
//! engine reports no output for that stage.

use crate::convert::{AsciiMessage, Latin1Message, Pdf417CompactionMode, QrCorrectionLevel};
use crate::geometry::{Color, Point};

recipe_family! {
    pub enum Generator {
        /// ISO/IEC 24778 Aztec symbol, one pixel per module.
        AztecCode("aztec_code") => AztecCodeGenerator("CIAztecCodeGenerator") {
            message: Latin1Message => Message,
            /// Percentage of the symbol used for error correction.
            correction_level: Option<f32> => CorrectionLevel,
            layers: Option<i32> => Layers,
            compact_style: Option<bool> => CompactStyle,
        },
        Checkerboard("checkerboard") => CheckerboardGenerator("CICheckerboardGenerator") {
            center: Option<Point> => Center,
            color0: Color => Color0,
            color1: Color => Color1,
            width: Option<f32> => Width,
            sharpness: Option<f32> => Sharpness,
        },
        /// ISO/IEC 15417 Code 128 barcode.
        Code128Barcode("code128_barcode") => Code128BarcodeGenerator("CICode128BarcodeGenerator") {
            message: AsciiMessage => Message,
            quiet_space: Option<i32> => QuietSpace,
        },
        /// Uniform color over the whole plane.
        ConstantColor("constant_color") => ConstantColorGenerator("CIConstantColorGenerator") {
            color: Color => Color,
        },
        LenticularHalo("lenticular_halo") => LenticularHaloGenerator("CILenticularHaloGenerator") {
            center: Option<Point> => Center,
            color: Color => Color,
            halo_radius: Option<f32> => HaloRadius,
            halo_width: Option<f32> => HaloWidth,
            halo_overlap: Option<f32> => HaloOverlap,
            striation_strength: Option<f32> => StriationStrength,
            striation_contrast: Option<f32> => StriationContrast,
            time: Option<f32> => Time,
        },
        /// ISO 15438 PDF417 symbol.
        Pdf417Barcode("pdf417_barcode") => Pdf417BarcodeGenerator("CIPDF417BarcodeGenerator") {
            message: Latin1Message => Message,
            min_width: Option<i32> => MinWidth,
            max_width: Option<i32> => MaxWidth,
            min_height: Option<i32> => MinHeight,
            max_height: Option<i32> => MaxHeight,
            data_columns: Option<i32> => DataColumns,
            rows: Option<i32> => Rows,
            preferred_aspect_ratio: Option<f32> => PreferredAspectRatio,
            compaction_mode: Option<Pdf417CompactionMode> => CompactionMode,
            compact_style: Option<bool> => CompactStyle,
            correction_level: Option<i32> => CorrectionLevel,
            always_specify_compaction: Option<bool> => AlwaysSpecifyCompaction,
        },
        /// ISO/IEC 18004 QR code.
        QrCode("qr_code") => QrCodeGenerator("CIQRCodeGenerator") {
            message: Latin1Message => Message,
            correction_level: Option<QrCorrectionLevel> => CorrectionLevel,
        },
        /// Four independent uniform random channels in `0..1`.
        Random("random") => RandomGenerator("CIRandomGenerator") {},
        StarShine("star_shine") => StarShineGenerator("CIStarShineGenerator") {
            center: Option<Point> => Center,
            color: Color => Color,
            radius: Option<f32> => Radius,
            cross_scale: Option<f32> => CrossScale,
            cross_angle: Option<f32> => CrossAngle,
            cross_opacity: Option<f32> => CrossOpacity,
            cross_width: Option<f32> => CrossWidth,
            epsilon: Option<f32> => Epsilon,
        },
        Stripes("stripes") => StripesGenerator("CIStripesGenerator") {
            center: Option<Point> => Center,
            color0: Color => Color0,
            color1: Color => Color1,
            width: Option<f32> => Width,
            sharpness: Option<f32> => Sharpness,
        },
        Sunbeams("sunbeams") => SunbeamsGenerator("CISunbeamsGenerator") {
            center: Option<Point> => Center,
            color: Color => Color,
            sun_radius: Option<f32> => SunRadius,
            max_striation_radius: Option<f32> => MaxStriationRadius,
            striation_strength: Option<f32> => StriationStrength,
            striation_contrast: Option<f32> => StriationContrast,
            time: Option<f32> => Time,
        },
    }
}
