//! Conversion of domain values into the engine's primitive value formats.
//!
//! Two traits meet here:
//!
//! - [`EngineConvertible`] is the capability of a domain type (point, rect,
//!   size, transform, color, image, numeric matrix) to become an
//!   [`EngineValue`]. The set of implementors is closed; there is no runtime
//!   type inspection and no error path.
//! - [`OptionParam`] bridges a recipe field to an option-list entry. Required
//!   fields always produce `Some`, `Option<T>` fields produce `None` when the
//!   caller left them unset, and the normalization newtypes below may drop a
//!   value that the engine could not accept.

use crate::geometry::{AffineTransform, Color, Point, Rect, Size};
use crate::matrix::{Matrix, Numeric};
use crate::raster::RasterImage;
use serde::Deserialize;
use tracing::{debug, warn};

/// A value in the engine's own vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineValue {
    Float(f32),
    Integer(i64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
    Vector(Vec<f32>),
    Color([f32; 4]),
    Transform([f32; 6]),
    Image(RasterImage),
}

impl EngineValue {
    pub fn as_float(&self) -> Option<f32> {
        match self {
            EngineValue::Float(v) => Some(*v),
            EngineValue::Integer(v) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f32]> {
        match self {
            EngineValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<[f32; 4]> {
        match self {
            EngineValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&RasterImage> {
        match self {
            EngineValue::Image(img) => Some(img),
            _ => None,
        }
    }

    /// Short variant name for reports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineValue::Float(_) => "float",
            EngineValue::Integer(_) => "integer",
            EngineValue::Bool(_) => "bool",
            EngineValue::Text(_) => "text",
            EngineValue::Bytes(_) => "bytes",
            EngineValue::Vector(_) => "vector",
            EngineValue::Color(_) => "color",
            EngineValue::Transform(_) => "transform",
            EngineValue::Image(_) => "image",
        }
    }
}

/// Domain types that have a fixed engine representation.
pub trait EngineConvertible {
    fn engine_value(&self) -> EngineValue;
}

impl EngineConvertible for Point {
    fn engine_value(&self) -> EngineValue {
        EngineValue::Vector(vec![self.x, self.y])
    }
}

impl EngineConvertible for Rect {
    fn engine_value(&self) -> EngineValue {
        EngineValue::Vector(vec![self.x, self.y, self.width, self.height])
    }
}

impl EngineConvertible for Size {
    fn engine_value(&self) -> EngineValue {
        EngineValue::Vector(vec![self.width, self.height])
    }
}

impl EngineConvertible for AffineTransform {
    fn engine_value(&self) -> EngineValue {
        EngineValue::Transform([self.a, self.b, self.c, self.d, self.tx, self.ty])
    }
}

impl EngineConvertible for Color {
    fn engine_value(&self) -> EngineValue {
        EngineValue::Color([self.r, self.g, self.b, self.a])
    }
}

impl EngineConvertible for RasterImage {
    fn engine_value(&self) -> EngineValue {
        EngineValue::Image(self.clone())
    }
}

impl<T: Numeric> EngineConvertible for Matrix<T> {
    fn engine_value(&self) -> EngineValue {
        EngineValue::Vector(self.as_slice().iter().map(|v| v.to_engine_float()).collect())
    }
}

/// A recipe field as it appears in the resolved option list.
pub trait OptionParam {
    fn to_option(&self) -> Option<EngineValue>;
}

impl<T: OptionParam> OptionParam for Option<T> {
    fn to_option(&self) -> Option<EngineValue> {
        self.as_ref().and_then(OptionParam::to_option)
    }
}

macro_rules! convertible_params {
    ($($t:ty),* $(,)?) => {
        $(impl OptionParam for $t {
            fn to_option(&self) -> Option<EngineValue> {
                Some(self.engine_value())
            }
        })*
    };
}

convertible_params!(Point, Rect, Size, AffineTransform, Color, RasterImage);

impl<T: Numeric> OptionParam for Matrix<T> {
    fn to_option(&self) -> Option<EngineValue> {
        Some(self.engine_value())
    }
}

impl OptionParam for f32 {
    fn to_option(&self) -> Option<EngineValue> {
        Some(EngineValue::Float(*self))
    }
}

impl OptionParam for i32 {
    fn to_option(&self) -> Option<EngineValue> {
        Some(EngineValue::Integer(i64::from(*self)))
    }
}

impl OptionParam for u32 {
    fn to_option(&self) -> Option<EngineValue> {
        Some(EngineValue::Integer(i64::from(*self)))
    }
}

impl OptionParam for bool {
    fn to_option(&self) -> Option<EngineValue> {
        Some(EngineValue::Bool(*self))
    }
}

impl OptionParam for String {
    fn to_option(&self) -> Option<EngineValue> {
        Some(EngineValue::Text(self.clone()))
    }
}

impl OptionParam for Vec<u8> {
    fn to_option(&self) -> Option<EngineValue> {
        Some(EngineValue::Bytes(self.clone()))
    }
}

impl OptionParam for Vec<f32> {
    fn to_option(&self) -> Option<EngineValue> {
        Some(EngineValue::Vector(self.clone()))
    }
}

impl<const N: usize> OptionParam for [f32; N] {
    fn to_option(&self) -> Option<EngineValue> {
        Some(EngineValue::Vector(self.to_vec()))
    }
}

/// Ten coefficients for one output channel of a cross polynomial.
///
/// The engine only accepts exactly ten; any other length is left unset so
/// the engine default applies.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct CrossPolynomialCoefficients(pub Vec<f32>);

impl CrossPolynomialCoefficients {
    pub const LEN: usize = 10;
}

impl OptionParam for CrossPolynomialCoefficients {
    fn to_option(&self) -> Option<EngineValue> {
        if self.0.len() == Self::LEN {
            Some(EngineValue::Vector(self.0.clone()))
        } else {
            debug!(
                len = self.0.len(),
                "cross polynomial needs {} coefficients, leaving unset",
                Self::LEN
            );
            None
        }
    }
}

/// Color cube lookup table: RGBA float entries, red varying fastest.
///
/// The engine takes the table as a byte blob of packed little-endian `f32`s.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct CubeData(pub Vec<f32>);

impl CubeData {
    /// Identity table for a cube of `dimension³` entries.
    pub fn identity(dimension: u32) -> Self {
        let n = dimension.max(2) as usize;
        let step = 1.0 / (n - 1) as f32;
        let mut values = Vec::with_capacity(n * n * n * 4);
        for b in 0..n {
            for g in 0..n {
                for r in 0..n {
                    values.extend([r as f32 * step, g as f32 * step, b as f32 * step, 1.0]);
                }
            }
        }
        Self(values)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|v| v.to_le_bytes()).collect()
    }
}

impl OptionParam for CubeData {
    fn to_option(&self) -> Option<EngineValue> {
        Some(EngineValue::Bytes(self.to_bytes()))
    }
}

/// Barcode payload sent as ISO-8859-1 bytes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Latin1Message(pub String);

impl Latin1Message {
    /// ISO-8859-1 maps code points 0..=255 one-to-one onto bytes.
    pub fn encode(&self) -> Option<Vec<u8>> {
        self.0.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect()
    }
}

impl From<&str> for Latin1Message {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl OptionParam for Latin1Message {
    fn to_option(&self) -> Option<EngineValue> {
        let bytes = self.encode();
        if bytes.is_none() {
            warn!(message = %self.0, "message is not representable in ISO-8859-1");
        }
        bytes.map(EngineValue::Bytes)
    }
}

/// Barcode payload sent as US-ASCII bytes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct AsciiMessage(pub String);

impl AsciiMessage {
    pub fn encode(&self) -> Option<Vec<u8>> {
        self.0.is_ascii().then(|| self.0.as_bytes().to_vec())
    }
}

impl From<&str> for AsciiMessage {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl OptionParam for AsciiMessage {
    fn to_option(&self) -> Option<EngineValue> {
        let bytes = self.encode();
        if bytes.is_none() {
            warn!(message = %self.0, "message is not representable in US-ASCII");
        }
        bytes.map(EngineValue::Bytes)
    }
}

/// Error correction level for QR and Aztec symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum QrCorrectionLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl QrCorrectionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            QrCorrectionLevel::L => "L",
            QrCorrectionLevel::M => "M",
            QrCorrectionLevel::Q => "Q",
            QrCorrectionLevel::H => "H",
        }
    }
}

impl OptionParam for QrCorrectionLevel {
    fn to_option(&self) -> Option<EngineValue> {
        Some(EngineValue::Text(self.as_str().to_string()))
    }
}

/// PDF417 compaction mode, sent as its numeric code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pdf417CompactionMode {
    #[default]
    Automatic,
    Numeric,
    Text,
    Byte,
}

impl Pdf417CompactionMode {
    pub fn code(&self) -> i64 {
        match self {
            Pdf417CompactionMode::Automatic => 1,
            Pdf417CompactionMode::Numeric => 2,
            Pdf417CompactionMode::Text => 3,
            Pdf417CompactionMode::Byte => 4,
        }
    }
}

impl OptionParam for Pdf417CompactionMode {
    fn to_option(&self) -> Option<EngineValue> {
        Some(EngineValue::Integer(self.code()))
    }
}
