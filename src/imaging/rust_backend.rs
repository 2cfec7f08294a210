//! Pure Rust processing engine on top of the `image` crate.
//!
//! ## Operation mapping
//!
//! | Token group | Implementation |
//! |---|---|
//! | Color adjustments and effects | per-pixel closures from [`kernels`](super::kernels), composed lazily on procedural images |
//! | Blur, sharpen, convolution, pixellate, edges | clamp-to-edge kernels over an `RgbaImage` |
//! | Blend modes and compositing | W3C compositing formulas, sampled over the union of both inputs |
//! | Generators and gradients | infinite procedural samplers |
//! | Render | `image::imageops::crop_imm` for in-bounds rasters, sampling otherwise |
//!
//! Coordinates are pixels with the origin at the top-left corner. Tokens not
//! listed in the operation table are unknown to this engine.

use super::backend::{EngineError, EngineImage, EngineOperation, ProcessingEngine};
use super::calculations::{box_kernel, luminance, pixel_region, square_kernel_side};
use super::kernels::{self, BlendMode, Rgba32, TRANSPARENT};
use crate::convert::EngineValue;
use crate::geometry::{Extent, Rect};
use crate::raster::RasterImage;
use crate::recipe::{OptionKey, Token};
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tracing::debug;

/// Default ceiling on the number of pixels a single render may produce.
pub const DEFAULT_MAX_PIXELS: u64 = 1 << 28;

type Sampler = Arc<dyn Fn(f32, f32) -> Rgba32 + Send + Sync>;
type ColorFn = Arc<dyn Fn(Rgba32) -> Rgba32 + Send + Sync>;

/// Engine image for [`RustEngine`].
#[derive(Clone)]
pub enum RustImage {
    Empty,
    /// A finite raster anchored at the origin.
    Raster(RasterImage),
    /// Defined everywhere, sampled at pixel centers.
    Procedural(Sampler),
}

impl fmt::Debug for RustImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RustImage::Empty => f.write_str("Empty"),
            RustImage::Raster(img) => write!(f, "Raster({}x{})", img.width(), img.height()),
            RustImage::Procedural(_) => f.write_str("Procedural"),
        }
    }
}

impl EngineImage for RustImage {
    fn extent(&self) -> Extent {
        match self {
            RustImage::Empty => Extent::Empty,
            RustImage::Raster(img) if img.is_empty() => Extent::Empty,
            RustImage::Raster(img) => Extent::Finite(img.bounds()),
            RustImage::Procedural(_) => Extent::Infinite,
        }
    }
}

impl RustImage {
    fn sample(&self, x: f32, y: f32) -> Rgba32 {
        match self {
            RustImage::Empty => TRANSPARENT,
            RustImage::Raster(img) => sample_raster(img, x, y),
            RustImage::Procedural(f) => f(x, y),
        }
    }

    fn sampler(&self) -> Sampler {
        match self {
            RustImage::Empty => Arc::new(|_, _| TRANSPARENT),
            RustImage::Raster(img) => {
                let img = img.clone();
                Arc::new(move |x, y| sample_raster(&img, x, y))
            }
            RustImage::Procedural(f) => Arc::clone(f),
        }
    }
}

fn sample_raster(img: &RasterImage, x: f32, y: f32) -> Rgba32 {
    let (px, py) = (x.floor(), y.floor());
    if px < 0.0 || py < 0.0 {
        return TRANSPARENT;
    }
    img.pixel(px as u32, py as u32)
        .map(kernels::to_float)
        .unwrap_or(TRANSPARENT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorOp {
    Controls,
    Matrix,
    Clamp,
    Polynomial,
    Exposure,
    Gamma,
    Hue,
    Invert,
    Monochrome,
    Posterize,
    FalseColor,
    MaskToAlpha,
    MaximumComponent,
    MinimumComponent,
    PhotoMono,
    PhotoNoir,
    PhotoTonal,
    Sepia,
    Vibrance,
    LinearToSrgb,
    SrgbToLinear,
    WhitePoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpatialOp {
    GaussianBlur,
    BoxBlur,
    Median,
    UnsharpMask,
    SharpenLuminance,
    Convolution { side: usize },
    Convolution9 { horizontal: bool },
    Pixellate,
    Edges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GeneratorOp {
    ConstantColor,
    Checkerboard,
    Stripes,
    Random,
    LinearGradient,
    SmoothLinearGradient,
    RadialGradient,
    GaussianGradient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpKind {
    Color(ColorOp),
    Spatial(SpatialOp),
    Composite(BlendMode),
    BlendWithMask,
    Generator(GeneratorOp),
}

static OPERATIONS: LazyLock<HashMap<&'static str, OpKind>> = LazyLock::new(|| {
    use OpKind::*;
    HashMap::from([
        ("CIColorControls", Color(ColorOp::Controls)),
        ("CIColorMatrix", Color(ColorOp::Matrix)),
        ("CIColorClamp", Color(ColorOp::Clamp)),
        ("CIColorPolynomial", Color(ColorOp::Polynomial)),
        ("CIExposureAdjust", Color(ColorOp::Exposure)),
        ("CIGammaAdjust", Color(ColorOp::Gamma)),
        ("CIHueAdjust", Color(ColorOp::Hue)),
        ("CIColorInvert", Color(ColorOp::Invert)),
        ("CIColorMonochrome", Color(ColorOp::Monochrome)),
        ("CIColorPosterize", Color(ColorOp::Posterize)),
        ("CIFalseColor", Color(ColorOp::FalseColor)),
        ("CIMaskToAlpha", Color(ColorOp::MaskToAlpha)),
        ("CIMaximumComponent", Color(ColorOp::MaximumComponent)),
        ("CIMinimumComponent", Color(ColorOp::MinimumComponent)),
        ("CIPhotoEffectMono", Color(ColorOp::PhotoMono)),
        ("CIPhotoEffectNoir", Color(ColorOp::PhotoNoir)),
        ("CIPhotoEffectTonal", Color(ColorOp::PhotoTonal)),
        ("CISepiaTone", Color(ColorOp::Sepia)),
        ("CIVibrance", Color(ColorOp::Vibrance)),
        ("CILinearToSRGBToneCurve", Color(ColorOp::LinearToSrgb)),
        ("CISRGBToneCurveToLinear", Color(ColorOp::SrgbToLinear)),
        ("CIWhitePointAdjust", Color(ColorOp::WhitePoint)),
        ("CIGaussianBlur", Spatial(SpatialOp::GaussianBlur)),
        ("CIBoxBlur", Spatial(SpatialOp::BoxBlur)),
        ("CIMedianFilter", Spatial(SpatialOp::Median)),
        ("CIUnsharpMask", Spatial(SpatialOp::UnsharpMask)),
        ("CISharpenLuminance", Spatial(SpatialOp::SharpenLuminance)),
        ("CIConvolution3X3", Spatial(SpatialOp::Convolution { side: 3 })),
        ("CIConvolution5X5", Spatial(SpatialOp::Convolution { side: 5 })),
        ("CIConvolution7X7", Spatial(SpatialOp::Convolution { side: 7 })),
        ("CIConvolution9Horizontal", Spatial(SpatialOp::Convolution9 { horizontal: true })),
        ("CIConvolution9Vertical", Spatial(SpatialOp::Convolution9 { horizontal: false })),
        ("CIPixellate", Spatial(SpatialOp::Pixellate)),
        ("CIEdges", Spatial(SpatialOp::Edges)),
        ("CISourceOverCompositing", Composite(BlendMode::SourceOver)),
        ("CISourceAtopCompositing", Composite(BlendMode::SourceAtop)),
        ("CISourceInCompositing", Composite(BlendMode::SourceIn)),
        ("CISourceOutCompositing", Composite(BlendMode::SourceOut)),
        ("CIAdditionCompositing", Composite(BlendMode::Addition)),
        ("CIMultiplyCompositing", Composite(BlendMode::MultiplyCompositing)),
        ("CIMaximumCompositing", Composite(BlendMode::Maximum)),
        ("CIMinimumCompositing", Composite(BlendMode::Minimum)),
        ("CIMultiplyBlendMode", Composite(BlendMode::Multiply)),
        ("CIScreenBlendMode", Composite(BlendMode::Screen)),
        ("CIOverlayBlendMode", Composite(BlendMode::Overlay)),
        ("CIDarkenBlendMode", Composite(BlendMode::Darken)),
        ("CILightenBlendMode", Composite(BlendMode::Lighten)),
        ("CIColorDodgeBlendMode", Composite(BlendMode::ColorDodge)),
        ("CIColorBurnBlendMode", Composite(BlendMode::ColorBurn)),
        ("CIHardLightBlendMode", Composite(BlendMode::HardLight)),
        ("CISoftLightBlendMode", Composite(BlendMode::SoftLight)),
        ("CIDifferenceBlendMode", Composite(BlendMode::Difference)),
        ("CIExclusionBlendMode", Composite(BlendMode::Exclusion)),
        ("CISubtractBlendMode", Composite(BlendMode::Subtract)),
        ("CIDivideBlendMode", Composite(BlendMode::Divide)),
        ("CILinearBurnBlendMode", Composite(BlendMode::LinearBurn)),
        ("CILinearDodgeBlendMode", Composite(BlendMode::LinearDodge)),
        ("CIPinLightBlendMode", Composite(BlendMode::PinLight)),
        ("CIHueBlendMode", Composite(BlendMode::Hue)),
        ("CISaturationBlendMode", Composite(BlendMode::Saturation)),
        ("CIColorBlendMode", Composite(BlendMode::Color)),
        ("CILuminosityBlendMode", Composite(BlendMode::Luminosity)),
        ("CIBlendWithMask", BlendWithMask),
        ("CIConstantColorGenerator", Generator(GeneratorOp::ConstantColor)),
        ("CICheckerboardGenerator", Generator(GeneratorOp::Checkerboard)),
        ("CIStripesGenerator", Generator(GeneratorOp::Stripes)),
        ("CIRandomGenerator", Generator(GeneratorOp::Random)),
        ("CILinearGradient", Generator(GeneratorOp::LinearGradient)),
        ("CISmoothLinearGradient", Generator(GeneratorOp::SmoothLinearGradient)),
        ("CIRadialGradient", Generator(GeneratorOp::RadialGradient)),
        ("CIGaussianGradient", Generator(GeneratorOp::GaussianGradient)),
    ])
});

/// Tokens this engine can create operations for.
pub fn supported_tokens() -> Vec<&'static str> {
    let mut tokens: Vec<&'static str> = OPERATIONS.keys().copied().collect();
    tokens.sort_unstable();
    tokens
}

/// Typed reads over the options set on an operation.
///
/// A missing key or a value of the wrong kind reads as the default.
struct Options<'a>(&'a HashMap<OptionKey, EngineValue>);

impl Options<'_> {
    fn float(&self, key: OptionKey, default: f32) -> f32 {
        self.0.get(&key).and_then(EngineValue::as_float).unwrap_or(default)
    }

    fn point(&self, key: OptionKey, default: (f32, f32)) -> (f32, f32) {
        match self.vector(key) {
            Some([x, y]) => (*x, *y),
            _ => default,
        }
    }

    fn color(&self, key: OptionKey, default: Rgba32) -> Rgba32 {
        self.0.get(&key).and_then(EngineValue::as_color).unwrap_or(default)
    }

    fn vec4(&self, key: OptionKey, default: Rgba32) -> Rgba32 {
        match self.vector(key) {
            Some(&[a, b, c, d]) => [a, b, c, d],
            _ => default,
        }
    }

    fn vector(&self, key: OptionKey) -> Option<&[f32]> {
        self.0.get(&key).and_then(EngineValue::as_vector)
    }

    fn image(&self, key: OptionKey) -> Option<&RasterImage> {
        self.0.get(&key).and_then(EngineValue::as_image)
    }
}

const OPAQUE_BLACK: Rgba32 = [0.0, 0.0, 0.0, 1.0];
const OPAQUE_WHITE: Rgba32 = [1.0, 1.0, 1.0, 1.0];

/// One operation instance: its kind, its input, and the options set so far.
pub struct RustOperation {
    token: Token,
    kind: OpKind,
    input: Option<RustImage>,
    options: HashMap<OptionKey, EngineValue>,
}

impl EngineOperation for RustOperation {
    type Image = RustImage;

    fn set_defaults(&mut self) {
        self.options.clear();
    }

    fn set_input(&mut self, image: RustImage) {
        self.input = Some(image);
    }

    fn set_option(&mut self, key: OptionKey, value: EngineValue) {
        self.options.insert(key, value);
    }

    fn output(&self) -> Option<RustImage> {
        let opts = Options(&self.options);
        let out = match self.kind {
            OpKind::Generator(op) => Some(RustImage::Procedural(generator(op, &opts))),
            OpKind::Color(op) => {
                let f = color_fn(op, &opts);
                match self.input.as_ref()? {
                    RustImage::Empty => None,
                    RustImage::Raster(img) => Some(RustImage::Raster(RasterImage::new(
                        kernels::map_pixels(img.pixels(), |c| f(c)),
                    ))),
                    RustImage::Procedural(s) => {
                        let s = Arc::clone(s);
                        Some(RustImage::Procedural(Arc::new(move |x, y| f(s(x, y)))))
                    }
                }
            }
            OpKind::Spatial(op) => match self.input.as_ref()? {
                RustImage::Raster(img) if !img.is_empty() => Some(RustImage::Raster(
                    RasterImage::new(spatial(op, img.pixels(), &opts)),
                )),
                _ => None,
            },
            OpKind::Composite(mode) => {
                let source = self.input.as_ref()?;
                let backdrop = RustImage::Raster(opts.image(OptionKey::BackgroundImage)?.clone());
                composite(source, &backdrop, move |s, b| kernels::blend(mode, s, b))
            }
            OpKind::BlendWithMask => {
                let source = self.input.as_ref()?;
                let backdrop = RustImage::Raster(opts.image(OptionKey::BackgroundImage)?.clone());
                let mask = RustImage::Raster(opts.image(OptionKey::MaskImage)?.clone());
                blend_with_mask(source, &backdrop, &mask)
            }
        };
        if out.is_none() {
            debug!(token = %self.token, input = ?self.input, "no output");
        }
        out
    }
}

fn color_fn(op: ColorOp, o: &Options) -> ColorFn {
    match op {
        ColorOp::Controls => {
            let (s, b, c) = (
                o.float(OptionKey::Saturation, 1.0),
                o.float(OptionKey::Brightness, 0.0),
                o.float(OptionKey::Contrast, 1.0),
            );
            Arc::new(move |px| kernels::color_controls(px, s, b, c))
        }
        ColorOp::Matrix => {
            let vectors = [
                o.vec4(OptionKey::RVector, [1.0, 0.0, 0.0, 0.0]),
                o.vec4(OptionKey::GVector, [0.0, 1.0, 0.0, 0.0]),
                o.vec4(OptionKey::BVector, [0.0, 0.0, 1.0, 0.0]),
                o.vec4(OptionKey::AVector, [0.0, 0.0, 0.0, 1.0]),
            ];
            let bias = o.vec4(OptionKey::BiasVector, [0.0; 4]);
            Arc::new(move |px| kernels::color_matrix(px, vectors, bias))
        }
        ColorOp::Clamp => {
            let min = o.vec4(OptionKey::MinComponents, [0.0; 4]);
            let max = o.vec4(OptionKey::MaxComponents, [1.0; 4]);
            Arc::new(move |px| kernels::color_clamp(px, min, max))
        }
        ColorOp::Polynomial => {
            let identity = [0.0, 1.0, 0.0, 0.0];
            let coefficients = [
                o.vec4(OptionKey::RedCoefficients, identity),
                o.vec4(OptionKey::GreenCoefficients, identity),
                o.vec4(OptionKey::BlueCoefficients, identity),
                o.vec4(OptionKey::AlphaCoefficients, identity),
            ];
            Arc::new(move |px| kernels::color_polynomial(px, coefficients))
        }
        ColorOp::Exposure => {
            let ev = o.float(OptionKey::Ev, 0.5);
            Arc::new(move |px| kernels::exposure(px, ev))
        }
        ColorOp::Gamma => {
            let power = o.float(OptionKey::Power, 1.0);
            Arc::new(move |px| kernels::gamma(px, power))
        }
        ColorOp::Hue => {
            let angle = o.float(OptionKey::Angle, 0.0);
            Arc::new(move |px| kernels::hue_adjust(px, angle))
        }
        ColorOp::Invert => Arc::new(kernels::invert),
        ColorOp::Monochrome => {
            let color = o.color(OptionKey::Color, [0.6, 0.45, 0.3, 1.0]);
            let intensity = o.float(OptionKey::Intensity, 1.0);
            Arc::new(move |px| kernels::monochrome(px, color, intensity))
        }
        ColorOp::Posterize => {
            let levels = o.float(OptionKey::Levels, 6.0);
            Arc::new(move |px| kernels::posterize(px, levels))
        }
        ColorOp::FalseColor => {
            let c0 = o.color(OptionKey::Color0, [0.3, 0.0, 0.0, 1.0]);
            let c1 = o.color(OptionKey::Color1, [1.0, 0.9, 0.8, 1.0]);
            Arc::new(move |px| kernels::false_color(px, c0, c1))
        }
        ColorOp::MaskToAlpha => Arc::new(kernels::mask_to_alpha),
        ColorOp::MaximumComponent => Arc::new(kernels::maximum_component),
        ColorOp::MinimumComponent => Arc::new(kernels::minimum_component),
        ColorOp::PhotoMono => Arc::new(|px| kernels::photo_mono(px, 0.3)),
        ColorOp::PhotoNoir => Arc::new(|px| kernels::photo_mono(px, 1.0)),
        ColorOp::PhotoTonal => Arc::new(|px| kernels::photo_mono(px, 0.0)),
        ColorOp::Sepia => {
            let intensity = o.float(OptionKey::Intensity, 1.0);
            Arc::new(move |px| kernels::sepia(px, intensity))
        }
        ColorOp::Vibrance => {
            let amount = o.float(OptionKey::Amount, 0.0);
            Arc::new(move |px| kernels::vibrance(px, amount))
        }
        ColorOp::LinearToSrgb => Arc::new(kernels::linear_to_srgb),
        ColorOp::SrgbToLinear => Arc::new(kernels::srgb_to_linear),
        ColorOp::WhitePoint => {
            let white = o.color(OptionKey::Color, OPAQUE_WHITE);
            Arc::new(move |px| kernels::white_point(px, white))
        }
    }
}

fn identity_kernel(len: usize) -> Vec<f32> {
    let mut k = vec![0.0; len];
    k[len / 2] = 1.0;
    k
}

fn spatial(op: SpatialOp, img: &RgbaImage, o: &Options) -> RgbaImage {
    match op {
        SpatialOp::GaussianBlur => kernels::gaussian_blur(img, o.float(OptionKey::Radius, 10.0)),
        SpatialOp::BoxBlur => {
            let kernel = box_kernel(o.float(OptionKey::Radius, 10.0), kernels::kernel_reach(img));
            kernels::convolve_separable(img, &kernel)
        }
        SpatialOp::Median => kernels::median(img),
        SpatialOp::UnsharpMask => kernels::unsharp_mask(
            img,
            o.float(OptionKey::Radius, 2.5),
            o.float(OptionKey::Intensity, 0.5),
        ),
        SpatialOp::SharpenLuminance => {
            kernels::sharpen_luminance(img, o.float(OptionKey::Sharpness, 0.4))
        }
        SpatialOp::Convolution { side } => {
            let len = side * side;
            let weights = match o.vector(OptionKey::Weights) {
                Some(w) if square_kernel_side(w.len()) == Some(side) => w.to_vec(),
                _ => identity_kernel(len),
            };
            kernels::convolve(img, &weights, side, side, o.float(OptionKey::Bias, 0.0))
        }
        SpatialOp::Convolution9 { horizontal } => {
            let weights = match o.vector(OptionKey::Weights) {
                Some(w) if w.len() == 9 => w.to_vec(),
                _ => identity_kernel(9),
            };
            let bias = o.float(OptionKey::Bias, 0.0);
            if horizontal {
                kernels::convolve(img, &weights, 9, 1, bias)
            } else {
                kernels::convolve(img, &weights, 1, 9, bias)
            }
        }
        SpatialOp::Pixellate => kernels::pixellate(
            img,
            o.point(OptionKey::Center, (150.0, 150.0)),
            o.float(OptionKey::Scale, 8.0),
        ),
        SpatialOp::Edges => kernels::edges(img, o.float(OptionKey::Intensity, 1.0)),
    }
}

fn generator(op: GeneratorOp, o: &Options) -> Sampler {
    match op {
        GeneratorOp::ConstantColor => {
            let c = o.color(OptionKey::Color, OPAQUE_BLACK);
            Arc::new(move |_, _| c)
        }
        GeneratorOp::Checkerboard => {
            let center = o.point(OptionKey::Center, (150.0, 150.0));
            let width = o.float(OptionKey::Width, 80.0);
            let c0 = o.color(OptionKey::Color0, OPAQUE_WHITE);
            let c1 = o.color(OptionKey::Color1, OPAQUE_BLACK);
            Arc::new(move |x, y| kernels::checkerboard(x, y, center, width, c0, c1))
        }
        GeneratorOp::Stripes => {
            let center = o.point(OptionKey::Center, (150.0, 150.0));
            let width = o.float(OptionKey::Width, 80.0);
            let c0 = o.color(OptionKey::Color0, OPAQUE_WHITE);
            let c1 = o.color(OptionKey::Color1, OPAQUE_BLACK);
            Arc::new(move |x, _| kernels::stripes(x, center.0, width, c0, c1))
        }
        GeneratorOp::Random => Arc::new(kernels::random),
        GeneratorOp::LinearGradient | GeneratorOp::SmoothLinearGradient => {
            let smooth = op == GeneratorOp::SmoothLinearGradient;
            let p0 = o.point(OptionKey::Point0, (0.0, 0.0));
            let p1 = o.point(OptionKey::Point1, (200.0, 200.0));
            let c0 = o.color(OptionKey::Color0, OPAQUE_WHITE);
            let c1 = o.color(OptionKey::Color1, OPAQUE_BLACK);
            Arc::new(move |x, y| kernels::linear_gradient(x, y, p0, p1, c0, c1, smooth))
        }
        GeneratorOp::RadialGradient => {
            let center = o.point(OptionKey::Center, (150.0, 150.0));
            let r0 = o.float(OptionKey::Radius0, 5.0);
            let r1 = o.float(OptionKey::Radius1, 100.0);
            let c0 = o.color(OptionKey::Color0, OPAQUE_WHITE);
            let c1 = o.color(OptionKey::Color1, OPAQUE_BLACK);
            Arc::new(move |x, y| kernels::radial_gradient(x, y, center, r0, r1, c0, c1))
        }
        GeneratorOp::GaussianGradient => {
            let center = o.point(OptionKey::Center, (150.0, 150.0));
            let radius = o.float(OptionKey::Radius, 300.0);
            let c0 = o.color(OptionKey::Color0, OPAQUE_WHITE);
            let c1 = o.color(OptionKey::Color1, TRANSPARENT);
            Arc::new(move |x, y| kernels::gaussian_gradient(x, y, center, radius, c0, c1))
        }
    }
}

/// Combine two images pixel by pixel.
///
/// Two rasters give a raster over the union of their bounds; anything
/// procedural gives a procedural result.
fn composite(
    source: &RustImage,
    backdrop: &RustImage,
    f: impl Fn(Rgba32, Rgba32) -> Rgba32 + Send + Sync + 'static,
) -> Option<RustImage> {
    match (source, backdrop) {
        (RustImage::Empty, _) => None,
        (RustImage::Raster(s), RustImage::Raster(b)) => {
            let width = s.width().max(b.width());
            let height = s.height().max(b.height());
            let out = RgbaImage::from_fn(width, height, |x, y| {
                let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
                Rgba(kernels::to_u8(f(sample_raster(s, fx, fy), sample_raster(b, fx, fy))))
            });
            Some(RustImage::Raster(RasterImage::new(out)))
        }
        _ => {
            let (s, b) = (source.sampler(), backdrop.sampler());
            Some(RustImage::Procedural(Arc::new(move |x, y| f(s(x, y), b(x, y)))))
        }
    }
}

/// Mix `source` over `backdrop` by the mask's luminance.
fn blend_with_mask(source: &RustImage, backdrop: &RustImage, mask: &RustImage) -> Option<RustImage> {
    match source {
        RustImage::Empty => None,
        RustImage::Raster(s) => {
            let extent_of = |img: &RustImage| match img {
                RustImage::Raster(r) => (r.width(), r.height()),
                _ => (0, 0),
            };
            let (bw, bh) = extent_of(backdrop);
            let (mw, mh) = extent_of(mask);
            let width = s.width().max(bw).max(mw);
            let height = s.height().max(bh).max(mh);
            let out = RgbaImage::from_fn(width, height, |x, y| {
                let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
                let t = luminance(mask.sample(fx, fy));
                Rgba(kernels::to_u8(kernels::mix(
                    source.sample(fx, fy),
                    backdrop.sample(fx, fy),
                    t,
                )))
            });
            Some(RustImage::Raster(RasterImage::new(out)))
        }
        RustImage::Procedural(_) => {
            let (s, b, m) = (source.sampler(), backdrop.sampler(), mask.sampler());
            Some(RustImage::Procedural(Arc::new(move |x, y| {
                kernels::mix(s(x, y), b(x, y), luminance(m(x, y)))
            })))
        }
    }
}

/// Per-engine render bookkeeping.
#[derive(Debug, Default)]
pub struct RenderContext {
    pub renders: usize,
    pub pixels_rendered: u64,
}

/// The built-in engine.
///
/// See the [module docs](self) for the operation mapping.
#[derive(Debug, Clone)]
pub struct RustEngine {
    max_pixels: u64,
}

impl RustEngine {
    pub fn new() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    /// Refuse renders larger than `max_pixels`.
    pub fn with_max_pixels(max_pixels: u64) -> Self {
        Self { max_pixels }
    }

    pub fn max_pixels(&self) -> u64 {
        self.max_pixels
    }
}

impl Default for RustEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingEngine for RustEngine {
    type Image = RustImage;
    type Operation = RustOperation;
    type Context = RenderContext;

    fn create_context(&self) -> RenderContext {
        RenderContext::default()
    }

    fn create_operation(&self, token: Token) -> Option<RustOperation> {
        let kind = *OPERATIONS.get(token.as_str())?;
        Some(RustOperation {
            token,
            kind,
            input: None,
            options: HashMap::new(),
        })
    }

    fn import(&self, image: &RasterImage) -> Option<RustImage> {
        if image.is_empty() {
            Some(RustImage::Empty)
        } else {
            Some(RustImage::Raster(image.clone()))
        }
    }

    fn empty_image(&self) -> RustImage {
        RustImage::Empty
    }

    fn render(
        &self,
        context: &mut RenderContext,
        image: &RustImage,
        bounds: Rect,
    ) -> Result<RasterImage, EngineError> {
        let failure = || EngineError::RenderFailure(bounds);
        if matches!(image, RustImage::Empty) {
            return Err(failure());
        }
        let region = pixel_region(bounds).ok_or_else(failure)?;
        if region.pixel_count() > self.max_pixels {
            debug!(%bounds, max_pixels = self.max_pixels, "render exceeds pixel budget");
            return Err(failure());
        }

        let pixels = match image {
            RustImage::Raster(img)
                if region.x >= 0
                    && region.y >= 0
                    && region.x as u64 + u64::from(region.width) <= u64::from(img.width())
                    && region.y as u64 + u64::from(region.height) <= u64::from(img.height()) =>
            {
                image::imageops::crop_imm(
                    img.pixels(),
                    region.x as u32,
                    region.y as u32,
                    region.width,
                    region.height,
                )
                .to_image()
            }
            _ => RgbaImage::from_fn(region.width, region.height, |x, y| {
                let fx = (region.x + i64::from(x)) as f32 + 0.5;
                let fy = (region.y + i64::from(y)) as f32 + 0.5;
                Rgba(kernels::to_u8(image.sample(fx, fy)))
            }),
        };
        context.renders += 1;
        context.pixels_rendered += region.pixel_count();
        Ok(RasterImage::new(pixels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient, solid};

    fn run(engine: &RustEngine, token: &'static str, input: Option<RustImage>, options: &[(OptionKey, EngineValue)]) -> Option<RustImage> {
        let mut op = engine.create_operation(Token::new(token))?;
        op.set_defaults();
        if let Some(input) = input {
            op.set_input(input);
        }
        for (key, value) in options {
            op.set_option(*key, value.clone());
        }
        op.output()
    }

    fn render_all(engine: &RustEngine, image: &RustImage, w: f32, h: f32) -> RasterImage {
        let mut ctx = engine.create_context();
        engine.render(&mut ctx, image, Rect::new(0.0, 0.0, w, h)).unwrap()
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        let engine = RustEngine::new();
        assert!(engine.create_operation(Token::new("CIBloom")).is_none());
        assert!(engine.create_operation(Token::new("CIGaussianBlur")).is_some());
    }

    #[test]
    fn supported_tokens_are_sorted_and_complete() {
        let tokens = supported_tokens();
        assert!(tokens.windows(2).all(|w| w[0] < w[1]));
        assert!(tokens.contains(&"CIBlendWithMask"));
        assert!(tokens.contains(&"CIConvolution7X7"));
        assert_eq!(tokens.iter().filter(|t| t.ends_with("BlendMode")).count(), 20);
    }

    #[test]
    fn constant_color_is_infinite_and_uniform() {
        let engine = RustEngine::new();
        let out = run(
            &engine,
            "CIConstantColorGenerator",
            None,
            &[(OptionKey::Color, EngineValue::Color([1.0, 0.0, 0.0, 1.0]))],
        )
        .unwrap();
        assert_eq!(out.extent(), Extent::Infinite);
        assert_eq!(render_all(&engine, &out, 3.0, 2.0).uniform_color(), Some([255, 0, 0, 255]));
    }

    #[test]
    fn invert_on_raster_keeps_extent() {
        let engine = RustEngine::new();
        let input = RustImage::Raster(solid(4, 3, [10, 20, 30, 255]));
        let out = run(&engine, "CIColorInvert", Some(input), &[]).unwrap();
        assert_eq!(out.extent(), Extent::Finite(Rect::new(0.0, 0.0, 4.0, 3.0)));
        assert_eq!(render_all(&engine, &out, 4.0, 3.0).uniform_color(), Some([245, 235, 225, 255]));
    }

    #[test]
    fn color_filter_on_procedural_stays_procedural() {
        let engine = RustEngine::new();
        let red = run(
            &engine,
            "CIConstantColorGenerator",
            None,
            &[(OptionKey::Color, EngineValue::Color([1.0, 0.0, 0.0, 1.0]))],
        );
        let out = run(&engine, "CIColorInvert", red, &[]).unwrap();
        assert_eq!(out.extent(), Extent::Infinite);
        assert_eq!(render_all(&engine, &out, 2.0, 2.0).uniform_color(), Some([0, 255, 255, 255]));
    }

    #[test]
    fn spatial_filter_needs_raster_input() {
        let engine = RustEngine::new();
        let procedural = RustImage::Procedural(Arc::new(|_, _| OPAQUE_BLACK));
        assert!(run(&engine, "CIGaussianBlur", Some(procedural), &[]).is_none());
        assert!(run(&engine, "CIGaussianBlur", None, &[]).is_none());
        assert!(run(&engine, "CIGaussianBlur", Some(RustImage::Empty), &[]).is_none());
    }

    #[test]
    fn mistyped_option_keeps_default() {
        let engine = RustEngine::new();
        let input = RustImage::Raster(solid(3, 3, [50, 60, 70, 255]));
        let out = run(
            &engine,
            "CIGaussianBlur",
            Some(input),
            &[(OptionKey::Radius, EngineValue::Text("wide".into()))],
        )
        .unwrap();
        assert_eq!(render_all(&engine, &out, 3.0, 3.0).uniform_color(), Some([50, 60, 70, 255]));
    }

    #[test]
    fn convolution_with_wrong_length_weights_is_identity() {
        let engine = RustEngine::new();
        let input = solid(3, 3, [1, 2, 3, 255]);
        let out = run(
            &engine,
            "CIConvolution5X5",
            Some(RustImage::Raster(input.clone())),
            &[(OptionKey::Weights, EngineValue::Vector(vec![1.0; 9]))],
        )
        .unwrap();
        assert_eq!(render_all(&engine, &out, 3.0, 3.0), input);
    }

    #[test]
    fn blur_softens_a_ramp_edge() {
        let engine = RustEngine::new();
        let ramp = gradient(9, 1);
        let out = run(
            &engine,
            "CIGaussianBlur",
            Some(RustImage::Raster(ramp.clone())),
            &[(OptionKey::Radius, EngineValue::Float(2.0))],
        )
        .unwrap();
        let blurred = render_all(&engine, &out, 9.0, 1.0);
        assert_ne!(blurred, ramp);
        // Clamped edges pull the darkest pixel up.
        assert!(blurred.pixel(0, 0).unwrap()[0] > 0);
        assert_eq!(blurred.pixel(0, 0).unwrap()[3], 255);
    }

    #[test]
    fn huge_radii_blur_within_the_image() {
        let engine = RustEngine::new();
        let input = solid(2, 2, [40, 80, 120, 255]);
        for token in ["CIGaussianBlur", "CIBoxBlur", "CIUnsharpMask"] {
            let out = run(
                &engine,
                token,
                Some(RustImage::Raster(input.clone())),
                &[(OptionKey::Radius, EngineValue::Float(1e9))],
            )
            .unwrap();
            assert_eq!(
                render_all(&engine, &out, 2.0, 2.0).uniform_color(),
                Some([40, 80, 120, 255]),
                "{token}"
            );
        }
    }

    #[test]
    fn composite_over_background_covers_union() {
        let engine = RustEngine::new();
        let source = RustImage::Raster(solid(2, 2, [255, 0, 0, 255]));
        let background = solid(4, 3, [0, 0, 255, 255]);
        let out = run(
            &engine,
            "CISourceOverCompositing",
            Some(source),
            &[(OptionKey::BackgroundImage, EngineValue::Image(background))],
        )
        .unwrap();
        assert_eq!(out.extent(), Extent::Finite(Rect::new(0.0, 0.0, 4.0, 3.0)));
        let raster = render_all(&engine, &out, 4.0, 3.0);
        assert_eq!(raster.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(raster.pixel(3, 2), Some([0, 0, 255, 255]));
    }

    #[test]
    fn composite_without_background_has_no_output() {
        let engine = RustEngine::new();
        let source = RustImage::Raster(solid(2, 2, [255, 0, 0, 255]));
        assert!(run(&engine, "CIMultiplyBlendMode", Some(source), &[]).is_none());
    }

    #[test]
    fn blend_with_mask_selects_by_luminance() {
        let engine = RustEngine::new();
        let source = RustImage::Raster(solid(2, 1, [255, 0, 0, 255]));
        let background = solid(2, 1, [0, 0, 255, 255]);
        let mask = RasterImage::new(RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgba([255, 255, 255, 255]) } else { Rgba([0, 0, 0, 255]) }
        }));
        let out = run(
            &engine,
            "CIBlendWithMask",
            Some(source),
            &[
                (OptionKey::BackgroundImage, EngineValue::Image(background)),
                (OptionKey::MaskImage, EngineValue::Image(mask)),
            ],
        )
        .unwrap();
        let raster = render_all(&engine, &out, 2.0, 1.0);
        assert_eq!(raster.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(raster.pixel(1, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn render_refuses_unrenderable_bounds() {
        let engine = RustEngine::with_max_pixels(100);
        let mut ctx = engine.create_context();
        let image = RustImage::Procedural(Arc::new(|_, _| OPAQUE_WHITE));
        for bounds in [
            Rect::new(0.0, 0.0, 0.0, 5.0),
            Rect::new(0.0, 0.0, f32::INFINITY, 5.0),
            Rect::new(0.0, 0.0, 11.0, 10.0),
        ] {
            assert_eq!(
                engine.render(&mut ctx, &image, bounds),
                Err(EngineError::RenderFailure(bounds))
            );
        }
        assert!(engine.render(&mut ctx, &image, Rect::new(0.0, 0.0, 10.0, 10.0)).is_ok());
        assert_eq!(ctx.renders, 1);
        assert_eq!(ctx.pixels_rendered, 100);
    }

    #[test]
    fn render_empty_image_fails() {
        let engine = RustEngine::new();
        let mut ctx = engine.create_context();
        let bounds = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(
            engine.render(&mut ctx, &RustImage::Empty, bounds),
            Err(EngineError::RenderFailure(bounds))
        );
    }

    #[test]
    fn render_beyond_raster_pads_with_transparency() {
        let engine = RustEngine::new();
        let image = RustImage::Raster(solid(2, 2, [9, 9, 9, 255]));
        let raster = render_all(&engine, &image, 3.0, 2.0);
        assert_eq!(raster.pixel(1, 1), Some([9, 9, 9, 255]));
        assert_eq!(raster.pixel(2, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn checkerboard_renders_two_colors() {
        let engine = RustEngine::new();
        let out = run(
            &engine,
            "CICheckerboardGenerator",
            None,
            &[
                (OptionKey::Center, EngineValue::Vector(vec![0.0, 0.0])),
                (OptionKey::Color0, EngineValue::Color([1.0, 1.0, 1.0, 1.0])),
                (OptionKey::Color1, EngineValue::Color([0.0, 0.0, 0.0, 1.0])),
                (OptionKey::Width, EngineValue::Float(2.0)),
            ],
        )
        .unwrap();
        let raster = render_all(&engine, &out, 4.0, 4.0);
        assert_eq!(raster.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(raster.pixel(2, 0), Some([0, 0, 0, 255]));
        assert_eq!(raster.pixel(2, 2), Some([255, 255, 255, 255]));
    }

    #[test]
    fn set_defaults_clears_options() {
        let engine = RustEngine::new();
        let mut op = engine.create_operation(Token::new("CIConstantColorGenerator")).unwrap();
        op.set_option(OptionKey::Color, EngineValue::Color([1.0, 1.0, 1.0, 1.0]));
        op.set_defaults();
        let out = op.output().unwrap();
        assert_eq!(render_all(&engine, &out, 1.0, 1.0).uniform_color(), Some([0, 0, 0, 255]));
    }
}
