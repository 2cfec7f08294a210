//! Pixel kernels for the built-in engine.
//!
//! | Group | Works on |
//! |---|---|
//! | color transforms | one pixel at a time, so rasters and procedural images alike |
//! | spatial filters | finite `RgbaImage` buffers, edges clamped |
//! | blend modes | a source/backdrop pixel pair (W3C compositing formulas) |
//! | generators | a sample position in pixel space |
//!
//! Colors are unpremultiplied RGBA floats in `0.0..=1.0`.

use super::calculations::{
    clamp4, gaussian_kernel, hash_noise, hue_rotation, lerp4, luminance, project_onto,
    smoothstep,
};
use image::{Rgba, RgbaImage};

pub type Rgba32 = [f32; 4];

pub const TRANSPARENT: Rgba32 = [0.0, 0.0, 0.0, 0.0];

pub fn to_float(p: [u8; 4]) -> Rgba32 {
    p.map(|v| f32::from(v) / 255.0)
}

pub fn to_u8(c: Rgba32) -> [u8; 4] {
    c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Apply `f` to every pixel.
pub fn map_pixels(img: &RgbaImage, f: impl Fn(Rgba32) -> Rgba32) -> RgbaImage {
    let mut out = img.clone();
    for p in out.pixels_mut() {
        p.0 = to_u8(f(to_float(p.0)));
    }
    out
}

// =============================================================================
// Color transforms
// =============================================================================

pub fn color_controls(c: Rgba32, saturation: f32, brightness: f32, contrast: f32) -> Rgba32 {
    let l = luminance(c);
    let mut rgb = [0.0; 3];
    for (i, v) in rgb.iter_mut().enumerate() {
        let saturated = l + (c[i] - l) * saturation;
        *v = (saturated + brightness - 0.5) * contrast + 0.5;
    }
    clamp4([rgb[0], rgb[1], rgb[2], c[3]])
}

/// `out[i] = dot(c, vectors[i]) + bias[i]` for each of r, g, b, a.
pub fn color_matrix(c: Rgba32, vectors: [Rgba32; 4], bias: Rgba32) -> Rgba32 {
    let mut out = [0.0; 4];
    for i in 0..4 {
        out[i] = super::calculations::dot4(c, vectors[i]) + bias[i];
    }
    clamp4(out)
}

/// `out = k0 + k1*v + k2*v² + k3*v³` per channel.
pub fn color_polynomial(c: Rgba32, coefficients: [Rgba32; 4]) -> Rgba32 {
    let mut out = [0.0; 4];
    for i in 0..4 {
        let k = coefficients[i];
        let v = c[i];
        out[i] = k[0] + k[1] * v + k[2] * v * v + k[3] * v * v * v;
    }
    clamp4(out)
}

pub fn color_clamp(c: Rgba32, min: Rgba32, max: Rgba32) -> Rgba32 {
    let mut out = c;
    for i in 0..4 {
        out[i] = c[i].max(min[i]).min(max[i]);
    }
    out
}

/// Exposure in f-stops, applied in linear light.
pub fn exposure(c: Rgba32, ev: f32) -> Rgba32 {
    let gain = 2f32.powf(ev);
    let f = |v: f32| super::calculations::linear_to_srgb(super::calculations::srgb_to_linear(v) * gain);
    clamp4([f(c[0]), f(c[1]), f(c[2]), c[3]])
}

pub fn gamma(c: Rgba32, power: f32) -> Rgba32 {
    [c[0].max(0.0).powf(power), c[1].max(0.0).powf(power), c[2].max(0.0).powf(power), c[3]]
}

pub fn hue_adjust(c: Rgba32, angle: f32) -> Rgba32 {
    let m = hue_rotation(angle);
    let mut out = [0.0, 0.0, 0.0, c[3]];
    for i in 0..3 {
        out[i] = m[i][0] * c[0] + m[i][1] * c[1] + m[i][2] * c[2];
    }
    clamp4(out)
}

pub fn invert(c: Rgba32) -> Rgba32 {
    [1.0 - c[0], 1.0 - c[1], 1.0 - c[2], c[3]]
}

/// Tint by `color` in proportion to luminance, blended in by `intensity`.
pub fn monochrome(c: Rgba32, color: Rgba32, intensity: f32) -> Rgba32 {
    let l = luminance(c);
    let tinted = [color[0] * l, color[1] * l, color[2] * l, c[3]];
    clamp4(lerp4(c, tinted, intensity))
}

pub fn posterize(c: Rgba32, levels: f32) -> Rgba32 {
    let n = levels.max(2.0);
    let step = |v: f32| ((v * (n - 1.0)).round() / (n - 1.0)).clamp(0.0, 1.0);
    [step(c[0]), step(c[1]), step(c[2]), c[3]]
}

pub fn false_color(c: Rgba32, color0: Rgba32, color1: Rgba32) -> Rgba32 {
    let mut out = lerp4(color0, color1, luminance(c));
    out[3] *= c[3];
    clamp4(out)
}

pub fn mask_to_alpha(c: Rgba32) -> Rgba32 {
    let l = luminance(c);
    [1.0, 1.0, 1.0, l * c[3]]
}

pub fn maximum_component(c: Rgba32) -> Rgba32 {
    let v = c[0].max(c[1]).max(c[2]);
    [v, v, v, c[3]]
}

pub fn minimum_component(c: Rgba32) -> Rgba32 {
    let v = c[0].min(c[1]).min(c[2]);
    [v, v, v, c[3]]
}

/// Grayscale with a contrast curve; `strength` 0 is plain luminance.
pub fn photo_mono(c: Rgba32, strength: f32) -> Rgba32 {
    let l = luminance(c);
    let v = l + (smoothstep(0.0, 1.0, l) - l) * strength;
    [v, v, v, c[3]]
}

pub fn sepia(c: Rgba32, intensity: f32) -> Rgba32 {
    let sepia = [
        0.393 * c[0] + 0.769 * c[1] + 0.189 * c[2],
        0.349 * c[0] + 0.686 * c[1] + 0.168 * c[2],
        0.272 * c[0] + 0.534 * c[1] + 0.131 * c[2],
        c[3],
    ];
    clamp4(lerp4(c, sepia, intensity))
}

/// Saturation boost weighted toward already-muted colors.
pub fn vibrance(c: Rgba32, amount: f32) -> Rgba32 {
    let max = c[0].max(c[1]).max(c[2]);
    let min = c[0].min(c[1]).min(c[2]);
    let sat = max - min;
    let l = luminance(c);
    let scale = 1.0 + amount * (1.0 - sat);
    let f = |v: f32| l + (v - l) * scale;
    clamp4([f(c[0]), f(c[1]), f(c[2]), c[3]])
}

pub fn linear_to_srgb(c: Rgba32) -> Rgba32 {
    let f = super::calculations::linear_to_srgb;
    [f(c[0]), f(c[1]), f(c[2]), c[3]]
}

pub fn srgb_to_linear(c: Rgba32) -> Rgba32 {
    let f = super::calculations::srgb_to_linear;
    [f(c[0]), f(c[1]), f(c[2]), c[3]]
}

/// Maps `white` to pure white by per-channel scaling.
pub fn white_point(c: Rgba32, white: Rgba32) -> Rgba32 {
    let f = |v: f32, w: f32| if w > 0.0 { v / w } else { v };
    clamp4([f(c[0], white[0]), f(c[1], white[1]), f(c[2], white[2]), c[3]])
}

// =============================================================================
// Spatial filters
// =============================================================================

fn sample_clamped(img: &RgbaImage, x: i64, y: i64) -> Rgba32 {
    let cx = x.clamp(0, i64::from(img.width()) - 1) as u32;
    let cy = y.clamp(0, i64::from(img.height()) - 1) as u32;
    to_float(img.get_pixel(cx, cy).0)
}

/// General `kw × kh` convolution plus `bias`, every channel independently.
pub fn convolve(img: &RgbaImage, weights: &[f32], kw: usize, kh: usize, bias: f32) -> RgbaImage {
    let (rx, ry) = ((kw / 2) as i64, (kh / 2) as i64);
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let mut acc = [bias; 4];
        for j in 0..kh {
            for i in 0..kw {
                let w = weights[j * kw + i];
                if w == 0.0 {
                    continue;
                }
                let s = sample_clamped(img, i64::from(x) + i as i64 - rx, i64::from(y) + j as i64 - ry);
                for c in 0..4 {
                    acc[c] += w * s[c];
                }
            }
        }
        Rgba(to_u8(acc))
    })
}

/// Horizontal then vertical pass with the same 1D kernel.
pub fn convolve_separable(img: &RgbaImage, kernel: &[f32]) -> RgbaImage {
    let horizontal = convolve(img, kernel, kernel.len(), 1, 0.0);
    convolve(&horizontal, kernel, 1, kernel.len(), 0.0)
}

/// Longest kernel reach that still changes the result under clamp-to-edge.
pub fn kernel_reach(img: &RgbaImage) -> usize {
    img.width().max(img.height()) as usize
}

pub fn gaussian_blur(img: &RgbaImage, sigma: f32) -> RgbaImage {
    convolve_separable(img, &gaussian_kernel(sigma, kernel_reach(img)))
}

/// 3×3 per-channel median.
pub fn median(img: &RgbaImage) -> RgbaImage {
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let mut out = [0u8; 4];
        let mut window = [[0u8; 9]; 4];
        let mut n = 0;
        for dy in -1..=1i64 {
            for dx in -1..=1i64 {
                let cx = (i64::from(x) + dx).clamp(0, i64::from(img.width()) - 1) as u32;
                let cy = (i64::from(y) + dy).clamp(0, i64::from(img.height()) - 1) as u32;
                let p = img.get_pixel(cx, cy).0;
                for c in 0..4 {
                    window[c][n] = p[c];
                }
                n += 1;
            }
        }
        for c in 0..4 {
            window[c].sort_unstable();
            out[c] = window[c][4];
        }
        Rgba(out)
    })
}

/// `original + (original - blurred) * intensity`.
pub fn unsharp_mask(img: &RgbaImage, radius: f32, intensity: f32) -> RgbaImage {
    let blurred = gaussian_blur(img, radius);
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let o = to_float(img.get_pixel(x, y).0);
        let b = to_float(blurred.get_pixel(x, y).0);
        let mut out = o;
        for c in 0..3 {
            out[c] = o[c] + (o[c] - b[c]) * intensity;
        }
        Rgba(to_u8(out))
    })
}

/// Sharpens luminance detail, shifting all three channels by the same amount.
pub fn sharpen_luminance(img: &RgbaImage, sharpness: f32) -> RgbaImage {
    let blurred = gaussian_blur(img, 1.0);
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let o = to_float(img.get_pixel(x, y).0);
        let b = to_float(blurred.get_pixel(x, y).0);
        let delta = (luminance(o) - luminance(b)) * sharpness;
        Rgba(to_u8([o[0] + delta, o[1] + delta, o[2] + delta, o[3]]))
    })
}

/// Square cells of side `scale` aligned on `center`, each filled with its mean.
pub fn pixellate(img: &RgbaImage, center: (f32, f32), scale: f32) -> RgbaImage {
    let s = scale.max(1.0);
    let cell = |v: u32, origin: f32| ((v as f32 + 0.5 - origin) / s).floor() as i64;
    let mut sums: std::collections::HashMap<(i64, i64), ([f32; 4], u32)> =
        std::collections::HashMap::new();
    for (x, y, p) in img.enumerate_pixels() {
        let entry = sums
            .entry((cell(x, center.0), cell(y, center.1)))
            .or_insert(([0.0; 4], 0));
        let c = to_float(p.0);
        for i in 0..4 {
            entry.0[i] += c[i];
        }
        entry.1 += 1;
    }
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let (sum, n) = sums[&(cell(x, center.0), cell(y, center.1))];
        Rgba(to_u8(sum.map(|v| v / n as f32)))
    })
}

/// Sobel gradient magnitude per color channel, scaled by `intensity`.
pub fn edges(img: &RgbaImage, intensity: f32) -> RgbaImage {
    const GX: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];
    const GY: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let mut gx = [0.0f32; 3];
        let mut gy = [0.0f32; 3];
        for j in 0..3 {
            for i in 0..3 {
                let s = sample_clamped(img, i64::from(x) + i as i64 - 1, i64::from(y) + j as i64 - 1);
                for c in 0..3 {
                    gx[c] += GX[j * 3 + i] * s[c];
                    gy[c] += GY[j * 3 + i] * s[c];
                }
            }
        }
        let mag = |c: usize| (gx[c] * gx[c] + gy[c] * gy[c]).sqrt() * intensity;
        Rgba(to_u8([mag(0), mag(1), mag(2), 1.0]))
    })
}

// =============================================================================
// Blend modes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    // Porter-Duff
    SourceOver,
    SourceAtop,
    SourceIn,
    SourceOut,
    Addition,
    MultiplyCompositing,
    Maximum,
    Minimum,
    // Separable
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Subtract,
    Divide,
    LinearBurn,
    LinearDodge,
    PinLight,
    // Non-separable
    Hue,
    Saturation,
    Color,
    Luminosity,
}

fn premultiply(c: Rgba32) -> Rgba32 {
    [c[0] * c[3], c[1] * c[3], c[2] * c[3], c[3]]
}

fn unpremultiply(c: Rgba32) -> Rgba32 {
    if c[3] <= 0.0 {
        return TRANSPARENT;
    }
    clamp4([c[0] / c[3], c[1] / c[3], c[2] / c[3], c[3]])
}

fn separable(mode: BlendMode, cb: f32, cs: f32) -> f32 {
    match mode {
        BlendMode::Multiply => cb * cs,
        BlendMode::Screen => cb + cs - cb * cs,
        BlendMode::Overlay => separable(BlendMode::HardLight, cs, cb),
        BlendMode::Darken => cb.min(cs),
        BlendMode::Lighten => cb.max(cs),
        BlendMode::ColorDodge => {
            if cb == 0.0 {
                0.0
            } else if cs >= 1.0 {
                1.0
            } else {
                (cb / (1.0 - cs)).min(1.0)
            }
        }
        BlendMode::ColorBurn => {
            if cb >= 1.0 {
                1.0
            } else if cs <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - cb) / cs).min(1.0)
            }
        }
        BlendMode::HardLight => {
            if cs <= 0.5 {
                cb * 2.0 * cs
            } else {
                let s = 2.0 * cs - 1.0;
                cb + s - cb * s
            }
        }
        BlendMode::SoftLight => {
            if cs <= 0.5 {
                cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
            } else {
                let d = if cb <= 0.25 {
                    ((16.0 * cb - 12.0) * cb + 4.0) * cb
                } else {
                    cb.sqrt()
                };
                cb + (2.0 * cs - 1.0) * (d - cb)
            }
        }
        BlendMode::Difference => (cb - cs).abs(),
        BlendMode::Exclusion => cb + cs - 2.0 * cb * cs,
        BlendMode::Subtract => (cb - cs).max(0.0),
        BlendMode::Divide => {
            if cs <= 0.0 {
                1.0
            } else {
                (cb / cs).min(1.0)
            }
        }
        BlendMode::LinearBurn => (cb + cs - 1.0).max(0.0),
        BlendMode::LinearDodge => (cb + cs).min(1.0),
        BlendMode::PinLight => {
            if cs < 0.5 {
                cb.min(2.0 * cs)
            } else {
                cb.max(2.0 * cs - 1.0)
            }
        }
        _ => cs,
    }
}

fn lum3(c: [f32; 3]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum3(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 {
        out = out.map(|v| l + (v - l) * l / (l - n));
    }
    if x > 1.0 {
        out = out.map(|v| l + (v - l) * (1.0 - l) / (x - l));
    }
    out
}

fn set_lum(c: [f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum3(c);
    clip_color(c.map(|v| v + d))
}

fn sat3(c: [f32; 3]) -> f32 {
    c[0].max(c[1]).max(c[2]) - c[0].min(c[1]).min(c[2])
}

fn set_sat(c: [f32; 3], s: f32) -> [f32; 3] {
    let max = c[0].max(c[1]).max(c[2]);
    let min = c[0].min(c[1]).min(c[2]);
    if max <= min {
        return [0.0; 3];
    }
    c.map(|v| (v - min) * s / (max - min))
}

fn non_separable(mode: BlendMode, cb: [f32; 3], cs: [f32; 3]) -> [f32; 3] {
    match mode {
        BlendMode::Hue => set_lum(set_sat(cs, sat3(cb)), lum3(cb)),
        BlendMode::Saturation => set_lum(set_sat(cb, sat3(cs)), lum3(cb)),
        BlendMode::Color => set_lum(cs, lum3(cb)),
        _ => set_lum(cb, lum3(cs)),
    }
}

/// Composite `source` (the pipeline image) over `backdrop` (the background).
pub fn blend(mode: BlendMode, source: Rgba32, backdrop: Rgba32) -> Rgba32 {
    let (s, b) = (premultiply(source), premultiply(backdrop));
    let (sa, ba) = (source[3], backdrop[3]);
    let porter_duff = |fs: f32, fb: f32| -> Rgba32 {
        let mut out = [0.0; 4];
        for i in 0..4 {
            out[i] = s[i] * fs + b[i] * fb;
        }
        unpremultiply(out)
    };
    match mode {
        BlendMode::SourceOver => porter_duff(1.0, 1.0 - sa),
        BlendMode::SourceAtop => porter_duff(ba, 1.0 - sa),
        BlendMode::SourceIn => porter_duff(ba, 0.0),
        BlendMode::SourceOut => porter_duff(1.0 - ba, 0.0),
        BlendMode::Addition => unpremultiply(clamp4(porter_duff_sum(s, b))),
        BlendMode::MultiplyCompositing => {
            unpremultiply([s[0] * b[0], s[1] * b[1], s[2] * b[2], sa * ba])
        }
        BlendMode::Maximum => unpremultiply([s[0].max(b[0]), s[1].max(b[1]), s[2].max(b[2]), sa.max(ba)]),
        BlendMode::Minimum => unpremultiply([s[0].min(b[0]), s[1].min(b[1]), s[2].min(b[2]), sa.min(ba)]),
        _ => {
            let cs = [source[0], source[1], source[2]];
            let cb = [backdrop[0], backdrop[1], backdrop[2]];
            let mixed = match mode {
                BlendMode::Hue | BlendMode::Saturation | BlendMode::Color | BlendMode::Luminosity => {
                    non_separable(mode, cb, cs)
                }
                _ => [
                    separable(mode, cb[0], cs[0]),
                    separable(mode, cb[1], cs[1]),
                    separable(mode, cb[2], cs[2]),
                ],
            };
            let ao = sa + ba * (1.0 - sa);
            let mut out = [0.0, 0.0, 0.0, ao];
            for i in 0..3 {
                let cs_prime = (1.0 - ba) * cs[i] + ba * mixed[i];
                out[i] = sa * cs_prime + ba * cb[i] * (1.0 - sa);
            }
            unpremultiply(out)
        }
    }
}

fn porter_duff_sum(s: Rgba32, b: Rgba32) -> Rgba32 {
    [s[0] + b[0], s[1] + b[1], s[2] + b[2], s[3] + b[3]]
}

/// Mix `source` over `backdrop` by `t` in `0..=1`.
pub fn mix(source: Rgba32, backdrop: Rgba32, t: f32) -> Rgba32 {
    lerp4(backdrop, source, t.clamp(0.0, 1.0))
}

// =============================================================================
// Generators
// =============================================================================

pub fn checkerboard(
    x: f32,
    y: f32,
    center: (f32, f32),
    width: f32,
    color0: Rgba32,
    color1: Rgba32,
) -> Rgba32 {
    let w = width.max(1.0);
    let cx = ((x - center.0) / w).floor() as i64;
    let cy = ((y - center.1) / w).floor() as i64;
    if (cx + cy).rem_euclid(2) == 0 { color0 } else { color1 }
}

/// Vertical stripes of `width`, alternating from `center`.
pub fn stripes(x: f32, center: f32, width: f32, color0: Rgba32, color1: Rgba32) -> Rgba32 {
    let w = width.max(1.0);
    if ((x - center) / w).floor() as i64 % 2 == 0 { color0 } else { color1 }
}

pub fn random(x: f32, y: f32) -> Rgba32 {
    hash_noise(x.floor() as i64, y.floor() as i64)
}

pub fn linear_gradient(
    x: f32,
    y: f32,
    p0: (f32, f32),
    p1: (f32, f32),
    color0: Rgba32,
    color1: Rgba32,
    smooth: bool,
) -> Rgba32 {
    let t = project_onto(p0, p1, x, y).clamp(0.0, 1.0);
    let t = if smooth { smoothstep(0.0, 1.0, t) } else { t };
    lerp4(color0, color1, t)
}

pub fn radial_gradient(
    x: f32,
    y: f32,
    center: (f32, f32),
    radius0: f32,
    radius1: f32,
    color0: Rgba32,
    color1: Rgba32,
) -> Rgba32 {
    let d = ((x - center.0).powi(2) + (y - center.1).powi(2)).sqrt();
    let t = if radius1 == radius0 {
        if d < radius0 { 0.0 } else { 1.0 }
    } else {
        ((d - radius0) / (radius1 - radius0)).clamp(0.0, 1.0)
    };
    lerp4(color0, color1, t)
}

pub fn gaussian_gradient(
    x: f32,
    y: f32,
    center: (f32, f32),
    radius: f32,
    color0: Rgba32,
    color1: Rgba32,
) -> Rgba32 {
    let sigma = (radius / 3.0).max(f32::EPSILON);
    let d2 = (x - center.0).powi(2) + (y - center.1).powi(2);
    let weight = (-d2 / (2.0 * sigma * sigma)).exp();
    lerp4(color1, color0, weight)
}
