//! Pure calculation functions for the built-in engine.
//!
//! Bounds math, kernel construction and per-pixel color math. Everything
//! here is pure and testable without any images. Colors are unpremultiplied
//! RGBA in `0.0..=1.0`.

use crate::geometry::Rect;

/// Integer pixel region covered by a float rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRegion {
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Snap `bounds` outward to whole pixels.
///
/// Returns `None` for empty or non-finite bounds, and for regions whose
/// sides do not fit in `u32`.
///
/// ```
/// # use filterchain::geometry::Rect;
/// # use filterchain::imaging::calculations::pixel_region;
/// let r = pixel_region(Rect::new(0.5, 0.0, 10.0, 4.2)).unwrap();
/// assert_eq!((r.x, r.y, r.width, r.height), (0, 0, 11, 5));
/// ```
pub fn pixel_region(bounds: Rect) -> Option<PixelRegion> {
    if bounds.is_empty() {
        return None;
    }
    let x0 = bounds.x.floor() as f64;
    let y0 = bounds.y.floor() as f64;
    let width = (bounds.max_x() as f64).ceil() - x0;
    let height = (bounds.max_y() as f64).ceil() - y0;
    if width > f64::from(u32::MAX) || height > f64::from(u32::MAX) {
        return None;
    }
    Some(PixelRegion {
        x: x0 as i64,
        y: y0 as i64,
        width: width as u32,
        height: height as u32,
    })
}

/// Normalized 1D Gaussian kernel for standard deviation `sigma`, spanning ±3σ
/// but never more than `max_radius` taps either side.
///
/// A non-positive sigma yields the identity kernel `[1.0]`. Sampling clamps
/// to the image edge, so a reach past the image's longest side adds nothing.
pub fn gaussian_kernel(sigma: f32, max_radius: usize) -> Vec<f32> {
    if sigma <= 0.0 || !sigma.is_finite() {
        return vec![1.0];
    }
    let radius = (f64::from(sigma) * 3.0).ceil().min(max_radius as f64) as i64;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights: Vec<f64> = (-radius..=radius)
        .map(|i| {
            let d = i as f64;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Uniform 1D kernel of `2 * radius + 1` taps, `radius` capped at `max_radius`.
pub fn box_kernel(radius: f32, max_radius: usize) -> Vec<f32> {
    let r = (radius.max(0.0).round() as usize).min(max_radius);
    let n = 2 * r + 1;
    vec![1.0 / n as f32; n]
}

/// Side length of a square kernel with `len` weights, if `len` is an odd square.
pub fn square_kernel_side(len: usize) -> Option<usize> {
    let side = (len as f64).sqrt().round() as usize;
    (side * side == len && side % 2 == 1).then_some(side)
}

/// Rec. 709 luma.
pub fn luminance(c: [f32; 4]) -> f32 {
    0.2126 * c[0] + 0.7152 * c[1] + 0.0722 * c[2]
}

pub fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

pub fn linear_to_srgb(v: f32) -> f32 {
    if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

/// RGB rotation about the gray axis by `angle` radians.
pub fn hue_rotation(angle: f32) -> [[f32; 3]; 3] {
    let (sin, cos) = angle.sin_cos();
    let k = (1.0 - cos) / 3.0;
    let s = (1.0f32 / 3.0).sqrt() * sin;
    [
        [cos + k, k - s, k + s],
        [k + s, cos + k, k - s],
        [k - s, k + s, cos + k],
    ]
}

pub fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

pub fn lerp4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

pub fn clamp4(c: [f32; 4]) -> [f32; 4] {
    c.map(|v| v.clamp(0.0, 1.0))
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Parameter of the projection of `(x, y)` onto the segment `p0 → p1`, unclamped.
pub fn project_onto(p0: (f32, f32), p1: (f32, f32), x: f32, y: f32) -> f32 {
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return 0.0;
    }
    ((x - p0.0) * dx + (y - p0.1) * dy) / len2
}

/// Stateless hash of pixel coordinates to four values in `0.0..1.0`.
pub fn hash_noise(x: i64, y: i64) -> [f32; 4] {
    let mut h = (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    let mut out = [0.0; 4];
    for v in &mut out {
        h ^= h >> 33;
        h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
        h ^= h >> 33;
        *v = (h >> 40) as f32 / (1u64 << 24) as f32;
    }
    out
}
