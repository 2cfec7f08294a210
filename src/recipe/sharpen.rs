//! Sharpening operations.

recipe_family! {
    pub enum Sharpen {
        /// Sharpens luminance detail only, leaving chroma untouched.
        SharpenLuminance("sharpen_luminance") => SharpenLuminance("CISharpenLuminance") {
            sharpness: Option<f32> => Sharpness,
        },
        UnsharpMask("unsharp_mask") => UnsharpMask("CIUnsharpMask") {
            radius: Option<f32> => Radius,
            intensity: Option<f32> => Intensity,
        },
    }
}
