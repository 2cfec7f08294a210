//! Processing engine traits and shared types.
//!
//! A [`ProcessingEngine`] is the collaborator that does the pixel work. The
//! executor only ever talks to it through these traits:
//!
//! | Step | Call |
//! |---|---|
//! | look up an operation by token | [`ProcessingEngine::create_operation`] |
//! | reset it | [`EngineOperation::set_defaults`] |
//! | primary input (not for generators) | [`EngineOperation::set_input`] |
//! | each resolved option, in order | [`EngineOperation::set_option`] |
//! | run it | [`EngineOperation::output`] |
//! | rasterize the result | [`ProcessingEngine::render`] |
//!
//! The built-in implementation is
//! [`RustEngine`](super::rust_backend::RustEngine). Tests use the recording
//! `MockEngine` in this module's `tests` submodule.

use crate::convert::EngineValue;
use crate::geometry::{Extent, Rect};
use crate::raster::RasterImage;
use crate::recipe::{OptionKey, Token};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("No engine operation matches token {0}")]
    UnknownOperation(Token),
    #[error("Operation {0} produced no output")]
    NoOutputProduced(Token),
    #[error("{0} is not a generator and cannot start a generated image")]
    NotAGenerator(Token),
    #[error("Failed to render image at {0}")]
    RenderFailure(Rect),
}

/// An engine-native image.
pub trait EngineImage {
    /// The region the image is defined over.
    fn extent(&self) -> Extent;
}

/// One configured instance of an engine operation.
pub trait EngineOperation {
    type Image: EngineImage;

    /// Reset every option to the engine's default.
    fn set_defaults(&mut self);

    /// Set the primary input image.
    fn set_input(&mut self, image: Self::Image);

    /// Set one option. Unknown keys and mistyped values are ignored, the
    /// same way the engine treats them: the option keeps its default.
    fn set_option(&mut self, key: OptionKey, value: EngineValue);

    /// Run the operation. `None` means no usable output.
    fn output(&self) -> Option<Self::Image>;
}

/// A pixel processing engine.
///
/// `Context` is the rendering resource (scratch buffers, caches, device
/// handles). The executor creates one per [`Executor`](super::operations::Executor)
/// and reuses it across runs; it is never shared between threads.
pub trait ProcessingEngine {
    type Image: EngineImage + Clone;
    type Operation: EngineOperation<Image = Self::Image>;
    type Context;

    fn create_context(&self) -> Self::Context;

    /// `None` when the engine has no operation for `token`.
    fn create_operation(&self, token: Token) -> Option<Self::Operation>;

    /// Bring a domain raster into the engine. `None` if it cannot be imported.
    fn import(&self, image: &RasterImage) -> Option<Self::Image>;

    /// The blank canvas generators start from.
    fn empty_image(&self) -> Self::Image;

    /// Rasterize `image` over `bounds`.
    fn render(
        &self,
        context: &mut Self::Context,
        image: &Self::Image,
        bounds: Rect,
    ) -> Result<RasterImage, EngineError>;
}
