//! Image processing: engine abstraction, built-in engine, pipeline execution.
//!
//! | Piece | Role |
//! |---|---|
//! | **Backend** | [`ProcessingEngine`] and friends, [`EngineError`] |
//! | **Rust backend** | [`RustEngine`], pure Rust on the `image` crate |
//! | **Kernels** | per-pixel and neighborhood math used by the Rust backend |
//! | **Calculations** | pure helpers: bounds snapping, kernel weights, color curves |
//! | **Operations** | [`Executor`], [`apply_pipeline`], [`generate`] |

pub mod backend;
pub mod calculations;
mod kernels;
pub mod operations;
pub mod rust_backend;

pub use backend::{EngineError, EngineImage, EngineOperation, ProcessingEngine};
pub use operations::{
    ErrorPolicy, Executor, Finalization, PipelineError, PipelineResult, StageOutcome,
    apply_pipeline, generate,
};
pub use rust_backend::{RustEngine, RustImage};
