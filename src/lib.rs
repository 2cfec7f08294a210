//! # Filterchain
//!
//! Typed image filter recipes, applied in order by an image processing engine.
//!
//! A caller describes what to do to an image as a list of [`recipe::Recipe`]
//! values: a Gaussian blur with radius 4, then a multiply blend over a paper
//! texture, then a sepia tone. Each recipe resolves to an engine operation
//! token plus an ordered list of options, and the executor chains the
//! operations output-to-input before rendering the result once.
//!
//! ```text
//! Recipe  ──resolve──▶  token + options  ──engine──▶  operation output
//!                                                           │
//!           next stage's input  ◀───────────────────────────┘
//!                                                           │
//!                                 final output ──render──▶  RasterImage
//! ```
//!
//! Stages the engine can't apply are skipped and reported rather than
//! aborting the chain; see [`imaging::ErrorPolicy`] for the strict variant.
//!
//! ```
//! use filterchain::geometry::{Color, Size};
//! use filterchain::imaging::{Executor, RustEngine};
//! use filterchain::raster::RasterImage;
//! use filterchain::recipe::{ColorInvert, GaussianBlur, Recipe};
//!
//! let engine = RustEngine::new();
//! let input = RasterImage::solid(16, 16, Color::RED);
//! let recipes: Vec<Recipe> = vec![
//!     GaussianBlur { radius: Some(2.0) }.into(),
//!     ColorInvert {}.into(),
//! ];
//! let result = Executor::new(&engine).run(&input, &recipes);
//! assert!(result.is_fully_applied());
//! assert_eq!(result.image.size(), Size::new(16.0, 16.0));
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`recipe`] | The eleven recipe families and their operation configs; recipe files |
//! | [`resolve`] | Pure recipe → token + ordered options resolution |
//! | [`convert`] | Domain values → engine values, including the normalizing newtypes |
//! | [`geometry`] | Point, size, rect, extent, affine transform, color |
//! | [`matrix`] | Row-major numeric matrix for convolution weights |
//! | [`raster`] | The shared RGBA8 image type callers pass in and get back |
//! | [`imaging`] | Engine traits, the pipeline executor and the bundled pure-Rust engine |
//! | [`config`] | `filterchain.toml` loading, validation and stock defaults |
//! | [`logging`] | Tracing subscriber setup |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Closed Recipe Families
//!
//! Each family is a closed enum and each operation a plain struct with named
//! fields. Unset optional parameters are never sent to the engine, so the
//! engine's own defaults stay authoritative. Adding an operation is one row in
//! the family's `recipe_family!` table.
//!
//! ## Engine Behind a Trait
//!
//! The executor only knows [`imaging::ProcessingEngine`]. The bundled
//! [`imaging::RustEngine`] implements a working subset in pure Rust on top of
//! the `image` crate; tokens it does not know fail the stage, which the
//! executor reports and skips.

pub mod config;
pub mod convert;
pub mod geometry;
pub mod imaging;
pub mod logging;
pub mod matrix;
pub mod output;
pub mod raster;
pub mod recipe;
pub mod resolve;

pub use imaging::{Executor, PipelineResult, RustEngine, apply_pipeline, generate};

#[cfg(test)]
pub(crate) mod test_helpers;
