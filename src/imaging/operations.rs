//! Pipeline execution.
//!
//! An [`Executor`] threads an image through an ordered list of recipes on a
//! [`ProcessingEngine`] and rasterizes the result. Runs are best-effort by
//! default: a stage that cannot be applied is logged, recorded in the
//! [`PipelineResult`], and the image passes through unchanged.
//!
//! ```text
//! import ──► stage 0 ──► stage 1 ──► … ──► render(output extent)
//!                                              │ fails / unbounded
//!                                              ▼
//!                                       render(source extent)
//!                                              │ fails
//!                                              ▼
//!                                        input unchanged
//! ```

use super::backend::{EngineError, EngineImage, EngineOperation, ProcessingEngine};
use crate::geometry::{Extent, Rect, Size};
use crate::raster::RasterImage;
use crate::recipe::{Recipe, Token};
use crate::resolve::resolve;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// What a run does when a stage fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Skip the failed stage and keep going with the unchanged image.
    #[default]
    BestEffort,
    /// Stop at the first failure and hand back the input.
    Strict,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Applied(Token),
    Failed(EngineError),
    /// Not attempted: an earlier failure under [`ErrorPolicy::Strict`], or
    /// the input never made it into the engine.
    Skipped(Token),
}

/// Which rasterization path produced the final image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finalization {
    OutputExtent,
    SourceExtent,
    /// Nothing could be rendered; the input (or an empty image, when
    /// generating) was returned as is.
    Identity,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Engine could not import the input image")]
    Import,
    #[error("Stage {index} failed: {source}")]
    Stage { index: usize, source: EngineError },
    #[error("Final render failed: {0}")]
    Finalize(EngineError),
    #[error("Final image has no renderable extent ({0})")]
    Unrenderable(Extent),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub image: RasterImage,
    pub outcomes: Vec<StageOutcome>,
    pub finalization: Finalization,
    terminal: Option<PipelineError>,
}

impl PipelineResult {
    /// Every stage applied and the output rendered at its own extent.
    pub fn is_fully_applied(&self) -> bool {
        self.finalization == Finalization::OutputExtent
            && self
                .outcomes
                .iter()
                .all(|o| matches!(o, StageOutcome::Applied(_)))
    }

    /// Failed stages with their index.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &EngineError)> {
        self.outcomes.iter().enumerate().filter_map(|(i, o)| match o {
            StageOutcome::Failed(e) => Some((i, e)),
            _ => None,
        })
    }

    /// The first stage failure, else the finalization failure, else the image.
    pub fn into_result(self) -> Result<RasterImage, PipelineError> {
        if let Some((index, source)) = self.failures().next() {
            return Err(PipelineError::Stage {
                index,
                source: source.clone(),
            });
        }
        match self.terminal {
            Some(err) => Err(err),
            None => Ok(self.image),
        }
    }
}

/// Runs recipe lists on one engine, reusing a single render context.
pub struct Executor<'e, E: ProcessingEngine> {
    engine: &'e E,
    context: E::Context,
    policy: ErrorPolicy,
    source_extent_fallback: bool,
}

impl<'e, E: ProcessingEngine> Executor<'e, E> {
    pub fn new(engine: &'e E) -> Self {
        Self {
            engine,
            context: engine.create_context(),
            policy: ErrorPolicy::default(),
            source_extent_fallback: true,
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether an unrenderable output falls back to the input's extent.
    pub fn with_source_extent_fallback(mut self, enabled: bool) -> Self {
        self.source_extent_fallback = enabled;
        self
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn context(&self) -> &E::Context {
        &self.context
    }

    /// Apply `recipes` to `image` in order.
    #[tracing::instrument(skip_all, fields(stages = recipes.len(), width = image.width(), height = image.height()))]
    pub fn run(&mut self, image: &RasterImage, recipes: &[Recipe]) -> PipelineResult {
        let Some(start) = self.engine.import(image) else {
            warn!("engine refused the input image, returning it unchanged");
            return PipelineResult {
                image: image.clone(),
                outcomes: recipes.iter().map(|r| StageOutcome::Skipped(r.token())).collect(),
                finalization: Finalization::Identity,
                terminal: Some(PipelineError::Import),
            };
        };

        let (current, outcomes) = self.run_stages(start, recipes, false);
        let (rendered, finalization, terminal) = self.finalize(&current, image);
        PipelineResult {
            image: rendered,
            outcomes,
            finalization,
            terminal,
        }
    }

    /// Render a generator recipe over `(0, 0, size)`.
    pub fn generate(&mut self, recipe: &Recipe, size: Size) -> PipelineResult {
        self.generate_with(recipe, &[], size)
    }

    /// Render a generator followed by ordinary stages over `(0, 0, size)`.
    #[tracing::instrument(skip_all, fields(head = %head, stages = rest.len() + 1))]
    pub fn generate_with(&mut self, head: &Recipe, rest: &[Recipe], size: Size) -> PipelineResult {
        let recipes: Vec<Recipe> = std::iter::once(head.clone())
            .chain(rest.iter().cloned())
            .collect();
        let (current, outcomes) = self.run_stages(self.engine.empty_image(), &recipes, true);

        let bounds = Rect::from_size(size);
        let (image, finalization, terminal) =
            match self.engine.render(&mut self.context, &current, bounds) {
                Ok(raster) => (raster, Finalization::OutputExtent, None),
                Err(err) => {
                    warn!(%bounds, error = %err, "generated image could not be rendered");
                    (
                        RasterImage::empty(),
                        Finalization::Identity,
                        Some(PipelineError::Finalize(err)),
                    )
                }
            };
        PipelineResult {
            image,
            outcomes,
            finalization,
            terminal,
        }
    }

    fn run_stages(
        &self,
        start: E::Image,
        recipes: &[Recipe],
        generator_head: bool,
    ) -> (E::Image, Vec<StageOutcome>) {
        let mut current = start.clone();
        let mut outcomes = Vec::with_capacity(recipes.len());

        for (index, recipe) in recipes.iter().enumerate() {
            let result = if generator_head && index == 0 && !recipe.is_generator() {
                Err(EngineError::NotAGenerator(recipe.token()))
            } else {
                self.apply_stage(&current, recipe)
            };

            match result {
                Ok(next) => {
                    debug!(index, token = %recipe.token(), extent = %next.extent(), "stage applied");
                    current = next;
                    outcomes.push(StageOutcome::Applied(recipe.token()));
                }
                Err(err) => {
                    warn!(index, recipe = %recipe, error = %err, "stage not applied");
                    outcomes.push(StageOutcome::Failed(err));
                    if self.policy == ErrorPolicy::Strict {
                        outcomes.extend(
                            recipes[index + 1..]
                                .iter()
                                .map(|r| StageOutcome::Skipped(r.token())),
                        );
                        return (start, outcomes);
                    }
                }
            }
        }
        (current, outcomes)
    }

    fn apply_stage(&self, current: &E::Image, recipe: &Recipe) -> Result<E::Image, EngineError> {
        let resolved = resolve(recipe);
        let token = resolved.token;
        let mut operation = self
            .engine
            .create_operation(token)
            .ok_or(EngineError::UnknownOperation(token))?;
        operation.set_defaults();
        if !recipe.is_generator() {
            operation.set_input(current.clone());
        }
        for (key, value) in resolved.options {
            operation.set_option(key, value);
        }
        operation
            .output()
            .ok_or(EngineError::NoOutputProduced(token))
    }

    fn finalize(
        &mut self,
        image: &E::Image,
        source: &RasterImage,
    ) -> (RasterImage, Finalization, Option<PipelineError>) {
        let extent = image.extent();
        let mut terminal = PipelineError::Unrenderable(extent);

        match extent.renderable() {
            Some(bounds) => match self.engine.render(&mut self.context, image, bounds) {
                Ok(raster) => return (raster, Finalization::OutputExtent, None),
                Err(err) => {
                    warn!(%bounds, error = %err, "render at output extent failed");
                    terminal = PipelineError::Finalize(err);
                }
            },
            None => warn!(%extent, "output extent is not renderable"),
        }

        if self.source_extent_fallback && !source.is_empty() {
            let bounds = source.bounds();
            match self.engine.render(&mut self.context, image, bounds) {
                Ok(raster) => {
                    debug!(%bounds, "rendered at source extent");
                    return (raster, Finalization::SourceExtent, None);
                }
                Err(err) => {
                    warn!(%bounds, error = %err, "render at source extent failed");
                    terminal = PipelineError::Finalize(err);
                }
            }
        }

        warn!("returning the input image unchanged");
        (source.clone(), Finalization::Identity, Some(terminal))
    }
}

/// Apply `recipes` to `image`, best-effort. Never fails.
pub fn apply_pipeline<E: ProcessingEngine>(
    engine: &E,
    image: &RasterImage,
    recipes: &[Recipe],
) -> RasterImage {
    Executor::new(engine).run(image, recipes).image
}

/// Render a generator recipe at `size`. Returns an empty image on failure.
pub fn generate<E: ProcessingEngine>(engine: &E, recipe: &Recipe, size: Size) -> RasterImage {
    Executor::new(engine).generate(recipe, size).image
}
