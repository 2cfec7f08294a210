use clap::{Parser, Subcommand};
use filterchain::geometry::Size;
use filterchain::imaging::{ErrorPolicy, Executor, PipelineResult, RustEngine};
use filterchain::raster::{RasterError, RasterImage};
use filterchain::recipe::file::load_recipes;
use filterchain::{config, logging, output};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "filterchain")]
#[command(about = "Apply typed image filter recipes to images")]
#[command(long_about = "\
Apply typed image filter recipes to images

A recipe file is an ordered list of filter stages in TOML or JSON:

  [[recipes]]
  family = \"blur\"
  operation = \"gaussian\"
  radius = 4.0

  [[recipes]]
  family = \"composite_operation\"
  operation = \"multiply_blend_mode\"
  background_image = \"textures/paper.png\"

Stages the engine cannot apply are skipped and reported; the rest still run.
Set [pipeline] error_policy = \"strict\" to stop at the first failure instead.

Run 'filterchain list' to see every family, operation and engine token.
Run 'filterchain gen-config' to generate a documented filterchain.toml.")]
#[command(version)]
struct Cli {
    /// Config file (optional; stock defaults apply when absent)
    #[arg(long, default_value = "filterchain.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a recipe file over one or more images, writing PNGs
    Apply {
        /// Recipe file (.toml or .json)
        #[arg(long)]
        recipes: PathBuf,
        /// Directory for the filtered images
        #[arg(long, default_value = "out")]
        output_dir: PathBuf,
        /// Input images
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Render a generator recipe (plus any following stages) to a PNG
    Generate {
        /// Recipe file; the first recipe must be a generator or gradient
        #[arg(long)]
        recipes: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        #[arg(long)]
        output: PathBuf,
    },
    /// List every recipe family, operation and engine token
    List,
    /// Print a stock filterchain.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Apply {
            recipes,
            output_dir,
            inputs,
        } => {
            let config = config::load_config(&cli.config)?;
            logging::init(&config.logging)?;
            let recipes = load_recipes(&recipes)?;
            let targets = output_paths(&output_dir, &inputs)?;
            init_thread_pool(&config.processing);
            std::fs::create_dir_all(&output_dir)?;

            let engine = RustEngine::with_max_pixels(config.render.max_pixels);
            let results: Vec<(PathBuf, PathBuf, Result<PipelineResult, RasterError>)> = inputs
                .par_iter()
                .zip(&targets)
                .map(|(input, target)| {
                    let result = apply_one(&engine, &config.pipeline, input, target, &recipes);
                    (input.clone(), target.clone(), result)
                })
                .collect();

            let (mut degraded, mut failed) = (0, 0);
            for (input, target, result) in &results {
                match result {
                    Ok(result) => {
                        output::print_apply(input, target, &recipes, result);
                        if !result.is_fully_applied() {
                            degraded += 1;
                            if config.pipeline.error_policy == ErrorPolicy::Strict {
                                failed += 1;
                            }
                        }
                    }
                    Err(err) => {
                        eprintln!("{}: {}", input.display(), err);
                        failed += 1;
                    }
                }
            }
            println!("{}", output::format_summary(results.len(), degraded, failed));
            if failed > 0 {
                return Err(format!("{failed} of {} images failed", results.len()).into());
            }
        }
        Command::Generate {
            recipes,
            width,
            height,
            output: target,
        } => {
            let config = config::load_config(&cli.config)?;
            logging::init(&config.logging)?;
            let recipes = load_recipes(&recipes)?;
            let Some((head, rest)) = recipes.split_first() else {
                return Err("recipe file is empty".into());
            };

            let engine = RustEngine::with_max_pixels(config.render.max_pixels);
            let result = Executor::new(&engine)
                .with_policy(config.pipeline.error_policy)
                .generate_with(head, rest, Size::new(width as f32, height as f32));
            let image = generated_image(&result, config.pipeline.error_policy)?;
            image.save(&target)?;
            output::print_generate(&target, &recipes, &result);
        }
        Command::List => {
            output::print_catalog();
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Run the recipes over one file and write the result to `target`.
fn apply_one(
    engine: &RustEngine,
    pipeline: &config::PipelineConfig,
    input: &Path,
    target: &Path,
    recipes: &[filterchain::recipe::Recipe],
) -> Result<PipelineResult, RasterError> {
    let image = RasterImage::open(input)?;
    let result = Executor::new(engine)
        .with_policy(pipeline.error_policy)
        .with_source_extent_fallback(pipeline.source_extent_fallback)
        .run(&image, recipes);
    result.image.save(target)?;
    Ok(result)
}

/// The image `generate` should write.
///
/// Best-effort runs keep whatever was rendered; strict runs and runs that
/// rendered nothing surface the pipeline error instead.
fn generated_image(
    result: &PipelineResult,
    policy: ErrorPolicy,
) -> Result<&RasterImage, Box<dyn Error>> {
    if policy == ErrorPolicy::Strict || result.image.is_empty() {
        result.clone().into_result()?;
    }
    if result.image.is_empty() {
        return Err("nothing was rendered".into());
    }
    Ok(&result.image)
}

/// `<output_dir>/<input stem>.png` for each input, in input order.
///
/// Inputs sharing a stem get their 1-based position appended
/// (`x-001.png`, `x-002.png`). Fails if two inputs would still write the
/// same file.
fn output_paths(output_dir: &Path, inputs: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let stems: Vec<String> = inputs
        .iter()
        .map(|input| {
            input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string())
        })
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for stem in &stems {
        *counts.entry(stem.as_str()).or_default() += 1;
    }

    let paths: Vec<PathBuf> = stems
        .iter()
        .enumerate()
        .map(|(i, stem)| {
            if counts[stem.as_str()] > 1 {
                output_dir.join(format!("{stem}-{:0>3}.png", i + 1))
            } else {
                output_dir.join(format!("{stem}.png"))
            }
        })
        .collect();

    let duplicate = {
        let mut seen = HashSet::new();
        paths.iter().find(|p| !seen.insert(*p)).cloned()
    };
    if let Some(dup) = duplicate {
        return Err(format!("two inputs would both be written to {}", dup.display()));
    }
    Ok(paths)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. Users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
