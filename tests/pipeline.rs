//! End-to-end pipeline tests against the bundled pure-Rust engine.
//!
//! Run with: cargo test --test pipeline

use filterchain::convert::{AsciiMessage, EngineValue};
use filterchain::geometry::{Color, Size};
use filterchain::imaging::{
    EngineError, ErrorPolicy, Executor, Finalization, PipelineError, RustEngine, StageOutcome,
};
use filterchain::raster::RasterImage;
use filterchain::recipe::file::{load_recipes, parse_json};
use filterchain::recipe::*;
use filterchain::resolve::resolve;
use filterchain::{apply_pipeline, generate};
use image::{Rgba, RgbaImage};

fn ramp(width: u32, height: u32) -> RasterImage {
    RasterImage::new(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 20) as u8, (y * 20) as u8, 128, 255])
    }))
}

#[test]
fn constant_color_generates_uniform_image() {
    let engine = RustEngine::new();
    let recipe: Recipe = ConstantColorGenerator { color: Color::RED }.into();
    let image = generate(&engine, &recipe, Size::new(50.0, 50.0));
    assert_eq!(image.width(), 50);
    assert_eq!(image.height(), 50);
    assert_eq!(image.uniform_color(), Some([255, 0, 0, 255]));
}

#[test]
fn unsupported_stage_is_skipped_and_reported() {
    let engine = RustEngine::new();
    let input = ramp(8, 8);
    let blur: Recipe = GaussianBlur { radius: Some(1.0) }.into();
    let sepia: Recipe = SepiaTone { intensity: Some(1.0) }.into();
    let recipes = vec![blur.clone(), Bloom::default().into(), sepia.clone()];

    let result = Executor::new(&engine).run(&input, &recipes);

    assert_eq!(result.outcomes.len(), 3);
    assert_eq!(result.outcomes[0], StageOutcome::Applied(Token::new("CIGaussianBlur")));
    assert_eq!(
        result.outcomes[1],
        StageOutcome::Failed(EngineError::UnknownOperation(Token::new("CIBloom")))
    );
    assert_eq!(result.outcomes[2], StageOutcome::Applied(Token::new("CISepiaTone")));
    assert_eq!(result.finalization, Finalization::OutputExtent);
    assert!(!result.is_fully_applied());

    assert_ne!(result.image, input);
    assert_ne!(result.image, apply_pipeline(&engine, &input, std::slice::from_ref(&blur)));
    assert_eq!(result.image, apply_pipeline(&engine, &input, &[blur, sepia]));
}

#[test]
fn huge_blur_radius_stays_bounded() {
    let engine = RustEngine::new();
    let input = RasterImage::solid(2, 2, Color::BLUE);
    let recipes: Vec<Recipe> = vec![
        GaussianBlur { radius: Some(20_000.0) }.into(),
        BoxBlur { radius: Some(20_000.0) }.into(),
    ];

    let result = Executor::new(&engine).run(&input, &recipes);

    assert!(result.is_fully_applied());
    assert_eq!(result.image.uniform_color(), Some([0, 0, 255, 255]));
}

#[test]
fn strict_policy_returns_input_on_first_failure() {
    let engine = RustEngine::new();
    let input = ramp(4, 4);
    let recipes: Vec<Recipe> = vec![Bloom::default().into(), ColorInvert {}.into()];

    let result = Executor::new(&engine)
        .with_policy(ErrorPolicy::Strict)
        .run(&input, &recipes);

    assert_eq!(result.image, input);
    assert_eq!(result.outcomes[1], StageOutcome::Skipped(Token::new("CIColorInvert")));
    assert!(matches!(
        result.into_result(),
        Err(PipelineError::Stage { index: 0, .. })
    ));
}

#[test]
fn pipelines_compose() {
    let engine = RustEngine::new();
    let input = ramp(6, 5);
    let a: Recipe = ColorInvert {}.into();
    let b: Recipe = MaximumComponent {}.into();

    let stepwise = apply_pipeline(
        &engine,
        &apply_pipeline(&engine, &input, std::slice::from_ref(&a)),
        std::slice::from_ref(&b),
    );
    let chained = apply_pipeline(&engine, &input, &[a, b]);

    assert_eq!(stepwise.digest(), chained.digest());
}

#[test]
fn empty_pipeline_is_identity() {
    let engine = RustEngine::new();
    let input = ramp(3, 3);
    assert_eq!(apply_pipeline(&engine, &input, &[]), input);
}

#[test]
fn barcode_message_resolves_to_bytes() {
    let recipe: Recipe = QrCodeGenerator {
        message: "hello".into(),
        correction_level: None,
    }
    .into();
    let resolved = resolve(&recipe);
    assert_eq!(resolved.token.as_str(), "CIQRCodeGenerator");
    assert_eq!(resolved.keys(), vec![OptionKey::Message]);
    assert_eq!(
        resolved.option(OptionKey::Message),
        Some(&EngineValue::Bytes(b"hello".to_vec()))
    );
}

#[test]
fn unencodable_barcode_message_is_dropped() {
    let recipe: Recipe = Code128BarcodeGenerator {
        message: AsciiMessage("naïve".into()),
        quiet_space: None,
    }
    .into();
    assert!(resolve(&recipe).options.is_empty());
}

#[test]
fn unsupported_generator_yields_empty_image() {
    let engine = RustEngine::new();
    let recipe: Recipe = QrCodeGenerator {
        message: "hello".into(),
        correction_level: None,
    }
    .into();
    let result = Executor::new(&engine).generate(&recipe, Size::new(10.0, 10.0));
    assert!(result.image.is_empty());
    assert_eq!(result.finalization, Finalization::Identity);
}

#[test]
fn recipe_file_drives_a_composite() {
    let tmp = tempfile::TempDir::new().unwrap();
    let paper = tmp.path().join("paper.png");
    RasterImage::solid(8, 8, Color::WHITE).save(&paper).unwrap();

    let recipe_path = tmp.path().join("recipes.toml");
    std::fs::write(
        &recipe_path,
        format!(
            r#"
[[recipes]]
family = "composite_operation"
operation = "multiply_blend_mode"
background_image = "{}"
"#,
            paper.display()
        ),
    )
    .unwrap();

    let recipes = load_recipes(&recipe_path).unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].to_string(), "composite_operation.multiply_blend_mode");

    let engine = RustEngine::new();
    let input = RasterImage::solid(8, 8, Color::RED);
    let result = Executor::new(&engine).run(&input, &recipes);
    assert!(result.is_fully_applied());
    assert_eq!(result.image.uniform_color(), Some([255, 0, 0, 255]));
}

#[test]
fn json_recipes_match_typed_recipes() {
    let recipes = parse_json(
        r#"{"recipes": [
            {"family": "blur", "operation": "gaussian", "radius": 4.0},
            {"family": "color_effect", "operation": "sepia_tone"}
        ]}"#,
    )
    .unwrap();
    assert_eq!(
        recipes,
        vec![
            Recipe::from(GaussianBlur { radius: Some(4.0) }),
            Recipe::from(SepiaTone { intensity: None }),
        ]
    );
}

#[test]
fn render_budget_falls_back_to_input() {
    let engine = RustEngine::with_max_pixels(10);
    let input = ramp(8, 8);
    let result = Executor::new(&engine).run(&input, &[ColorInvert {}.into()]);
    assert_eq!(result.finalization, Finalization::Identity);
    assert_eq!(result.image, input);
    assert!(result.into_result().is_err());
}
