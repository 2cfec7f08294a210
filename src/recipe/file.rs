//! Recipe files.
//!
//! A recipe file is an ordered list of recipes in TOML or JSON, chosen by
//! extension. Each entry names its `family` and `operation`; the remaining
//! keys are that operation's parameters. Unknown keys are rejected.
//!
//! ```toml
//! [[recipes]]
//! family = "blur"
//! operation = "gaussian"
//! radius = 4.0
//!
//! [[recipes]]
//! family = "composite_operation"
//! operation = "multiply_blend_mode"
//! background_image = "textures/paper.png"
//!
//! [[recipes]]
//! family = "color_adjustment"
//! operation = "tone_curve"
//! point0 = { x = 0.0, y = 0.1 }
//! point4 = { x = 1.0, y = 0.9 }
//! ```
//!
//! The JSON form is `{"recipes": [{"family": "blur", "operation": "gaussian", "radius": 4.0}]}`.
//! Image parameters are paths, decoded when the file is read; relative paths
//! resolve against the process working directory.

use super::Recipe;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecipeFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported recipe file extension: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecipeFile {
    recipes: Vec<Recipe>,
}

pub fn parse_toml(content: &str) -> Result<Vec<Recipe>, RecipeFileError> {
    let file: RecipeFile = toml::from_str(content)?;
    Ok(file.recipes)
}

pub fn parse_json(content: &str) -> Result<Vec<Recipe>, RecipeFileError> {
    let file: RecipeFile = serde_json::from_str(content)?;
    Ok(file.recipes)
}

/// Load the recipe list from a `.toml` or `.json` file.
pub fn load_recipes(path: &Path) -> Result<Vec<Recipe>, RecipeFileError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let content = fs::read_to_string(path)?;
    match extension.as_str() {
        "toml" => parse_toml(&content),
        "json" => parse_json(&content),
        other => Err(RecipeFileError::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, Point};
    use crate::recipe::*;
    use crate::test_helpers::write_solid_png;
    use tempfile::TempDir;

    #[test]
    fn parse_toml_preserves_order() {
        let recipes = parse_toml(
            r#"
            [[recipes]]
            family = "blur"
            operation = "gaussian"
            radius = 4

            [[recipes]]
            family = "sharpen"
            operation = "unsharp_mask"
            intensity = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(
            recipes,
            vec![
                Recipe::from(GaussianBlur { radius: Some(4.0) }),
                Recipe::from(UnsharpMask {
                    radius: None,
                    intensity: Some(0.5),
                }),
            ]
        );
    }

    #[test]
    fn parse_toml_nested_values() {
        let recipes = parse_toml(
            r#"
            [[recipes]]
            family = "color_adjustment"
            operation = "tone_curve"
            point0 = { x = 0.0, y = 0.1 }

            [[recipes]]
            family = "generator"
            operation = "checkerboard"
            color0 = { r = 1.0, g = 1.0, b = 1.0 }
            color1 = { r = 0.0, g = 0.0, b = 0.0, a = 0.5 }
            width = 8

            [[recipes]]
            family = "stylize"
            operation = "convolution3x3"
            weights = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]]
            "#,
        )
        .unwrap();

        assert_eq!(
            recipes[0],
            Recipe::from(ToneCurve {
                point0: Some(Point::new(0.0, 0.1)),
                ..Default::default()
            })
        );
        assert_eq!(
            recipes[1],
            Recipe::from(CheckerboardGenerator {
                color0: Color::WHITE,
                color1: Color::rgba(0.0, 0.0, 0.0, 0.5),
                width: Some(8.0),
                ..Default::default()
            })
        );
        let Recipe::Stylize(Stylize::Convolution3x3(conv)) = &recipes[2] else {
            panic!("expected convolution, got {:?}", recipes[2]);
        };
        assert_eq!(conv.weights.as_ref().unwrap().get(1, 1), Some(5.0));
    }

    #[test]
    fn parse_json_barcode() {
        let recipes = parse_json(
            r#"{"recipes": [{"family": "generator", "operation": "qr_code", "message": "hello", "correction_level": "H"}]}"#,
        )
        .unwrap();
        assert_eq!(
            recipes,
            vec![Recipe::from(QrCodeGenerator {
                message: "hello".into(),
                correction_level: Some(crate::convert::QrCorrectionLevel::H),
            })]
        );
    }

    #[test]
    fn unknown_parameter_rejected() {
        let result = parse_toml(
            r#"
            [[recipes]]
            family = "blur"
            operation = "gaussian"
            raduis = 4
            "#,
        );
        assert!(matches!(result, Err(RecipeFileError::Toml(_))));
    }

    #[test]
    fn unknown_operation_rejected() {
        let result = parse_toml(
            r#"
            [[recipes]]
            family = "blur"
            operation = "bokeh"
            "#,
        );
        assert!(matches!(result, Err(RecipeFileError::Toml(_))));
    }

    #[test]
    fn missing_required_parameter_rejected() {
        let result = parse_toml(
            r#"
            [[recipes]]
            family = "generator"
            operation = "constant_color"
            "#,
        );
        assert!(matches!(result, Err(RecipeFileError::Toml(_))));
    }

    #[test]
    fn load_recipes_reads_image_paths() {
        let tmp = TempDir::new().unwrap();
        let bg = write_solid_png(tmp.path(), "bg.png", 4, 4, [0, 0, 255, 255]);
        let recipe_path = tmp.path().join("recipes.toml");
        fs::write(
            &recipe_path,
            format!(
                "[[recipes]]\nfamily = \"composite_operation\"\noperation = \"source_over_compositing\"\nbackground_image = {:?}\n",
                bg.to_string_lossy()
            ),
        )
        .unwrap();

        let recipes = load_recipes(&recipe_path).unwrap();
        let Recipe::CompositeOperation(CompositeOperation::SourceOverCompositing(op)) = &recipes[0]
        else {
            panic!("unexpected recipe {:?}", recipes[0]);
        };
        assert_eq!(op.background_image.uniform_color(), Some([0, 0, 255, 255]));
    }

    #[test]
    fn load_recipes_rejects_other_extensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("recipes.yaml");
        fs::write(&path, "recipes: []").unwrap();
        assert!(matches!(
            load_recipes(&path),
            Err(RecipeFileError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }
}
