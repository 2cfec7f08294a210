//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ## Apply
//!
//! ```text
//! photo.jpg → out/photo.png
//!     001 blur.gaussian: applied
//!     002 stylize.bloom: failed (No engine operation matches token CIBloom)
//!     003 sharpen.unsharp_mask: applied
//!     Render: output extent
//! ```
//!
//! ## List
//!
//! ```text
//! blur
//!     box → CIBoxBlur
//!     disc → CIDiscBlur
//! ```

use crate::imaging::{Finalization, PipelineResult, StageOutcome};
use crate::recipe::Recipe;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn outcome_text(outcome: &StageOutcome) -> String {
    match outcome {
        StageOutcome::Applied(_) => "applied".to_string(),
        StageOutcome::Failed(err) => format!("failed ({err})"),
        StageOutcome::Skipped(_) => "skipped".to_string(),
    }
}

fn finalization_text(finalization: Finalization) -> &'static str {
    match finalization {
        Finalization::OutputExtent => "output extent",
        Finalization::SourceExtent => "source extent (output was not renderable)",
        Finalization::Identity => "nothing rendered, input returned unchanged",
    }
}

/// One line per stage plus the render line, indented under a header.
fn stage_lines(recipes: &[Recipe], result: &PipelineResult) -> Vec<String> {
    let mut lines: Vec<String> = recipes
        .iter()
        .zip(&result.outcomes)
        .enumerate()
        .map(|(i, (recipe, outcome))| {
            format!(
                "{}{} {}: {}",
                indent(1),
                format_index(i + 1),
                recipe,
                outcome_text(outcome)
            )
        })
        .collect();
    lines.push(format!(
        "{}Render: {}",
        indent(1),
        finalization_text(result.finalization)
    ));
    lines
}

pub fn format_apply(
    input: &Path,
    output: &Path,
    recipes: &[Recipe],
    result: &PipelineResult,
) -> Vec<String> {
    let mut lines = vec![format!("{} → {}", input.display(), output.display())];
    lines.extend(stage_lines(recipes, result));
    lines
}

pub fn print_apply(input: &Path, output: &Path, recipes: &[Recipe], result: &PipelineResult) {
    for line in format_apply(input, output, recipes, result) {
        println!("{}", line);
    }
}

pub fn format_generate(
    output: &Path,
    recipes: &[Recipe],
    result: &PipelineResult,
) -> Vec<String> {
    let mut lines = vec![format!(
        "Generated {}x{} → {}",
        result.image.width(),
        result.image.height(),
        output.display()
    )];
    lines.extend(stage_lines(recipes, result));
    lines
}

pub fn print_generate(output: &Path, recipes: &[Recipe], result: &PipelineResult) {
    for line in format_generate(output, recipes, result) {
        println!("{}", line);
    }
}

/// Every family with its operations and engine tokens.
pub fn format_catalog() -> Vec<String> {
    let mut lines = Vec::new();
    for (family, operations) in Recipe::FAMILIES {
        lines.push(family.to_string());
        for (name, token) in operations.iter() {
            lines.push(format!("{}{} → {}", indent(1), name, token));
        }
    }
    lines
}

pub fn print_catalog() {
    for line in format_catalog() {
        println!("{}", line);
    }
}

/// Summary after a multi-file `apply`.
pub fn format_summary(processed: usize, degraded: usize, failed: usize) -> String {
    let mut summary = format!("Processed {} image{}", processed, plural(processed));
    if degraded > 0 {
        summary.push_str(&format!(", {} with skipped stages", degraded));
    }
    if failed > 0 {
        summary.push_str(&format!(", {} failed", failed));
    }
    summary
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::imaging::backend::tests::MockEngine;
    use crate::imaging::{ErrorPolicy, Executor};
    use crate::recipe::*;
    use crate::test_helpers::solid;

    fn recipes() -> Vec<Recipe> {
        vec![
            GaussianBlur { radius: Some(1.0) }.into(),
            Bloom::default().into(),
            ColorInvert {}.into(),
        ]
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn apply_lists_every_stage() {
        let engine = MockEngine::new().rejecting(&["CIBloom"]);
        let input = solid(2, 2, [0, 0, 0, 255]);
        let result = Executor::new(&engine).run(&input, &recipes());
        let lines = format_apply(
            Path::new("in.png"),
            Path::new("out/in.png"),
            &recipes(),
            &result,
        );
        assert_eq!(
            lines,
            vec![
                "in.png → out/in.png".to_string(),
                "    001 blur.gaussian: applied".to_string(),
                "    002 stylize.bloom: failed (No engine operation matches token CIBloom)"
                    .to_string(),
                "    003 color_effect.color_invert: applied".to_string(),
                "    Render: output extent".to_string(),
            ]
        );
    }

    #[test]
    fn strict_run_shows_skipped_stages() {
        let engine = MockEngine::new().rejecting(&["CIBloom"]);
        let input = solid(2, 2, [0, 0, 0, 255]);
        let result = Executor::new(&engine)
            .with_policy(ErrorPolicy::Strict)
            .run(&input, &recipes());
        let lines = format_apply(Path::new("a"), Path::new("b"), &recipes(), &result);
        assert_eq!(lines[3], "    003 color_effect.color_invert: skipped");
    }

    #[test]
    fn generate_header_has_size() {
        let engine = MockEngine::new();
        let head: Recipe = ConstantColorGenerator {
            color: crate::geometry::Color::RED,
        }
        .into();
        let result = Executor::new(&engine).generate(&head, Size::new(8.0, 4.0));
        let lines = format_generate(Path::new("red.png"), &[head], &result);
        assert_eq!(lines[0], "Generated 8x4 → red.png");
        assert_eq!(lines[1], "    001 generator.constant_color: applied");
    }

    #[test]
    fn failed_generate_reports_identity() {
        let engine = MockEngine::new();
        let head: Recipe = GaussianBlur::default().into();
        let result = Executor::new(&engine).generate(&head, Size::new(8.0, 4.0));
        let lines = format_generate(Path::new("x.png"), &[head], &result);
        assert_eq!(lines[0], "Generated 0x0 → x.png");
        assert_eq!(
            lines.last().unwrap(),
            "    Render: nothing rendered, input returned unchanged"
        );
    }

    #[test]
    fn catalog_covers_every_family() {
        let lines = format_catalog();
        for (family, ops) in Recipe::FAMILIES {
            assert!(lines.iter().any(|l| l == *family));
            assert!(lines.len() > ops.len());
        }
        assert!(lines.contains(&"    gaussian → CIGaussianBlur".to_string()));
    }

    #[test]
    fn summary_pluralizes() {
        assert_eq!(format_summary(1, 0, 0), "Processed 1 image");
        assert_eq!(
            format_summary(3, 1, 1),
            "Processed 3 images, 1 with skipped stages, 1 failed"
        );
    }
}
