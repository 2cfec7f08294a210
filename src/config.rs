//! Configuration module.
//!
//! Handles loading, validating, and merging `filterchain.toml`. Stock
//! defaults are serialized to a TOML value and the user file is merged on
//! top, so a config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [pipeline]
//! error_policy = "best-effort"   # or "strict": stop at the first failed stage
//! source_extent_fallback = true  # render unbounded output at the input's size
//!
//! [render]
//! max_pixels = 268435456         # refuse renders larger than this
//!
//! [logging]
//! level = "warn"                 # trace, debug, info, warn, error, off
//! json = false                   # JSON lines instead of human-readable output
//!
//! [processing]
//! max_processes = 4              # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::ErrorPolicy;
use crate::imaging::rust_backend::DEFAULT_MAX_PIXELS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `filterchain.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainConfig {
    pub pipeline: PipelineConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
    pub processing: ProcessingConfig,
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl ChainConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.max_pixels == 0 {
            return Err(ConfigError::Validation(
                "render.max_pixels must be positive".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// How recipe lists are executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub error_policy: ErrorPolicy,
    /// Render at the input's extent when the output cannot be rendered at its own.
    pub source_extent_fallback: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::BestEffort,
            source_extent_fallback: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Largest pixel count a single render may produce.
    pub max_pixels: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default level filter. `RUST_LOG` takes precedence when set.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers for `apply`.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Stock defaults as a TOML value, the base every user file merges onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ChainConfig::default()).expect("default config must serialize")
}

/// Deep-merge two TOML values. Tables merge key by key; anything else in
/// `overlay` replaces `base`.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. A missing file is `Ok(None)`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ChainConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ChainConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `path` over the stock defaults.
pub fn load_config(path: &Path) -> Result<ChainConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// The documented stock config, as printed by `filterchain gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# filterchain configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Pipeline execution
# ---------------------------------------------------------------------------
[pipeline]
# What to do when a stage cannot be applied (unknown operation, no output):
#   "best-effort" - log it, skip the stage, keep going with the unchanged image
#   "strict"      - stop, skip the remaining stages and return the input
error_policy = "best-effort"

# When the final image cannot be rendered at its own extent (generators and
# tiles are unbounded), render it at the input image's extent instead.
source_extent_fallback = true

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[render]
# Renders larger than this many pixels are refused.
max_pixels = 268435456

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# One of: trace, debug, info, warn, error, off. RUST_LOG overrides it.
level = "warn"

# Emit JSON lines instead of human-readable output.
json = false

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for `apply`.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = ChainConfig::default();
        assert_eq!(config.pipeline.error_policy, ErrorPolicy::BestEffort);
        assert!(config.pipeline.source_extent_fallback);
        assert_eq!(config.render.max_pixels, 268_435_456);
        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.json);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn parse_partial_config() {
        let config: ChainConfig = toml::from_str(
            r#"
[pipeline]
error_policy = "strict"
"#,
        )
        .unwrap();
        assert_eq!(config.pipeline.error_policy, ErrorPolicy::Strict);
        assert!(config.pipeline.source_extent_fallback);
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn parse_processing_config() {
        let config: ChainConfig = toml::from_str(
            r#"
[processing]
max_processes = 4
"#,
        )
        .unwrap();
        assert_eq!(config.processing.max_processes, Some(4));
    }

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"max_pixels = 100"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"max_pixels = 50"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("max_pixels").unwrap().as_integer(), Some(50));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[logging]
level = "warn"
json = false
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[logging]
json = true
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let logging = merged.get("logging").unwrap();
        assert_eq!(logging.get("json").unwrap().as_bool(), Some(true));
        assert_eq!(logging.get("level").unwrap().as_str(), Some("warn"));
    }

    #[test]
    fn merge_toml_overlay_adds_keys() {
        let base: toml::Value = toml::from_str("a = 1").unwrap();
        let overlay: toml::Value = toml::from_str("b = 2").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(1));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<ChainConfig, _> = toml::from_str(
            r#"
[render]
max_pixel = 10
"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<ChainConfig, _> = toml::from_str(
            r#"
[renderer]
max_pixels = 10
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_policy_rejected() {
        let result: Result<ChainConfig, _> = toml::from_str(
            r#"
[pipeline]
error_policy = "lenient"
"#,
        );
        assert!(result.is_err());
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(ChainConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_max_pixels() {
        let mut config = ChainConfig::default();
        config.render.max_pixels = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_log_level() {
        let mut config = ChainConfig::default();
        config.logging.level = "DEBUG".into();
        assert!(config.validate().is_ok());
        config.logging.level = "loud".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_workers() {
        let mut config = ChainConfig::default();
        config.processing.max_processes = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("filterchain.toml")).unwrap();
        assert_eq!(config, ChainConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("filterchain.toml");
        fs::write(
            &path,
            r#"
[render]
max_pixels = 1000

[logging]
json = true
"#,
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.render.max_pixels, 1000);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("filterchain.toml");
        fs::write(&path, "this is not [valid toml").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("filterchain.toml");
        fs::write(&path, "[render]\nmax_pixels = 0\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn resolve_config_with_no_overlay() {
        let config = resolve_config(stock_defaults_value(), None).unwrap();
        assert_eq!(config, ChainConfig::default());
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: ChainConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ChainConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        for section in ["pipeline", "render", "logging", "processing"] {
            assert!(val.get(section).is_some(), "missing [{section}]");
        }
    }
}
