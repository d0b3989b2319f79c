use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::PensieveError;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PensieveConfig {
    pub logging: LoggingConfig,
    pub segmenter: SegmenterConfig,
    pub annotation: AnnotationConfig,
    pub disambiguation: DisambiguationConfig,
    pub filter: FilterConfig,
    pub memory: MemoryConfig,
    pub images: ImageConfig,
    pub export: ExportConfig,
    pub parallel: ParallelConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SegmenterConfig {
    /// A chunk keeps absorbing lines until it holds at least this many tokens.
    pub min_tokens: usize,
    /// File extensions (without the dot) to load; empty loads every regular file.
    pub extensions: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Analyzer backend; `"heuristic"` is built in.
    pub analyzer: String,
    pub top_verbs: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisambiguationConfig {
    pub place_ratio: f64,
    pub thing_limit: usize,
}

/// How the mention density is compared against the threshold.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `density > threshold`
    #[default]
    Strict,
    /// `density >= threshold`
    Inclusive,
}

impl Comparison {
    pub fn passes(&self, density: f64, threshold: f64) -> bool {
        match self {
            Self::Strict => density > threshold,
            Self::Inclusive => density >= threshold,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FilterConfig {
    pub threshold: f64,
    pub comparison: Comparison,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MemoryConfig {
    pub n_verbs: usize,
    pub alone_sentinel: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ImageConfig {
    pub provider: String,
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ParallelConfig {
    pub workers: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_tokens: 25,
            extensions: Vec::new(),
        }
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            analyzer: "heuristic".into(),
            top_verbs: 5,
        }
    }
}

impl Default for DisambiguationConfig {
    fn default() -> Self {
        Self {
            place_ratio: 2.5,
            thing_limit: 5,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            comparison: Comparison::Strict,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            n_verbs: 3,
            alone_sentinel: "alone".into(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            provider: "bing".into(),
            endpoint: "https://api.cognitive.microsoft.com/bing/v5.0/images/search".into(),
            api_key: String::new(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: "memories".into(),
        }
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

/// Returns `~/.pensieve/`
pub fn default_pensieve_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pensieve")
}

/// Returns the default config file path: `~/.pensieve/config.toml`
pub fn default_config_path() -> PathBuf {
    default_pensieve_dir().join("config.toml")
}

impl PensieveConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            PensieveConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (PENSIEVE_LOG_LEVEL, PENSIEVE_OUTPUT_DIR,
    /// PENSIEVE_BING_KEY).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PENSIEVE_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("PENSIEVE_OUTPUT_DIR") {
            self.export.output_dir = val;
        }
        if let Ok(val) = std::env::var("PENSIEVE_BING_KEY") {
            self.images.api_key = val;
        }
    }

    /// Reject settings that would make a corpus pass meaningless. Runs before any
    /// document is read.
    pub fn validate(&self) -> Result<(), PensieveError> {
        validate_threshold(self.filter.threshold)?;
        let ratio = self.disambiguation.place_ratio;
        if ratio.is_nan() || ratio < 0.0 {
            return Err(PensieveError::Configuration(format!(
                "place_ratio must be a non-negative number, got {ratio}"
            )));
        }
        if self.memory.n_verbs == 0 {
            return Err(PensieveError::Configuration(
                "memory.n_verbs must be at least 1".into(),
            ));
        }
        if self.parallel.workers == 0 {
            return Err(PensieveError::Configuration(
                "parallel.workers must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the export directory, expanding `~` if needed.
    pub fn resolved_output_dir(&self) -> PathBuf {
        expand_tilde(&self.export.output_dir)
    }
}

/// A density threshold must be a finite, non-negative number.
pub fn validate_threshold(threshold: f64) -> Result<(), PensieveError> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(PensieveError::Configuration(format!(
            "density threshold must be a finite non-negative number, got {threshold}"
        )));
    }
    Ok(())
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PensieveConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.segmenter.min_tokens, 25);
        assert_eq!(config.disambiguation.place_ratio, 2.5);
        assert_eq!(config.disambiguation.thing_limit, 5);
        assert_eq!(config.filter.threshold, 0.8);
        assert_eq!(config.filter.comparison, Comparison::Strict);
        assert_eq!(config.memory.alone_sentinel, "alone");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[logging]
level = "debug"

[filter]
threshold = 0.4
comparison = "inclusive"

[segmenter]
extensions = ["txt"]
"#;
        let config: PensieveConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.filter.threshold, 0.4);
        assert_eq!(config.filter.comparison, Comparison::Inclusive);
        assert_eq!(config.segmenter.extensions, vec!["txt".to_string()]);
        // defaults still apply for unset fields
        assert_eq!(config.segmenter.min_tokens, 25);
        assert_eq!(config.annotation.top_verbs, 5);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = PensieveConfig::default();
        std::env::set_var("PENSIEVE_LOG_LEVEL", "trace");
        std::env::set_var("PENSIEVE_OUTPUT_DIR", "/tmp/pensieve-out");
        std::env::set_var("PENSIEVE_BING_KEY", "secret");

        config.apply_env_overrides();

        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.export.output_dir, "/tmp/pensieve-out");
        assert_eq!(config.images.api_key, "secret");

        std::env::remove_var("PENSIEVE_LOG_LEVEL");
        std::env::remove_var("PENSIEVE_OUTPUT_DIR");
        std::env::remove_var("PENSIEVE_BING_KEY");
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let mut config = PensieveConfig::default();
        config.filter.threshold = -0.1;
        assert!(matches!(
            config.validate(),
            Err(PensieveError::Configuration(_))
        ));
        config.filter.threshold = f64::NAN;
        assert!(config.validate().is_err());
        config.filter.threshold = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_workers_is_rejected() {
        let mut config = PensieveConfig::default();
        config.parallel.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn comparison_conventions() {
        assert!(!Comparison::Strict.passes(0.8, 0.8));
        assert!(Comparison::Inclusive.passes(0.8, 0.8));
        assert!(Comparison::Strict.passes(0.81, 0.8));
    }
}
