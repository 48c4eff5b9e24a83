//! Engine configuration
//!
//! All retrieval constants live here so deployments can tune them from a TOML
//! file. The defaults are the calibrated values the corpus was authored
//! against; changing them shifts every confidence the engine reports.

use crate::error::{IntentError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the intent engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum Jaccard similarity for a match to be accepted
    pub similarity_threshold: f32,

    /// Upper bound on any reported confidence
    pub confidence_cap: f32,

    /// Share of the example prior kept for a match sitting exactly on the threshold
    pub base_weight: f32,

    /// Tokens in more than this fraction of the corpus are pruned at build time
    pub stopword_ratio: f32,

    /// Candidates scored by exact similarity per query
    pub max_candidates: usize,

    /// Shortest word (in chars) that counts as a token
    pub min_token_len: usize,

    /// Default `n` for top-match diagnostics
    pub default_top_n: usize,

    /// Confidence multiplier applied to examples expanded from variants
    pub variant_confidence_factor: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.6,
            confidence_cap: 0.95,
            base_weight: 0.7,
            stopword_ratio: 0.3,
            max_candidates: 100,
            min_token_len: 3,
            default_top_n: 3,
            variant_confidence_factor: 0.9,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Reject values that would break calibration or retrieval
    pub fn validate(&self) -> Result<()> {
        fn invalid(reason: String) -> Result<()> {
            Err(IntentError::InvalidConfig { reason })
        }

        if !(self.similarity_threshold > 0.0 && self.similarity_threshold < 1.0) {
            return invalid(format!(
                "similarity_threshold must be in (0, 1), got {}",
                self.similarity_threshold
            ));
        }
        if !(self.confidence_cap > 0.0 && self.confidence_cap <= 1.0) {
            return invalid(format!(
                "confidence_cap must be in (0, 1], got {}",
                self.confidence_cap
            ));
        }
        if !(0.0..=1.0).contains(&self.base_weight) {
            return invalid(format!("base_weight must be in [0, 1], got {}", self.base_weight));
        }
        if !(self.stopword_ratio > 0.0 && self.stopword_ratio <= 1.0) {
            return invalid(format!(
                "stopword_ratio must be in (0, 1], got {}",
                self.stopword_ratio
            ));
        }
        if self.max_candidates == 0 {
            return invalid("max_candidates must be at least 1".to_string());
        }
        if !(self.variant_confidence_factor > 0.0 && self.variant_confidence_factor <= 1.0) {
            return invalid(format!(
                "variant_confidence_factor must be in (0, 1], got {}",
                self.variant_confidence_factor
            ));
        }

        Ok(())
    }
}

/// Builder for EngineConfig
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    pub fn confidence_cap(mut self, cap: f32) -> Self {
        self.config.confidence_cap = cap;
        self
    }

    pub fn stopword_ratio(mut self, ratio: f32) -> Self {
        self.config.stopword_ratio = ratio;
        self
    }

    pub fn max_candidates(mut self, max: usize) -> Self {
        self.config.max_candidates = max;
        self
    }

    pub fn min_token_len(mut self, len: usize) -> Self {
        self.config.min_token_len = len;
        self
    }

    pub fn default_top_n(mut self, n: usize) -> Self {
        self.config.default_top_n = n;
        self
    }

    /// Validate and return the config
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.similarity_threshold, 0.6);
        assert_eq!(config.max_candidates, 100);
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfigBuilder::new()
            .similarity_threshold(0.5)
            .max_candidates(20)
            .default_top_n(5)
            .build()
            .unwrap();

        assert_eq!(config.similarity_threshold, 0.5);
        assert_eq!(config.max_candidates, 20);
        assert_eq!(config.default_top_n, 5);
        assert_eq!(config.confidence_cap, 0.95);
    }

    #[test]
    fn test_builder_rejects_threshold_of_one() {
        let err = EngineConfigBuilder::new().similarity_threshold(1.0).build();
        assert!(matches!(err, Err(IntentError::InvalidConfig { .. })));
    }

    #[test]
    fn test_rejects_zero_candidates() {
        let config = EngineConfig {
            max_candidates: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("similarity_threshold = 0.7\n").unwrap();

        assert_eq!(config.similarity_threshold, 0.7);
        assert_eq!(config.stopword_ratio, 0.3);
        assert_eq!(config.min_token_len, 3);
    }

    #[test]
    fn test_invalid_toml_value_is_rejected() {
        let err = EngineConfig::from_toml_str("confidence_cap = 1.5\n");
        assert!(matches!(err, Err(IntentError::InvalidConfig { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_candidates = 50").unwrap();
        writeln!(file, "default_top_n = 10").unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.max_candidates, 50);
        assert_eq!(config.default_top_n, 10);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/farm-intent.toml");
        assert!(matches!(err, Err(IntentError::Io(_))));
    }
}
