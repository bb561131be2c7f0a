//! Render settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Render configuration.
///
/// Missing fields take their default when deserialized, so a JSON file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of ray segments traced per sample
    pub max_bounces: u32,
    /// Worker thread count
    pub threads: usize,
    /// Base RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// How often progress is logged
    pub progress_interval_ms: u64,
    /// Apply gamma 2 before byte conversion
    pub gamma_correct: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
            samples_per_pixel: 100,
            max_bounces: 50,
            threads: default_threads(),
            seed: None,
            progress_interval_ms: 1000,
            gamma_correct: false,
        }
    }
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl RenderConfig {
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_quality(mut self, samples_per_pixel: u32, max_bounces: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_bounces = max_bounces;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_gamma(mut self, gamma_correct: bool) -> Self {
        self.gamma_correct = gamma_correct;
        self
    }

    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        let checks = [
            (self.width == 0, "width must be at least 1"),
            (self.height == 0, "height must be at least 1"),
            (self.samples_per_pixel == 0, "samples_per_pixel must be at least 1"),
            (self.threads == 0, "threads must be at least 1"),
            (self.progress_interval_ms == 0, "progress_interval_ms must be at least 1"),
        ];
        match checks.iter().find(|(failed, _)| *failed) {
            Some((_, reason)) => Err(RenderError::InvalidConfig(reason.to_string())),
            None => Ok(()),
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> RenderResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::debug!("Loaded render config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.threads >= 1);
        assert!(!config.gamma_correct);
    }

    #[test]
    fn test_zero_sizes_rejected() {
        for config in [
            RenderConfig::default().with_resolution(0, 10),
            RenderConfig::default().with_resolution(10, 0),
            RenderConfig::default().with_quality(0, 5),
            RenderConfig::default().with_threads(0),
        ] {
            assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_from_json_partial() {
        let config = RenderConfig::from_json(r#"{ "width": 64, "height": 32, "seed": 7 }"#).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 32);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.samples_per_pixel, RenderConfig::default().samples_per_pixel);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            RenderConfig::from_json(r#"{ "threads": 0 }"#),
            Err(RenderError::InvalidConfig(_))
        ));
        assert!(matches!(
            RenderConfig::from_json("{ not json"),
            Err(RenderError::Json(_))
        ));
    }
}
