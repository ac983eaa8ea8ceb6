use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::PipelineError;
use crate::pipeline::{
    PipelineConfig, DEFAULT_CUTOFF_HZ, DEFAULT_FADE_SECONDS, DEFAULT_ORDER, DEFAULT_TARGET_PEAK,
};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub fade: FadeConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
}

#[derive(Debug, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_cutoff_hz")]
    pub cutoff_hz: f64,
    #[serde(default = "default_order")]
    pub order: u32,
}

#[derive(Debug, Deserialize)]
pub struct FadeConfig {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: f64,
}

#[derive(Debug, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default = "default_target_peak")]
    pub target_peak: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            cutoff_hz: default_cutoff_hz(),
            order: default_order(),
        }
    }
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            target_peak: default_target_peak(),
        }
    }
}

fn default_cutoff_hz() -> f64 { DEFAULT_CUTOFF_HZ }
fn default_order() -> u32 { DEFAULT_ORDER }
fn default_duration_ms() -> f64 { DEFAULT_FADE_SECONDS * 1000.0 }
fn default_target_peak() -> f64 { DEFAULT_TARGET_PEAK }

impl Config {
    /// Checks ranges and converts to the parameters the pipeline runs with.
    pub fn into_pipeline(self) -> Result<PipelineConfig, PipelineError> {
        let invalid = |msg: String| -> Result<PipelineConfig, PipelineError> {
            Err(PipelineError::InvalidConfig(msg))
        };

        if !(self.filter.cutoff_hz.is_finite() && self.filter.cutoff_hz > 0.0) {
            return invalid(format!("cutoff_hz must be positive, got {}", self.filter.cutoff_hz));
        }
        if !(1..=16).contains(&self.filter.order) {
            return invalid(format!("order must be within 1..=16, got {}", self.filter.order));
        }
        if !(self.fade.duration_ms.is_finite() && self.fade.duration_ms >= 0.0) {
            return invalid(format!("duration_ms must be >= 0, got {}", self.fade.duration_ms));
        }
        let target = self.normalize.target_peak;
        if !(target > 0.0 && target <= 1.0) {
            return invalid(format!("target_peak must be within (0, 1], got {}", target));
        }

        Ok(PipelineConfig {
            cutoff_hz: self.filter.cutoff_hz,
            order: self.filter.order,
            fade_seconds: self.fade.duration_ms / 1000.0,
            target_peak: target,
        })
    }
}

pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config.into_pipeline()?)
}
