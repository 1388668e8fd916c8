//! Tunable pipeline parameters.
//!
//! Every threshold the segmenter, classifier and theme extractor consult lives
//! here so a run can be reproduced from one JSON file. Missing keys fall back to
//! the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pipeline::error::ConfigError;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// How units are re-bucketed when more major groups are detected than allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedistributionPolicy {
    /// Re-bucket all units into `max_major` groups of roughly equal size.
    #[default]
    EvenUnits,
    /// Keep the first `max_major - 1` groups, merge the rest into the last.
    MergeOverflow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Upper bound on major question numbers after normalisation.
    pub max_major: u32,
    /// Lower bound on units per bucket when redistributing.
    pub min_group_size: usize,
    pub redistribution: RedistributionPolicy,
    /// Minimum characters between two accepted major boundaries.
    pub min_marker_distance: usize,
    /// Units shorter than this (trimmed, in chars) are dropped as noise.
    pub min_unit_chars: usize,
    /// Top field score must exceed this, otherwise the field is unknown.
    pub min_confidence_score: f32,
    /// Multiplicity cap for keywords that do not set their own.
    pub default_keyword_cap: u32,
    /// Accepted themes are at least this many chars.
    pub min_theme_chars: usize,
    pub fallback_min_chars: usize,
    pub fallback_max_chars: usize,
    /// Distance (chars) within which a field keyword boosts a fallback span.
    pub fallback_proximity_window: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_major: 5,
            min_group_size: 1,
            redistribution: RedistributionPolicy::EvenUnits,
            min_marker_distance: 100,
            min_unit_chars: 5,
            min_confidence_score: 0.0,
            default_keyword_cap: 1,
            min_theme_chars: 2,
            fallback_min_chars: 2,
            fallback_max_chars: 12,
            fallback_proximity_window: 20,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_major == 0 {
            return Err(ConfigError::parameter("max_major", "must be at least 1"));
        }
        if self.min_group_size == 0 {
            return Err(ConfigError::parameter(
                "min_group_size",
                "must be at least 1",
            ));
        }
        if !self.min_confidence_score.is_finite() || self.min_confidence_score < 0.0 {
            return Err(ConfigError::parameter(
                "min_confidence_score",
                format!("must be finite and non-negative, got {}", self.min_confidence_score),
            ));
        }
        if self.default_keyword_cap == 0 {
            return Err(ConfigError::parameter(
                "default_keyword_cap",
                "must be at least 1",
            ));
        }
        if self.min_theme_chars == 0 {
            return Err(ConfigError::parameter(
                "min_theme_chars",
                "must be at least 1",
            ));
        }
        if self.fallback_min_chars == 0 || self.fallback_min_chars > self.fallback_max_chars {
            return Err(ConfigError::parameter(
                "fallback_min_chars",
                format!(
                    "span bounds {}..={} are inverted or empty",
                    self.fallback_min_chars, self.fallback_max_chars
                ),
            ));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
