//! # Compression Settings Module
//!
//! Settings for a compression run, with validation and JSON persistence.
//!
//! ## Parameters:
//! - `quality`: Output quality as a fraction (0.0 < q <= 1.0, default: 0.7)
//! - `max_width` / `max_height`: Dimension bounds in pixels (default: 1920).
//!   Only the larger of the two bounds the longest output edge; a value of 0
//!   leaves the output size unconstrained.
//!
//! ## Validation:
//! - quality must be in (0.0, 1.0]
//! - non-zero dimension bounds must be within 320-8000
//!
//! Settings are read once at the start of a batch run and that snapshot is used
//! for every file in the run; mutating settings never triggers reprocessing on
//! its own.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Smallest dimension bound accepted from user input.
pub const MIN_DIMENSION: u32 = 320;
/// Largest dimension bound accepted from user input.
pub const MAX_DIMENSION: u32 = 8000;

/// Settings applied to every file of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionSettings {
    /// Output quality as a fraction (0.0 < q <= 1.0)
    pub quality: f64,
    /// Maximum output width in pixels (0 = unconstrained)
    pub max_width: u32,
    /// Maximum output height in pixels (0 = unconstrained)
    pub max_height: u32,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            quality: 0.7,
            max_width: 1920,
            max_height: 1920,
        }
    }
}

impl CompressionSettings {
    /// Validate settings parameters.
    pub fn validate(&self) -> Result<()> {
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(anyhow::anyhow!("Quality must be between 0.0 and 1.0"));
        }

        for (label, value) in [("max-width", self.max_width), ("max-height", self.max_height)] {
            if value != 0 && !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
                return Err(anyhow::anyhow!(
                    "{} must be between {} and {} pixels (or 0 for unconstrained)",
                    label,
                    MIN_DIMENSION,
                    MAX_DIMENSION
                ));
            }
        }

        Ok(())
    }

    /// Clamp raw user input into the accepted ranges.
    pub fn clamped(quality: f64, max_width: u32, max_height: u32) -> Self {
        Self {
            quality: quality.clamp(0.01, 1.0),
            max_width: max_width.clamp(MIN_DIMENSION, MAX_DIMENSION),
            max_height: max_height.clamp(MIN_DIMENSION, MAX_DIMENSION),
        }
    }

    /// The single bound applied to the longest output edge, if any.
    ///
    /// Only the larger of the two dimension bounds matters; width and height
    /// are never capped independently so aspect ratio is always preserved.
    pub fn target_longest_edge(&self) -> Option<u32> {
        let edge = self.max_width.max(self.max_height);
        (edge > 0).then_some(edge)
    }

    /// Load settings from a JSON file, falling back to defaults if absent.
    pub async fn from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let settings: CompressionSettings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a JSON file.
    pub async fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
