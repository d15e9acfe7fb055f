//! Visualization configuration.
//!
//! Timing is fixed (see [`crate::timing`]); only the tuning knobs that have no
//! single right value live here.

use serde::{Deserialize, Serialize};

use crate::model::Stage;
use crate::{Error, Result};

/// Tunable parameters. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Hover bursts reach every node within `tolerance ×` the closest distance.
    pub nearest_ring_tolerance: f64,
    /// Extra draws allowed when the random target lands on the source.
    pub target_retry_limit: u32,
    /// Fixed RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Offset added to every coordinate for screen space (600×600 canvas).
    pub canvas_center: f64,
    /// Stage shown before any selection is made.
    pub initial_stage: Stage,
    /// Driver tick period.
    pub frame_interval_ms: u64,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            nearest_ring_tolerance: 1.12,
            target_retry_limit: 10,
            seed: None,
            canvas_center: 300.0,
            initial_stage: Stage::Cluster,
            frame_interval_ms: 16,
        }
    }
}

impl VisualConfig {
    /// Parse from JSON and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_initial_stage(mut self, stage: Stage) -> Self {
        self.initial_stage = stage;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.nearest_ring_tolerance.is_finite() || self.nearest_ring_tolerance < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "nearest_ring_tolerance must be a finite value >= 1.0, got {}",
                self.nearest_ring_tolerance
            )));
        }
        if !self.canvas_center.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "canvas_center must be finite, got {}",
                self.canvas_center
            )));
        }
        if self.frame_interval_ms == 0 {
            return Err(Error::InvalidConfig("frame_interval_ms must be > 0".into()));
        }
        Ok(())
    }
}
