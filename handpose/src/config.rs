//! Calibration constants for pose signal extraction.
//!
//! Distances are relative: each is multiplied by `scale` before being
//! compared against world-space distances, so the same config works for
//! small and large hands.

use serde::{Deserialize, Serialize};

use crate::error::PoseError;

/// Thresholds and normalization for the per-finger and per-hand signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Enable signal extraction. When disabled, updates are ignored.
    pub enabled: bool,
    /// Subject-specific normalization factor (e.g. hand span).
    pub scale: f32,
    /// Base-to-tip relative distance at which flexion reaches 1.
    pub min_flex_rel_distance: f32,
    /// Tip-to-thumb-tip relative distance at or beyond which pinch is 0.
    pub pinch_max_rel_distance: f32,
    /// Tip-to-thumb-tip relative distance at or below which pinch is 1.
    pub pinch_min_rel_distance: f32,
    /// Tip-to-palm-line relative distance at or beyond which the palm line signal is 0.
    pub palm_line_max_rel_distance: f32,
    /// Tip-to-palm-line relative distance at or below which the palm line signal is 1.
    pub palm_line_min_rel_distance: f32,
    /// Upper bound (degrees) of the base bone's local Z rotation band.
    pub max_local_rot_z: f32,
    /// Lower bound (degrees) of the base bone's local Z rotation band.
    pub min_local_rot_z: f32,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: 1.0,
            min_flex_rel_distance: 0.02,
            pinch_max_rel_distance: 0.05,
            pinch_min_rel_distance: 0.01,
            palm_line_max_rel_distance: 0.08,
            palm_line_min_rel_distance: 0.02,
            max_local_rot_z: 90.0,
            min_local_rot_z: 0.0,
        }
    }
}

impl PoseConfig {
    /// Reject constants that would turn every signal into NaN or a constant.
    pub fn validate(&self) -> Result<(), PoseError> {
        validate_scale(self.scale)?;
        let constants = [
            ("min-flex-rel-distance", self.min_flex_rel_distance),
            ("pinch-max-rel-distance", self.pinch_max_rel_distance),
            ("pinch-min-rel-distance", self.pinch_min_rel_distance),
            ("palm-line-max-rel-distance", self.palm_line_max_rel_distance),
            ("palm-line-min-rel-distance", self.palm_line_min_rel_distance),
            ("max-local-rot-z", self.max_local_rot_z),
            ("min-local-rot-z", self.min_local_rot_z),
        ];
        for (name, value) in constants {
            if !value.is_finite() {
                return Err(PoseError::InvalidConfig(format!("{name} is not finite")));
            }
        }
        if self.min_local_rot_z > self.max_local_rot_z {
            return Err(PoseError::InvalidConfig(format!(
                "min-local-rot-z {} exceeds max-local-rot-z {}",
                self.min_local_rot_z, self.max_local_rot_z
            )));
        }
        Ok(())
    }

    /// Generate s-expression for IPC config queries.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:enabled {} :scale {:.3} :min-flex-rel-distance {:.3} :pinch-max-rel-distance {:.3} :pinch-min-rel-distance {:.3} :palm-line-max-rel-distance {:.3} :palm-line-min-rel-distance {:.3} :max-local-rot-z {:.1} :min-local-rot-z {:.1})",
            if self.enabled { "t" } else { "nil" },
            self.scale,
            self.min_flex_rel_distance,
            self.pinch_max_rel_distance,
            self.pinch_min_rel_distance,
            self.palm_line_max_rel_distance,
            self.palm_line_min_rel_distance,
            self.max_local_rot_z,
            self.min_local_rot_z,
        )
    }
}

/// Scale divides every calibrated length, so it must be finite and positive.
pub fn validate_scale(scale: f32) -> Result<(), PoseError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(PoseError::InvalidScale(scale))
    }
}
