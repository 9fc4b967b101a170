//! Per-session pose signal state for both hands.
//!
//! Holds the calibration constants and one metrics table per hand. Each
//! hand's table is written only by that hand's calibration and update
//! calls, so left and right can be evaluated independently.

use tracing::debug;

use crate::aggregate::{calibrate_hand, evaluate_hand};
use crate::config::PoseConfig;
use crate::error::PoseError;
use crate::metrics::HandMetrics;
use crate::skeleton::{Hand, HandModel, TransformStore};

/// Central pose signal state.
#[derive(Debug, Clone, Default)]
pub struct HandPoseState {
    /// Configuration.
    pub config: PoseConfig,
    left: HandMetrics,
    right: HandMetrics,
}

impl HandPoseState {
    /// Create a new state with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PoseConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Signals for a given hand.
    pub fn metrics(&self, hand: Hand) -> &HandMetrics {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    fn metrics_mut(&mut self, hand: Hand) -> &mut HandMetrics {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    /// Validate the rig and record every finger's length at the configured scale.
    pub fn calibrate(&mut self, hand: &HandModel, store: &TransformStore) -> Result<(), PoseError> {
        self.config.validate()?;
        let scale = self.config.scale;
        calibrate_hand(hand, store, scale, self.metrics_mut(hand.side))
    }

    /// Recompute all signals for one hand from the current transforms.
    ///
    /// Does nothing while disabled.
    pub fn update(&mut self, hand: &HandModel, store: &TransformStore) -> Result<(), PoseError> {
        if !self.config.enabled {
            debug!("pose signals disabled, skipping {} hand", hand.side);
            return Ok(());
        }
        let metrics = match hand.side {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        };
        evaluate_hand(hand, store, &self.config, metrics)
    }

    /// Whether a hand has calibrated finger lengths.
    pub fn is_calibrated(&self, hand: Hand) -> bool {
        self.metrics(hand).calibrated
    }

    /// Drop calibration and signals for one hand.
    pub fn reset_hand(&mut self, hand: Hand) {
        self.metrics_mut(hand).reset();
    }

    /// Drop calibration and signals for both hands.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }

    /// Generate s-expression for IPC status.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:enabled {} :scale {:.3} :left {} :right {})",
            if self.config.enabled { "t" } else { "nil" },
            self.config.scale,
            self.left.status_sexp(),
            self.right.status_sexp(),
        )
    }
}
