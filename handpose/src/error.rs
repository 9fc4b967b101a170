//! Errors reported for malformed hand rigs and calibration input.

use thiserror::Error;

use crate::skeleton::{FingerKind, Hand, TransformId};

/// Configuration and rig errors detected before metrics are computed.
///
/// Numeric edge cases (zero-length segments, equal lerp bounds) are not
/// errors; they resolve to defined values inside the metric functions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoseError {
    #[error("transform {0} is not present in the transform store")]
    UnknownTransform(TransformId),

    #[error("{slot} slot holds the {found} finger")]
    FingerSlotMismatch { slot: FingerKind, found: FingerKind },

    #[error("{0} finger has no bones")]
    EmptyFinger(FingerKind),

    #[error("{0} finger base is not part of its bone chain")]
    BaseNotInChain(FingerKind),

    #[error("scale must be finite and positive, got {0}")]
    InvalidScale(f32),

    #[error("invalid pose config: {0}")]
    InvalidConfig(String),

    #[error("{0} hand has no proxy body bound")]
    MissingProxy(Hand),

    #[error("expected {expected} bone poses, got {actual}")]
    PoseCountMismatch { expected: usize, actual: usize },

    #[error("{0} hand has not been calibrated")]
    NotCalibrated(Hand),
}
