//! Hand-level passes: calibration, per-frame evaluation and the fist/grasp aggregates.

use tracing::{debug, info, warn};

use crate::config::{validate_scale, PoseConfig};
use crate::error::PoseError;
use crate::geometry::{normalized, sub};
use crate::metrics::{
    bone_rotation_lerp, finger_flexion, finger_length, finger_pinch, palm_line_lerp, FingerMetrics,
    HandMetrics,
};
use crate::skeleton::{FingerKind, HandModel, TransformStore, FINGER_COUNT};

/// Mean palm line signal over index, middle, ring and pinky.
pub fn hand_fist(metrics: &HandMetrics) -> f32 {
    mean_non_thumb(metrics, |m| m.palm_line)
}

/// Mean base rotation signal over index, middle, ring and pinky.
pub fn hand_grasp(metrics: &HandMetrics) -> f32 {
    mean_non_thumb(metrics, |m| m.base_rotation)
}

fn mean_non_thumb(metrics: &HandMetrics, signal: impl Fn(&FingerMetrics) -> f32) -> f32 {
    let sum: f32 = FingerKind::NON_THUMB
        .iter()
        .map(|k| signal(metrics.finger(*k)))
        .sum();
    sum / FingerKind::NON_THUMB.len() as f32
}

/// Unit direction of the pointing ray, from the proxy body's shoulder to the hand's ray origin.
///
/// Returns the zero vector when the two points coincide.
pub fn hand_ray_direction(hand: &HandModel, store: &TransformStore) -> Result<[f32; 3], PoseError> {
    let proxy = hand.proxy.ok_or(PoseError::MissingProxy(hand.side))?;
    let ray = store.position(hand.ray)?;
    let shoulder = store.position(proxy.shoulder_tip)?;
    Ok(normalized(&sub(&ray, &shoulder)))
}

/// Validate the rig and measure every finger's length.
///
/// On failure `metrics` is left as it was.
pub fn calibrate_hand(
    hand: &HandModel,
    store: &TransformStore,
    scale: f32,
    metrics: &mut HandMetrics,
) -> Result<(), PoseError> {
    if let Err(e) = validate_scale(scale).and_then(|_| hand.validate(store)) {
        warn!("{} hand calibration rejected: {}", hand.side, e);
        return Err(e);
    }

    let mut lengths = [0.0; FINGER_COUNT];
    for kind in FingerKind::ALL {
        lengths[kind.index()] = finger_length(hand.finger(kind), store, scale)?;
    }

    for kind in FingerKind::ALL {
        metrics.finger_mut(kind).length = lengths[kind.index()];
    }
    metrics.calibrated = true;

    info!(
        "{} hand calibrated: thumb={:.3} index={:.3} middle={:.3} ring={:.3} pinky={:.3}",
        hand.side, lengths[0], lengths[1], lengths[2], lengths[3], lengths[4],
    );
    Ok(())
}

/// Compute every finger signal and the hand aggregates for the current frame.
///
/// Non-thumb pinches are computed before the thumb so the thumb's pinch
/// reflects this frame. On failure `metrics` is left as it was.
pub fn evaluate_hand(
    hand: &HandModel,
    store: &TransformStore,
    config: &PoseConfig,
    metrics: &mut HandMetrics,
) -> Result<(), PoseError> {
    config.validate()?;
    if !metrics.calibrated {
        return Err(PoseError::NotCalibrated(hand.side));
    }
    // rewiring after calibration can move fingers out of their slots
    for (slot, finger) in FingerKind::ALL.into_iter().zip(hand.fingers.iter()) {
        if finger.kind != slot {
            return Err(PoseError::FingerSlotMismatch {
                slot,
                found: finger.kind,
            });
        }
    }
    let scale = config.scale;

    let mut next = metrics.clone();

    for kind in FingerKind::ALL {
        let finger = hand.finger(kind);
        let base_bone = finger
            .base_bone()
            .ok_or(PoseError::BaseNotInChain(kind))?;
        let length = next.finger(kind).length;

        let flexion = finger_flexion(finger, store, length, config.min_flex_rel_distance, scale)?;
        let palm_line = palm_line_lerp(
            hand,
            store,
            kind,
            config.palm_line_max_rel_distance,
            config.palm_line_min_rel_distance,
            scale,
        )?;
        let base_rotation =
            bone_rotation_lerp(base_bone, store, config.max_local_rot_z, config.min_local_rot_z)?;

        let m = next.finger_mut(kind);
        m.flexion = flexion;
        m.palm_line = palm_line;
        m.base_rotation = base_rotation;
    }

    for kind in FingerKind::NON_THUMB.into_iter().chain([FingerKind::Thumb]) {
        let pinch = finger_pinch(
            hand,
            store,
            kind,
            &next,
            config.pinch_max_rel_distance,
            config.pinch_min_rel_distance,
            scale,
        )?;
        next.finger_mut(kind).pinch = pinch;
    }

    next.fist = hand_fist(&next);
    next.grasp = hand_grasp(&next);
    debug!(
        "{} hand: fist={:.2} grasp={:.2} pinch={:.2}",
        hand.side,
        next.fist,
        next.grasp,
        next.finger(FingerKind::Thumb).pinch,
    );

    *metrics = next;
    Ok(())
}
