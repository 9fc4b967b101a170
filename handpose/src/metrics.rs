//! Per-finger pose signals.
//!
//! Every signal is a unit-interval scalar derived from the current joint
//! positions and a reference length or threshold scaled by the subject's
//! `scale`. Results are written into a `HandMetrics` side table keyed by
//! finger; the skeleton itself is never mutated.

use crate::config::validate_scale;
use crate::error::PoseError;
use crate::geometry::{distance, inverse_lerp, local_euler_z_degrees, nearest_point_on_segment};
use crate::skeleton::{BoneModel, FingerKind, FingerModel, HandModel, TransformStore, FINGER_COUNT};

// ── Side table ─────────────────────────────────────────────

/// Signals computed for one finger.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FingerMetrics {
    /// Calibrated chain length from base to tip, divided by scale.
    pub length: f32,
    /// 0 = straight, 1 = fully curled.
    pub flexion: f32,
    /// 0 = far from the thumb tip, 1 = touching it.
    pub pinch: f32,
    /// 0 = tip away from the palm line, 1 = tip on it.
    pub palm_line: f32,
    /// Base bone rotation signal feeding grasp.
    pub base_rotation: f32,
}

/// Signals for a whole hand, indexed by `FingerKind`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandMetrics {
    pub fingers: [FingerMetrics; FINGER_COUNT],
    /// Mean palm line signal of the non-thumb fingers.
    pub fist: f32,
    /// Mean base rotation signal of the non-thumb fingers.
    pub grasp: f32,
    /// Whether finger lengths have been calibrated.
    pub calibrated: bool,
}

impl HandMetrics {
    pub fn finger(&self, kind: FingerKind) -> &FingerMetrics {
        &self.fingers[kind.index()]
    }

    pub fn finger_mut(&mut self, kind: FingerKind) -> &mut FingerMetrics {
        &mut self.fingers[kind.index()]
    }

    /// Forget calibration and all signals.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate s-expression for IPC status.
    pub fn status_sexp(&self) -> String {
        let fingers: Vec<String> = FingerKind::ALL
            .iter()
            .map(|kind| {
                let m = self.finger(*kind);
                format!(
                    "(:finger {} :length {:.3} :flexion {:.2} :pinch {:.2} :palm-line {:.2} :base-rotation {:.2})",
                    kind.as_str(),
                    m.length,
                    m.flexion,
                    m.pinch,
                    m.palm_line,
                    m.base_rotation,
                )
            })
            .collect();
        format!(
            "(:calibrated {} :fist {:.2} :grasp {:.2} :fingers ({}))",
            if self.calibrated { "t" } else { "nil" },
            self.fist,
            self.grasp,
            fingers.join(" "),
        )
    }
}

// ── Length calibration ─────────────────────────────────────

/// Chain length of a finger from its base to its tip, divided by `scale`.
///
/// Bones before the base (palm-attached knuckle stubs) are skipped. The
/// last bone is measured to the tip reference. A base that is not one of
/// the chain's bones is reported rather than measured as zero.
pub fn finger_length(
    finger: &FingerModel,
    store: &TransformStore,
    scale: f32,
) -> Result<f32, PoseError> {
    validate_scale(scale)?;
    let start = finger
        .bones
        .iter()
        .position(|b| b.transform == finger.base)
        .ok_or(PoseError::BaseNotInChain(finger.kind))?;

    let chain = &finger.bones[start..];
    let mut length = 0.0;
    for (i, bone) in chain.iter().enumerate() {
        let from = store.position(bone.transform)?;
        let to = match chain.get(i + 1) {
            Some(next) => store.position(next.transform)?,
            None => store.position(finger.tip)?,
        };
        length += distance(&from, &to);
    }

    Ok(length / scale)
}

// ── Signals ────────────────────────────────────────────────

/// Degree of curl from the straight-line base-to-tip distance.
///
/// 0 when the distance equals the calibrated `length * scale`, rising to
/// 1 as it shrinks to `min_flex_rel_distance * scale`.
pub fn finger_flexion(
    finger: &FingerModel,
    store: &TransformStore,
    length: f32,
    min_flex_rel_distance: f32,
    scale: f32,
) -> Result<f32, PoseError> {
    let d = distance(&store.position(finger.base)?, &store.position(finger.tip)?);
    Ok(1.0 - inverse_lerp(min_flex_rel_distance * scale, length * scale, d))
}

/// Closeness of a fingertip to the thumb tip.
///
/// The thumb has no pinch of its own: it reports the strongest pinch of
/// the other four fingers as already stored in `metrics`, so those must
/// be computed first.
pub fn finger_pinch(
    hand: &HandModel,
    store: &TransformStore,
    kind: FingerKind,
    metrics: &HandMetrics,
    max_rel_distance: f32,
    min_rel_distance: f32,
    scale: f32,
) -> Result<f32, PoseError> {
    if kind.is_thumb() {
        return Ok(FingerKind::NON_THUMB
            .iter()
            .map(|k| metrics.finger(*k).pinch)
            .fold(0.0, f32::max));
    }

    let tip = store.position(hand.finger(kind).tip)?;
    let thumb_tip = store.position(hand.thumb().tip)?;
    let d = distance(&tip, &thumb_tip);
    Ok(1.0 - inverse_lerp(min_rel_distance * scale, max_rel_distance * scale, d))
}

/// Closeness of a fingertip to the palm line (palm exterior to palm interior).
pub fn palm_line_lerp(
    hand: &HandModel,
    store: &TransformStore,
    kind: FingerKind,
    max_rel_distance: f32,
    min_rel_distance: f32,
    scale: f32,
) -> Result<f32, PoseError> {
    let tip = store.position(hand.finger(kind).tip)?;
    let nearest = nearest_point_on_segment(
        &store.position(hand.palm_exterior)?,
        &store.position(hand.palm_interior)?,
        &tip,
    );
    let d = distance(&nearest, &tip);
    Ok(1.0 - inverse_lerp(min_rel_distance * scale, max_rel_distance * scale, d))
}

/// Map a local Z rotation in degrees to a unit signal.
///
/// Inside `[min_local_rot_z, max_local_rot_z]` the signal falls from 1 at
/// the lower bound to 0 at the upper bound. Outside the band the circle is
/// split at 180 degrees: negative angles and angles in `[0, 180)` give 0,
/// anything from 180 up gives 1 (wrapped round past the lower bound).
/// A non-finite angle gives 0.
pub fn rotation_lerp(local_rot_z: f32, max_local_rot_z: f32, min_local_rot_z: f32) -> f32 {
    if !local_rot_z.is_finite() {
        0.0
    } else if local_rot_z >= min_local_rot_z && local_rot_z <= max_local_rot_z {
        inverse_lerp(max_local_rot_z, min_local_rot_z, local_rot_z)
    } else if local_rot_z < 180.0 {
        0.0
    } else {
        1.0
    }
}

/// `rotation_lerp` of a bone's current local Z rotation.
pub fn bone_rotation_lerp(
    bone: &BoneModel,
    store: &TransformStore,
    max_local_rot_z: f32,
    min_local_rot_z: f32,
) -> Result<f32, PoseError> {
    let q = store.get(bone.transform)?.local_rotation;
    Ok(rotation_lerp(
        local_euler_z_degrees(&q),
        max_local_rot_z,
        min_local_rot_z,
    ))
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::z_rotation;
    use crate::skeleton::{test_rig, Hand, JointTransform, TEST_FINGER_SPACING};

    const EPS: f32 = 1e-4;

    #[test]
    fn test_finger_length_skips_knuckle_stub() {
        let (store, hand) = test_rig(Hand::Left);
        // base at y=0.06, joints at 0.09 and 0.11, tip at 0.13
        let len = finger_length(hand.index(), &store, 1.0).unwrap();
        assert!((len - 0.07).abs() < EPS, "got {}", len);
    }

    #[test]
    fn test_finger_length_divides_by_scale() {
        let (store, hand) = test_rig(Hand::Left);
        let len = finger_length(hand.middle(), &store, 0.5).unwrap();
        assert!((len - 0.14).abs() < EPS, "got {}", len);
    }

    #[test]
    fn test_finger_length_from_first_bone() {
        let (store, mut hand) = test_rig(Hand::Left);
        let first = hand.fingers[1].bones[0].transform;
        hand.fingers[1].base = first;
        // 0.02 -> 0.13 along a straight line
        let len = finger_length(hand.index(), &store, 1.0).unwrap();
        assert!((len - 0.11).abs() < EPS, "got {}", len);
    }

    #[test]
    fn test_finger_length_missing_base() {
        let (store, mut hand) = test_rig(Hand::Left);
        hand.fingers[2].base = hand.palm_center;
        assert_eq!(
            finger_length(hand.middle(), &store, 1.0),
            Err(PoseError::BaseNotInChain(FingerKind::Middle))
        );
    }

    #[test]
    fn test_finger_length_bad_scale() {
        let (store, hand) = test_rig(Hand::Left);
        assert_eq!(
            finger_length(hand.index(), &store, 0.0),
            Err(PoseError::InvalidScale(0.0))
        );
    }

    #[test]
    fn test_flexion_straight_finger_is_zero() {
        let (store, hand) = test_rig(Hand::Left);
        let len = finger_length(hand.index(), &store, 1.0).unwrap();
        let flex = finger_flexion(hand.index(), &store, len, 0.02, 1.0).unwrap();
        assert!(flex.abs() < EPS, "got {}", flex);
    }

    #[test]
    fn test_flexion_curled_finger() {
        let (mut store, hand) = test_rig(Hand::Left);
        let len = finger_length(hand.index(), &store, 1.0).unwrap();

        // Pull the tip back so base-to-tip is 0.045: halfway between 0.02 and 0.07
        let tip = hand.index().tip;
        let base = store.position(hand.index().base).unwrap();
        store
            .set(tip, JointTransform::at(base[0], base[1] + 0.045, 0.0))
            .unwrap();
        let flex = finger_flexion(hand.index(), &store, len, 0.02, 1.0).unwrap();
        assert!((flex - 0.5).abs() < EPS, "got {}", flex);

        // At or below the minimum distance flexion saturates
        store
            .set(tip, JointTransform::at(base[0], base[1] + 0.01, 0.0))
            .unwrap();
        let flex = finger_flexion(hand.index(), &store, len, 0.02, 1.0).unwrap();
        assert!((flex - 1.0).abs() < EPS, "got {}", flex);
    }

    #[test]
    fn test_flexion_respects_scale() {
        let (store, hand) = test_rig(Hand::Left);
        let scale = 2.0;
        let len = finger_length(hand.ring(), &store, scale).unwrap();
        let flex = finger_flexion(hand.ring(), &store, len, 0.01, scale).unwrap();
        assert!(flex.abs() < EPS, "got {}", flex);
    }

    #[test]
    fn test_pinch_by_tip_distance() {
        let (mut store, hand) = test_rig(Hand::Left);
        let metrics = HandMetrics::default();

        // Index tip sits TEST_FINGER_SPACING (0.02) from the thumb tip
        let pinch =
            finger_pinch(&hand, &store, FingerKind::Index, &metrics, 0.05, 0.01, 1.0).unwrap();
        let expected = 1.0 - (TEST_FINGER_SPACING - 0.01) / (0.05 - 0.01);
        assert!((pinch - expected).abs() < EPS, "got {}", pinch);

        // Pinky is 0.08 away: beyond max, no pinch
        let pinch =
            finger_pinch(&hand, &store, FingerKind::Pinky, &metrics, 0.05, 0.01, 1.0).unwrap();
        assert!(pinch.abs() < EPS, "got {}", pinch);

        // Touching tips
        let thumb_tip = store.position(hand.thumb().tip).unwrap();
        store
            .set(hand.middle().tip, JointTransform::at(thumb_tip[0], thumb_tip[1], thumb_tip[2]))
            .unwrap();
        let pinch =
            finger_pinch(&hand, &store, FingerKind::Middle, &metrics, 0.05, 0.01, 1.0).unwrap();
        assert!((pinch - 1.0).abs() < EPS, "got {}", pinch);
    }

    #[test]
    fn test_thumb_pinch_is_max_of_others() {
        let (store, hand) = test_rig(Hand::Right);
        let mut metrics = HandMetrics::default();
        metrics.finger_mut(FingerKind::Index).pinch = 0.2;
        metrics.finger_mut(FingerKind::Middle).pinch = 0.9;
        metrics.finger_mut(FingerKind::Ring).pinch = 0.4;
        metrics.finger_mut(FingerKind::Pinky).pinch = 0.0;
        // stale thumb value must not leak into the max
        metrics.finger_mut(FingerKind::Thumb).pinch = 1.0;

        let pinch =
            finger_pinch(&hand, &store, FingerKind::Thumb, &metrics, 0.05, 0.01, 1.0).unwrap();
        assert!((pinch - 0.9).abs() < EPS, "got {}", pinch);
    }

    #[test]
    fn test_palm_line_far_and_near() {
        let (mut store, hand) = test_rig(Hand::Left);
        // Extended tips are ~0.1 from the palm line: no signal
        let lerp = palm_line_lerp(&hand, &store, FingerKind::Ring, 0.08, 0.02, 1.0).unwrap();
        assert!(lerp.abs() < EPS, "got {}", lerp);

        // Tip resting on the palm line
        store
            .set(hand.ring().tip, JointTransform::at(0.06, 0.03, 0.03))
            .unwrap();
        let lerp = palm_line_lerp(&hand, &store, FingerKind::Ring, 0.08, 0.02, 1.0).unwrap();
        assert!((lerp - 1.0).abs() < EPS, "got {}", lerp);

        // 0.05 off the line: halfway between 0.02 and 0.08
        store
            .set(hand.ring().tip, JointTransform::at(0.06, 0.03, 0.08))
            .unwrap();
        let lerp = palm_line_lerp(&hand, &store, FingerKind::Ring, 0.08, 0.02, 1.0).unwrap();
        assert!((lerp - 0.5).abs() < EPS, "got {}", lerp);
    }

    #[test]
    fn test_palm_line_degenerate_segment() {
        let (mut store, hand) = test_rig(Hand::Left);
        let exterior = store.position(hand.palm_exterior).unwrap();
        store
            .set(hand.palm_interior, JointTransform::at(exterior[0], exterior[1], exterior[2]))
            .unwrap();
        store
            .set(hand.index().tip, JointTransform::at(exterior[0], exterior[1], exterior[2] + 0.05))
            .unwrap();
        let lerp = palm_line_lerp(&hand, &store, FingerKind::Index, 0.08, 0.02, 1.0).unwrap();
        assert!(lerp.is_finite());
        assert!((lerp - 0.5).abs() < EPS, "got {}", lerp);
    }

    #[test]
    fn test_rotation_lerp_branches() {
        assert!((rotation_lerp(15.0, 30.0, 0.0) - 0.5).abs() < EPS);
        assert!((rotation_lerp(0.0, 30.0, 0.0) - 1.0).abs() < EPS);
        assert!(rotation_lerp(30.0, 30.0, 0.0).abs() < EPS);
        assert_eq!(rotation_lerp(45.0, 30.0, 0.0), 0.0);
        assert_eq!(rotation_lerp(179.9, 30.0, 0.0), 0.0);
        assert_eq!(rotation_lerp(200.0, 30.0, 0.0), 1.0);
        assert_eq!(rotation_lerp(359.0, 30.0, 0.0), 1.0);
        assert_eq!(rotation_lerp(-5.0, 30.0, 0.0), 0.0);
    }

    #[test]
    fn test_rotation_lerp_non_finite() {
        assert_eq!(rotation_lerp(f32::NAN, 30.0, 0.0), 0.0);
        assert_eq!(rotation_lerp(f32::INFINITY, 30.0, 0.0), 0.0);
        assert_eq!(rotation_lerp(f32::NEG_INFINITY, 30.0, 0.0), 0.0);
    }

    #[test]
    fn test_rotation_lerp_band_above_zero() {
        // below the band but under 180 counts as unrotated
        assert_eq!(rotation_lerp(5.0, 60.0, 20.0), 0.0);
        assert!((rotation_lerp(40.0, 60.0, 20.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_bone_rotation_lerp_reads_local_rotation() {
        let (mut store, hand) = test_rig(Hand::Left);
        let bone = hand.index().base_bone().unwrap().clone();
        let pos = store.position(bone.transform).unwrap();

        store
            .set(
                bone.transform,
                JointTransform {
                    position: pos,
                    local_rotation: z_rotation(15.0),
                },
            )
            .unwrap();
        let lerp = bone_rotation_lerp(&bone, &store, 30.0, 0.0).unwrap();
        assert!((lerp - 0.5).abs() < 1e-3, "got {}", lerp);

        store
            .set(
                bone.transform,
                JointTransform {
                    position: pos,
                    local_rotation: z_rotation(-20.0),
                },
            )
            .unwrap();
        let lerp = bone_rotation_lerp(&bone, &store, 30.0, 0.0).unwrap();
        assert_eq!(lerp, 1.0);
    }

    #[test]
    fn test_metrics_sexp() {
        let mut metrics = HandMetrics::default();
        metrics.calibrated = true;
        metrics.fist = 0.5;
        metrics.finger_mut(FingerKind::Index).length = 0.07;
        let sexp = metrics.status_sexp();
        assert!(sexp.starts_with("(:calibrated t :fist 0.50 :grasp 0.00"));
        assert!(sexp.contains("(:finger index :length 0.070"));
        assert!(sexp.contains("(:finger pinky"));
    }

    #[test]
    fn test_metrics_reset() {
        let mut metrics = HandMetrics::default();
        metrics.calibrated = true;
        metrics.finger_mut(FingerKind::Ring).flexion = 0.3;
        metrics.reset();
        assert_eq!(metrics, HandMetrics::default());
    }
}
