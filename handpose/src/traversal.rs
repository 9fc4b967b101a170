//! Deterministic traversal of a hand rig.
//!
//! The bone order is wrist, forearm, then every finger's bones thumb to
//! pinky, each finger wrist-proximal to tip. Device SDKs that expose a
//! flat joint buffer use this same layout, so callers pre-size buffers
//! with `bone_count` and map them positionally onto `hand_bones`.

use tracing::debug;

use crate::error::PoseError;
use crate::skeleton::{
    BoneModel, FingerModel, HandModel, JointTransform, TransformId, TransformStore,
};

/// All bones of the hand in canonical order.
pub fn hand_bones(hand: &HandModel) -> Vec<&BoneModel> {
    let mut bones = Vec::with_capacity(bone_count(hand));
    bones.push(&hand.wrist);
    bones.push(&hand.forearm);
    for finger in &hand.fingers {
        bones.extend(finger.bones.iter());
    }
    bones
}

/// The procedurally driven subset of `hand_bones`, order preserved.
pub fn driven_hand_bones(hand: &HandModel) -> Vec<&BoneModel> {
    hand_bones(hand)
        .into_iter()
        .filter(|b| b.is_driven())
        .collect()
}

/// Every bone transform in `hand_bones` order, followed by the five
/// fingertip transforms thumb to pinky.
pub fn hand_transforms(hand: &HandModel) -> Vec<TransformId> {
    let mut transforms: Vec<TransformId> = hand_bones(hand).iter().map(|b| b.transform).collect();
    transforms.extend(hand.fingers.iter().map(|f| f.tip));
    transforms
}

/// One transform per bone of a single finger.
pub fn finger_transforms(finger: &FingerModel) -> Vec<TransformId> {
    finger.bones.iter().map(|b| b.transform).collect()
}

/// Number of entries `hand_bones` yields: wrist and forearm plus every finger bone.
pub fn bone_count(hand: &HandModel) -> usize {
    2 + hand.fingers.iter().map(|f| f.bones.len()).sum::<usize>()
}

/// Write a device-ordered pose buffer into the store.
///
/// `poses` must hold exactly `bone_count(hand)` entries laid out like
/// `hand_bones`. On any mismatch the store is left untouched.
pub fn apply_bone_poses(
    hand: &HandModel,
    store: &mut TransformStore,
    poses: &[JointTransform],
) -> Result<(), PoseError> {
    let bones = hand_bones(hand);
    if poses.len() != bones.len() {
        debug!(
            "{} hand: expected {} bone poses, got {}",
            hand.side,
            bones.len(),
            poses.len(),
        );
        return Err(PoseError::PoseCountMismatch {
            expected: bones.len(),
            actual: poses.len(),
        });
    }

    if let Some(missing) = bones.iter().find(|b| !store.contains(b.transform)) {
        return Err(PoseError::UnknownTransform(missing.transform));
    }

    for (bone, pose) in bones.iter().zip(poses) {
        store.set(bone.transform, *pose)?;
    }
    Ok(())
}
