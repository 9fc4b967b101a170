//! Rebinding one hand model's rig references from another.

use tracing::debug;

use crate::skeleton::HandModel;

/// Overwrite every rig reference of `to` with the one from `from`.
///
/// Copies the fingers, wrist, forearm, palm/pinch/throat/ray reference
/// points and the skinned mesh. The hand side and proxy body stay with
/// `to`, and calibrated lengths and signals live in `HandMetrics`, so
/// they are untouched.
pub fn copy_hand_wiring(from: &HandModel, to: &mut HandModel) {
    to.fingers = from.fingers.clone();
    to.wrist = from.wrist.clone();
    to.forearm = from.forearm.clone();

    to.pinch_center = from.pinch_center;
    to.throat_center = from.throat_center;
    to.palm_center = from.palm_center;
    to.palm_exterior = from.palm_exterior;
    to.palm_interior = from.palm_interior;
    to.ray = from.ray;

    to.skinned_mesh = from.skinned_mesh;

    debug!("{} hand rewired from {} hand rig", to.side, from.side);
}
