//! Hand pose signals from a tracked hand skeleton.
//!
//! Turns the joint transforms of a five-finger hand rig into normalized
//! per-finger signals (length, flexion, pinch, palm line, base rotation)
//! and per-hand aggregates (fist, grasp). Distances are normalized by a
//! subject-specific scale so thresholds carry across hand sizes.
//!
//! The tracking source owns the transforms (`TransformStore`); the rig
//! wiring (`HandModel`) is built once when a hand is bound; computed
//! signals go to a separate `HandMetrics` table.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod skeleton;
pub mod state;
pub mod traversal;
pub mod wiring;

pub use aggregate::{calibrate_hand, evaluate_hand, hand_fist, hand_grasp, hand_ray_direction};
pub use config::PoseConfig;
pub use error::PoseError;
pub use metrics::{FingerMetrics, HandMetrics};
pub use skeleton::{
    BoneKind, BoneModel, FingerKind, FingerModel, Hand, HandModel, JointTransform, MeshId,
    ProxyBody, TransformId, TransformStore, FINGER_COUNT,
};
pub use state::HandPoseState;
pub use traversal::{
    apply_bone_poses, bone_count, driven_hand_bones, finger_transforms, hand_bones,
    hand_transforms,
};
pub use wiring::copy_hand_wiring;
