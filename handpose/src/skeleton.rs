//! Hand skeleton model: bones, fingers and hands over a shared transform store.
//!
//! The tracking source owns and updates the transforms; everything in this
//! module is structural wiring built once when a rig is bound. Bones and
//! reference points hold `TransformId` handles into a `TransformStore`
//! instead of owning their transforms, so two hands can share a rig and
//! a rebind never copies pose data.

use std::fmt;

use crate::error::PoseError;

// ── Transforms ─────────────────────────────────────────────

/// Handle to a transform in a `TransformStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransformId(pub usize);

impl fmt::Display for TransformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial state of a single joint or reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointTransform {
    /// Position in meters (x, y, z), rig or world space.
    pub position: [f32; 3],
    /// Rotation relative to the parent joint, quaternion (x, y, z, w).
    pub local_rotation: [f32; 4],
}

impl Default for JointTransform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            local_rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl JointTransform {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            ..Self::default()
        }
    }
}

/// Arena of transforms written by the tracking source each frame.
#[derive(Debug, Clone, Default)]
pub struct TransformStore {
    transforms: Vec<JointTransform>,
}

impl TransformStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transform and return its handle.
    pub fn insert(&mut self, transform: JointTransform) -> TransformId {
        self.transforms.push(transform);
        TransformId(self.transforms.len() - 1)
    }

    pub fn contains(&self, id: TransformId) -> bool {
        id.0 < self.transforms.len()
    }

    pub fn get(&self, id: TransformId) -> Result<&JointTransform, PoseError> {
        self.transforms
            .get(id.0)
            .ok_or(PoseError::UnknownTransform(id))
    }

    pub fn position(&self, id: TransformId) -> Result<[f32; 3], PoseError> {
        self.get(id).map(|t| t.position)
    }

    /// Overwrite a transform in place.
    pub fn set(&mut self, id: TransformId, transform: JointTransform) -> Result<(), PoseError> {
        let slot = self
            .transforms
            .get_mut(id.0)
            .ok_or(PoseError::UnknownTransform(id))?;
        *slot = transform;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

// ── Bones ──────────────────────────────────────────────────

/// Where a bone's pose comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoneKind {
    /// Written directly by the tracking device.
    Tracked,
    /// Procedurally driven from other bones (physics, IK, retargeting).
    Driven,
}

impl BoneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tracked => "tracked",
            Self::Driven => "driven",
        }
    }
}

/// A named joint of the hand rig.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneModel {
    pub name: String,
    pub transform: TransformId,
    pub kind: BoneKind,
}

impl BoneModel {
    pub fn tracked(name: impl Into<String>, transform: TransformId) -> Self {
        Self {
            name: name.into(),
            transform,
            kind: BoneKind::Tracked,
        }
    }

    pub fn driven(name: impl Into<String>, transform: TransformId) -> Self {
        Self {
            name: name.into(),
            transform,
            kind: BoneKind::Driven,
        }
    }

    pub fn is_driven(&self) -> bool {
        self.kind == BoneKind::Driven
    }
}

// ── Fingers ────────────────────────────────────────────────

/// The five fingers, in canonical traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FingerKind {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

/// Number of fingers per hand.
pub const FINGER_COUNT: usize = 5;

impl FingerKind {
    /// All fingers, thumb first.
    pub const ALL: [FingerKind; FINGER_COUNT] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Pinky,
    ];

    /// Fingers averaged by the hand-level aggregates.
    pub const NON_THUMB: [FingerKind; FINGER_COUNT - 1] =
        [Self::Index, Self::Middle, Self::Ring, Self::Pinky];

    /// Slot of this finger in `HandModel::fingers`.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_thumb(&self) -> bool {
        *self == Self::Thumb
    }

    /// String representation for IPC.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }
}

impl fmt::Display for FingerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finger: its bone chain plus the two reference points that bound
/// length measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerModel {
    pub kind: FingerKind,
    /// Bones ordered wrist-proximal to tip-distal.
    pub bones: Vec<BoneModel>,
    /// Where length measurement starts. Must be one of the bone transforms.
    pub base: TransformId,
    /// Where length measurement ends, just past the last bone.
    pub tip: TransformId,
}

impl FingerModel {
    /// Bone whose transform is the finger base, if wired correctly.
    pub fn base_bone(&self) -> Option<&BoneModel> {
        self.bones.iter().find(|b| b.transform == self.base)
    }

    fn validate(&self, slot: FingerKind, store: &TransformStore) -> Result<(), PoseError> {
        if self.kind != slot {
            return Err(PoseError::FingerSlotMismatch {
                slot,
                found: self.kind,
            });
        }
        if self.bones.is_empty() {
            return Err(PoseError::EmptyFinger(self.kind));
        }
        for bone in &self.bones {
            require(store, bone.transform)?;
        }
        require(store, self.base)?;
        require(store, self.tip)?;
        if self.base_bone().is_none() {
            return Err(PoseError::BaseNotInChain(self.kind));
        }
        Ok(())
    }
}

// ── Hands ──────────────────────────────────────────────────

/// Which hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to the render mesh skinned by a hand rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Reference into the body model that owns the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyBody {
    /// Shoulder joint used as the origin of the pointing ray.
    pub shoulder_tip: TransformId,
}

/// A bound hand rig.
#[derive(Debug, Clone, PartialEq)]
pub struct HandModel {
    pub side: Hand,
    pub wrist: BoneModel,
    pub forearm: BoneModel,
    /// Always thumb, index, middle, ring, pinky.
    pub fingers: [FingerModel; FINGER_COUNT],
    pub palm_center: TransformId,
    /// Outer end of the palm line used by fist detection.
    pub palm_exterior: TransformId,
    /// Inner end of the palm line used by fist detection.
    pub palm_interior: TransformId,
    pub pinch_center: TransformId,
    pub throat_center: TransformId,
    pub ray: TransformId,
    pub skinned_mesh: Option<MeshId>,
    pub proxy: Option<ProxyBody>,
}

impl HandModel {
    pub fn finger(&self, kind: FingerKind) -> &FingerModel {
        &self.fingers[kind.index()]
    }

    pub fn thumb(&self) -> &FingerModel {
        self.finger(FingerKind::Thumb)
    }

    pub fn index(&self) -> &FingerModel {
        self.finger(FingerKind::Index)
    }

    pub fn middle(&self) -> &FingerModel {
        self.finger(FingerKind::Middle)
    }

    pub fn ring(&self) -> &FingerModel {
        self.finger(FingerKind::Ring)
    }

    pub fn pinky(&self) -> &FingerModel {
        self.finger(FingerKind::Pinky)
    }

    /// Check the rig is wired the way the metrics expect.
    ///
    /// Every finger must sit in its canonical slot, own at least one bone,
    /// and have its base among its bone transforms. Every referenced
    /// transform must exist in `store`.
    pub fn validate(&self, store: &TransformStore) -> Result<(), PoseError> {
        require(store, self.wrist.transform)?;
        require(store, self.forearm.transform)?;
        for (slot, finger) in FingerKind::ALL.iter().zip(self.fingers.iter()) {
            finger.validate(*slot, store)?;
        }
        for id in [
            self.palm_center,
            self.palm_exterior,
            self.palm_interior,
            self.pinch_center,
            self.throat_center,
            self.ray,
        ] {
            require(store, id)?;
        }
        if let Some(proxy) = &self.proxy {
            require(store, proxy.shoulder_tip)?;
        }
        Ok(())
    }
}

fn require(store: &TransformStore, id: TransformId) -> Result<(), PoseError> {
    if store.contains(id) {
        Ok(())
    } else {
        Err(PoseError::UnknownTransform(id))
    }
}

// ── Test fixtures ──────────────────────────────────────────

/// Bones per finger in the test rig: knuckle stub, proximal, intermediate, distal.
#[cfg(test)]
pub(crate) const TEST_BONES_PER_FINGER: usize = 4;

/// Height of each bone joint along +Y in the straight test rig.
#[cfg(test)]
pub(crate) const TEST_JOINT_Y: [f32; TEST_BONES_PER_FINGER] = [0.02, 0.06, 0.09, 0.11];

/// Height of every fingertip in the straight test rig.
#[cfg(test)]
pub(crate) const TEST_TIP_Y: f32 = 0.13;

/// Lateral spacing between fingers in the test rig.
#[cfg(test)]
pub(crate) const TEST_FINGER_SPACING: f32 = 0.02;

/// Build a flat, fully extended hand: fingers are parallel lines along +Y,
/// spaced along X, with the base on the proximal bone.
#[cfg(test)]
pub(crate) fn test_rig(side: Hand) -> (TransformStore, HandModel) {
    let mut store = TransformStore::new();
    let wrist = BoneModel::tracked("wrist", store.insert(JointTransform::at(0.0, 0.0, 0.0)));
    let forearm = BoneModel::driven("forearm", store.insert(JointTransform::at(0.0, -0.1, 0.0)));

    let fingers = FingerKind::ALL.map(|kind| {
        let x = kind.index() as f32 * TEST_FINGER_SPACING;
        let bones: Vec<BoneModel> = TEST_JOINT_Y
            .iter()
            .enumerate()
            .map(|(i, y)| {
                let id = store.insert(JointTransform::at(x, *y, 0.0));
                let name = format!("{}{}", kind.as_str(), i);
                if i == 0 {
                    BoneModel::driven(name, id)
                } else {
                    BoneModel::tracked(name, id)
                }
            })
            .collect();
        let base = bones[1].transform;
        let tip = store.insert(JointTransform::at(x, TEST_TIP_Y, 0.0));
        FingerModel {
            kind,
            bones,
            base,
            tip,
        }
    });

    let palm_center = store.insert(JointTransform::at(0.04, 0.03, 0.0));
    let palm_exterior = store.insert(JointTransform::at(-0.02, 0.03, 0.03));
    let palm_interior = store.insert(JointTransform::at(0.10, 0.03, 0.03));
    let pinch_center = store.insert(JointTransform::at(0.01, 0.12, 0.02));
    let throat_center = store.insert(JointTransform::at(0.01, 0.05, 0.0));
    let ray = store.insert(JointTransform::at(0.04, 0.03, 0.05));
    let shoulder = store.insert(JointTransform::at(0.04, 0.03, -0.55));

    let hand = HandModel {
        side,
        wrist,
        forearm,
        fingers,
        palm_center,
        palm_exterior,
        palm_interior,
        pinch_center,
        throat_center,
        ray,
        skinned_mesh: Some(MeshId(1)),
        proxy: Some(ProxyBody {
            shoulder_tip: shoulder,
        }),
    };
    (store, hand)
}

// ── Tests ──────────────────────────────────────────────────
