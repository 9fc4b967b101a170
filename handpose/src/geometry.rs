//! Small vector helpers over `[f32; 3]` positions and `[f32; 4]` quaternions.
//!
//! Positions are plain arrays so they can be copied straight out of a
//! tracking runtime's joint buffers without conversion.

// ── Vectors ────────────────────────────────────────────────

pub fn sub(a: &[f32; 3], b: &[f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn add(a: &[f32; 3], b: &[f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn scaled(v: &[f32; 3], s: f32) -> [f32; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

pub fn dot(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn length(v: &[f32; 3]) -> f32 {
    dot(v, v).sqrt()
}

/// Euclidean distance between two points.
pub fn distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    length(&sub(b, a))
}

/// Unit vector in the direction of `v`, or the zero vector when `v` has no length.
pub fn normalized(v: &[f32; 3]) -> [f32; 3] {
    let len = length(v);
    if len <= f32::EPSILON {
        return [0.0; 3];
    }
    scaled(v, 1.0 / len)
}

/// Closest point to `point` on the finite segment `start..end`.
///
/// The projection parameter is clamped to the segment, so points that
/// project before `start` or past `end` snap to that endpoint. A
/// zero-length segment returns `start`.
pub fn nearest_point_on_segment(start: &[f32; 3], end: &[f32; 3], point: &[f32; 3]) -> [f32; 3] {
    let line = sub(end, start);
    let len = length(&line);
    if len <= f32::EPSILON {
        return *start;
    }
    let dir = scaled(&line, 1.0 / len);
    let d = dot(&sub(point, start), &dir).clamp(0.0, len);
    add(start, &scaled(&dir, d))
}

// ── Scalars ────────────────────────────────────────────────

/// Fraction of `value` between `a` and `b`, clamped to `[0, 1]`.
///
/// Works with reversed bounds (`a > b`): values at or below `b` give 1
/// and values at or above `a` give 0. Equal bounds give 0.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

// ── Rotations ──────────────────────────────────────────────

/// Z component of the euler decomposition of a local rotation, in degrees `[0, 360)`.
///
/// Uses the Z-then-X-then-Y convention of common game-engine rigs, where
/// the Z angle is `atan2(R10, R11)` of the rotation matrix.
pub fn local_euler_z_degrees(q: &[f32; 4]) -> f32 {
    let (qx, qy, qz, qw) = (q[0], q[1], q[2], q[3]);
    let r10 = 2.0 * (qx * qy + qw * qz);
    let r11 = 1.0 - 2.0 * (qx * qx + qz * qz);
    let deg = r10.atan2(r11).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if deg >= 360.0 {
        0.0
    } else {
        deg
    }
}

/// Quaternion for a rotation of `degrees` about the local Z axis.
#[cfg(test)]
pub(crate) fn z_rotation(degrees: f32) -> [f32; 4] {
    let half = degrees.to_radians() * 0.5;
    [0.0, 0.0, half.sin(), half.cos()]
}
