//! W/P/R orientation and pose conversions.
//!
//! W, P and R are rotations in degrees about the fixed X, Y and Z axes,
//! composed as `Rz(R) * Ry(P) * Rx(W)`. This is the roll/pitch/yaw order of
//! [`Rotation3::from_euler_angles`], with W as roll and R as yaw.

use nalgebra::{Isometry3, Rotation3, Translation3, UnitQuaternion};

use crate::Position;

/// Below this, `cos(P)` is treated as zero and R is pinned to 0.
const GIMBAL_EPSILON: f64 = 1e-9;

pub fn wpr_to_rotation(w: f64, p: f64, r: f64) -> Rotation3<f64> {
    Rotation3::from_euler_angles(w.to_radians(), p.to_radians(), r.to_radians())
}

/// Decompose a rotation into `(w, p, r)` degrees.
///
/// At P = ±90° only `W - R` (or `W + R`) is observable; the whole rotation is
/// then attributed to W and R is returned as exactly `0.0`.
pub fn rotation_to_wpr(rotation: &Rotation3<f64>) -> (f64, f64, f64) {
    let m = rotation.matrix();
    let sy = (m[(0, 0)] * m[(0, 0)] + m[(1, 0)] * m[(1, 0)]).sqrt();
    if sy < GIMBAL_EPSILON {
        let w = (-m[(1, 2)]).atan2(m[(1, 1)]);
        let p = (-m[(2, 0)]).atan2(sy);
        (w.to_degrees(), p.to_degrees(), 0.0)
    } else {
        let w = m[(2, 1)].atan2(m[(2, 2)]);
        let p = (-m[(2, 0)]).atan2(sy);
        let r = m[(1, 0)].atan2(m[(0, 0)]);
        (w.to_degrees(), p.to_degrees(), r.to_degrees())
    }
}

/// Position components are copied unscaled.
pub fn pose_to_isometry(pose: &Position) -> Isometry3<f64> {
    let rotation = wpr_to_rotation(pose.w, pose.p, pose.r);
    Isometry3::from_parts(
        Translation3::new(pose.x, pose.y, pose.z),
        UnitQuaternion::from_rotation_matrix(&rotation),
    )
}

pub fn isometry_to_pose(isometry: &Isometry3<f64>) -> Position {
    let (w, p, r) = rotation_to_wpr(&isometry.rotation.to_rotation_matrix());
    let t = &isometry.translation.vector;
    Position::new(t.x, t.y, t.z, w, p, r)
}

impl From<Position> for Isometry3<f64> {
    fn from(pose: Position) -> Self {
        pose_to_isometry(&pose)
    }
}

impl From<Isometry3<f64>> for Position {
    fn from(isometry: Isometry3<f64>) -> Self {
        isometry_to_pose(&isometry)
    }
}
