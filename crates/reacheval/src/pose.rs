//! Rigid end-effector poses and their matrix/quaternion views.
//!
//! Purpose
//! - One pose representation (`nalgebra::Isometry3`) shared by the sampler,
//!   the evaluator, and the robot models.
//! - Conversions to the 4×4 homogeneous form used for persisted pose sets,
//!   and to the (position, quaternion) pair solvers consume.

use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion};

/// Rigid transform in 3D: rotation plus translation.
pub type Pose = Isometry3<f64>;

/// Row-major 4×4 homogeneous matrix, the serialized form of a pose.
pub type Mat4 = [[f64; 4]; 4];

/// Tolerance for accepting a rotation block as orthonormal with det +1.
pub const ROT_EPS: f64 = 1e-6;

/// Serialize a pose as a homogeneous matrix (rotation upper-left, translation
/// upper-right, bottom row `[0, 0, 0, 1]`).
pub fn pose_to_mat4(pose: &Pose) -> Mat4 {
    let h = pose.to_homogeneous();
    let mut out = [[0.0; 4]; 4];
    for (row, out_row) in out.iter_mut().enumerate() {
        for (col, v) in out_row.iter_mut().enumerate() {
            *v = h[(row, col)];
        }
    }
    out
}

/// Rebuild a pose from a homogeneous matrix.
///
/// Returns `None` if the bottom row is not `[0, 0, 0, 1]` or the rotation
/// block is not orthonormal with determinant +1 (within `ROT_EPS`).
pub fn mat4_to_pose(m: &Mat4) -> Option<Pose> {
    let bottom_ok = m[3][0].abs() <= ROT_EPS
        && m[3][1].abs() <= ROT_EPS
        && m[3][2].abs() <= ROT_EPS
        && (m[3][3] - 1.0).abs() <= ROT_EPS;
    if !bottom_ok {
        return None;
    }
    let rot = Matrix3::new(
        m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
    );
    if !is_rotation(&rot) {
        return None;
    }
    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rot));
    let translation = Translation3::new(m[0][3], m[1][3], m[2][3]);
    Some(Pose::from_parts(translation, rotation))
}

/// Split a pose into the (position, orientation) pair IK solvers consume.
pub fn split_pose(pose: &Pose) -> (Point3<f64>, UnitQuaternion<f64>) {
    (Point3::from(pose.translation.vector), pose.rotation)
}

/// Orthonormality check: `RᵀR ≈ I` and `det R ≈ +1` within `ROT_EPS`.
pub fn is_rotation(m: &Matrix3<f64>) -> bool {
    if !m.iter().all(|v| v.is_finite()) {
        return false;
    }
    let gram = m.transpose() * m - Matrix3::identity();
    gram.abs().max() <= ROT_EPS && (m.determinant() - 1.0).abs() <= ROT_EPS
}
