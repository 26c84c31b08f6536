//! Conversions between the plain-array poses used at the client boundary and
//! the `nalgebra` isometries used inside the engine.
//!
//! Euler angles follow the URDF/Bullet convention: `[roll, pitch, yaw]` about
//! the fixed X, Y and Z axes, composed as `Rz(yaw) * Ry(pitch) * Rx(roll)`.

use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::{Isometry, Real, Vector};

use crate::types::Pose;

/// Quaternion `[x, y, z, w]` for the given roll/pitch/yaw angles.
#[must_use]
pub fn quaternion_from_euler(rpy: [f32; 3]) -> [f32; 4] {
    let q = UnitQuaternion::from_euler_angles(rpy[0], rpy[1], rpy[2]);
    [q.i, q.j, q.k, q.w]
}

/// Roll/pitch/yaw angles of a quaternion `[x, y, z, w]`.
///
/// The quaternion does not need to be normalized.
#[must_use]
pub fn euler_from_quaternion(q: [f32; 4]) -> [f32; 3] {
    let (roll, pitch, yaw) = unit_quaternion(q).euler_angles();
    [roll, pitch, yaw]
}

pub(crate) fn unit_quaternion(q: [f32; 4]) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q[3], q[0], q[1], q[2]))
}

/// Isometry for a URDF-style origin (`xyz` translation, `rpy` rotation).
#[must_use]
pub fn origin_to_isometry(xyz: [f32; 3], rpy: [f32; 3]) -> Isometry<Real> {
    Isometry::from_parts(
        Translation3::new(xyz[0], xyz[1], xyz[2]),
        UnitQuaternion::from_euler_angles(rpy[0], rpy[1], rpy[2]),
    )
}

#[must_use]
pub fn pose_to_isometry(pose: &Pose) -> Isometry<Real> {
    let p = pose.position;
    Isometry::from_parts(
        Translation3::new(p[0], p[1], p[2]),
        unit_quaternion(pose.orientation),
    )
}

#[must_use]
pub fn isometry_to_pose(iso: &Isometry<Real>) -> Pose {
    let t = iso.translation.vector;
    let q = iso.rotation;
    Pose::new([t.x, t.y, t.z], [q.i, q.j, q.k, q.w])
}

/// Rotation taking the local X axis onto `axis`.
///
/// Joint frames in the engine always move along or about their X axis, so a
/// URDF joint axis is expressed by rotating X onto it.
#[must_use]
pub fn x_axis_onto(axis: [f32; 3]) -> UnitQuaternion<Real> {
    let target = Vector::new(axis[0], axis[1], axis[2]);
    if target.norm_squared() <= f32::EPSILON {
        return UnitQuaternion::identity();
    }
    UnitQuaternion::rotation_between(&Vector::x(), &target).unwrap_or_else(|| {
        // X and the axis are antiparallel; any half turn orthogonal to X works.
        UnitQuaternion::from_axis_angle(&Vector::z_axis(), std::f32::consts::PI)
    })
}

pub(crate) fn vector(a: [f32; 3]) -> Vector<Real> {
    Vector::new(a[0], a[1], a[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(v: &Vector<Real>) -> [f32; 3] {
        [v.x, v.y, v.z]
    }

    fn close(a: &[f32], b: &[f32]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn zero_euler_is_identity_quaternion() {
        assert!(close(&quaternion_from_euler([0.0, 0.0, 0.0]), &[0.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn euler_survives_quaternion_conversion() {
        let rpy = [0.3, -0.2, 1.1];
        let q = quaternion_from_euler(rpy);
        assert!(close(&euler_from_quaternion(q), &rpy));
    }

    #[test]
    fn yaw_quarter_turn_matches_bullet() {
        // Bullet's getQuaternionFromEuler([0, 0, pi/2]) is (0, 0, 0.7071, 0.7071).
        let q = quaternion_from_euler([0.0, 0.0, std::f32::consts::FRAC_PI_2]);
        let h = std::f32::consts::FRAC_1_SQRT_2;
        assert!(close(&q, &[0.0, 0.0, h, h]));
    }

    #[test]
    fn x_axis_onto_maps_x_to_axis() {
        for axis in [[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]] {
            let r = x_axis_onto(axis);
            assert!(close(&array(&(r * Vector::x())), &axis), "axis {axis:?}");
        }
    }

    #[test]
    fn pose_isometry_conversion_keeps_values() {
        let pose = Pose::from_euler([1.0, 2.0, 3.0], [0.1, 0.2, 0.3]);
        let back = isometry_to_pose(&pose_to_isometry(&pose));
        assert!(close(&back.position, &pose.position));
        assert!(close(&back.orientation, &pose.orientation));
    }
}
