//! Euler degrees ↔ unit quaternion under an explicit axis order.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Axis composition order for Euler angles, named outermost first.
///
/// `Zyx` builds `Rz · Ry · Rx`. Export and import must use the same order or
/// every rotated bone comes back wrong.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationOrder {
    /// `Rx · Ry · Rz`.
    Xyz,
    /// `Rx · Rz · Ry`.
    Xzy,
    /// `Ry · Rx · Rz`.
    Yxz,
    /// `Ry · Rz · Rx`.
    Yzx,
    /// `Rz · Rx · Ry`.
    Zxy,
    /// `Rz · Ry · Rx`.
    #[default]
    Zyx,
}

/// The order used everywhere unless configured otherwise.
pub const ROTATION_ORDER: RotationOrder = RotationOrder::Zyx;

impl RotationOrder {
    fn euler_rot(self) -> EulerRot {
        match self {
            Self::Xyz => EulerRot::XYZ,
            Self::Xzy => EulerRot::XZY,
            Self::Yxz => EulerRot::YXZ,
            Self::Yzx => EulerRot::YZX,
            Self::Zxy => EulerRot::ZXY,
            Self::Zyx => EulerRot::ZYX,
        }
    }

    /// Component indices (0=X, 1=Y, 2=Z) in composition order.
    fn axes(self) -> [usize; 3] {
        match self {
            Self::Xyz => [0, 1, 2],
            Self::Xzy => [0, 2, 1],
            Self::Yxz => [1, 0, 2],
            Self::Yzx => [1, 2, 0],
            Self::Zxy => [2, 0, 1],
            Self::Zyx => [2, 1, 0],
        }
    }
}

/// Converts per-axis Euler degrees `(x, y, z)` to a unit quaternion.
pub fn euler_to_quat(degrees: Vec3, order: RotationOrder) -> Quat {
    let [a, b, c] = order.axes();
    Quat::from_euler(
        order.euler_rot(),
        degrees[a].to_radians(),
        degrees[b].to_radians(),
        degrees[c].to_radians(),
    )
}

/// Converts a quaternion back to per-axis Euler degrees `(x, y, z)`.
///
/// The quaternion is normalized first. The middle axis comes back in
/// `[-90, 90]`, the others in `[-180, 180]`.
pub fn quat_to_euler(rotation: Quat, order: RotationOrder) -> Vec3 {
    let (ra, rb, rc) = rotation.normalize().to_euler(order.euler_rot());
    let [a, b, c] = order.axes();
    let mut degrees = Vec3::ZERO;
    degrees[a] = ra.to_degrees();
    degrees[b] = rb.to_degrees();
    degrees[c] = rc.to_degrees();
    degrees
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f32) {
        assert!(a.abs_diff_eq(b, eps), "{a} != {b} (eps {eps})");
    }

    fn assert_same_rotation(a: Quat, b: Quat) {
        // q and -q encode the same rotation.
        assert!(a.dot(b).abs() > 1.0 - 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_zero_is_identity() {
        for order in [RotationOrder::Zyx, RotationOrder::Xyz, RotationOrder::Yxz] {
            assert_same_rotation(euler_to_quat(Vec3::ZERO, order), Quat::IDENTITY);
        }
    }

    #[test]
    fn test_single_axis() {
        let q = euler_to_quat(Vec3::new(0.0, 0.0, 90.0), ROTATION_ORDER);
        assert_same_rotation(q, Quat::from_rotation_z(90f32.to_radians()));
        let q = euler_to_quat(Vec3::new(30.0, 0.0, 0.0), ROTATION_ORDER);
        assert_same_rotation(q, Quat::from_rotation_x(30f32.to_radians()));
    }

    #[test]
    fn test_zyx_composes_z_then_y_then_x() {
        let q = euler_to_quat(Vec3::new(30.0, 20.0, 10.0), RotationOrder::Zyx);
        let expected = Quat::from_rotation_z(10f32.to_radians())
            * Quat::from_rotation_y(20f32.to_radians())
            * Quat::from_rotation_x(30f32.to_radians());
        assert_same_rotation(q, expected);
    }

    #[test]
    fn test_orders_disagree_on_compound_rotation() {
        let angles = Vec3::new(30.0, 45.0, 60.0);
        let zyx = euler_to_quat(angles, RotationOrder::Zyx);
        let xyz = euler_to_quat(angles, RotationOrder::Xyz);
        assert!(zyx.dot(xyz).abs() < 0.999);
    }

    #[test]
    fn test_roundtrip_every_order() {
        let samples = [
            Vec3::new(30.0, 0.0, 0.0),
            Vec3::new(10.0, 20.0, 30.0),
            Vec3::new(-45.0, 60.0, 75.0),
            Vec3::new(80.0, -70.0, -15.0),
        ];
        let orders = [
            RotationOrder::Xyz,
            RotationOrder::Xzy,
            RotationOrder::Yxz,
            RotationOrder::Yzx,
            RotationOrder::Zxy,
            RotationOrder::Zyx,
        ];
        for order in orders {
            for angles in samples {
                let back = quat_to_euler(euler_to_quat(angles, order), order);
                assert_vec_close(back, angles, 1e-2);
            }
        }
    }

    #[test]
    fn test_roundtrip_wide_outer_angles() {
        // Only the middle axis is limited to [-90, 90].
        for angles in [Vec3::new(150.0, -80.0, 170.0), Vec3::new(-179.0, 5.0, 120.0)] {
            let back = quat_to_euler(euler_to_quat(angles, ROTATION_ORDER), ROTATION_ORDER);
            assert_vec_close(back, angles, 1e-2);
        }
    }

    #[test]
    fn test_unnormalized_input_accepted() {
        let q = euler_to_quat(Vec3::new(0.0, 40.0, 0.0), ROTATION_ORDER) * 3.0;
        assert_vec_close(quat_to_euler(q, ROTATION_ORDER), Vec3::new(0.0, 40.0, 0.0), 1e-3);
    }

    #[test]
    fn test_order_serde_names() {
        assert_eq!(serde_json::to_string(&RotationOrder::Zyx).unwrap(), "\"zyx\"");
        let order: RotationOrder = serde_json::from_str("\"xyz\"").unwrap();
        assert_eq!(order, RotationOrder::Xyz);
    }
}
