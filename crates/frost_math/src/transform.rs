//! Position + rotation of an entity

use crate::quaternion::Quat;
use crate::vector::Vec3;

/// Rigid transform (no scale; nothing in the simulation is scaled)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    #[inline]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Create from a position and a yaw in degrees
    #[inline]
    pub fn from_position_yaw(position: Vec3, yaw_deg: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_yaw_deg(yaw_deg),
        }
    }

    #[inline]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Forward direction (-Z in local space)
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Up direction (+Y in local space)
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Transform a local-space point into world space
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }

    /// Rotate about an axis through the transform's own origin
    pub fn rotate_around_axis(&mut self, axis: Vec3, angle: f32) {
        self.rotation = (Quat::from_axis_angle(axis, angle) * self.rotation).normalize();
    }

    /// Look toward a world-space point, keeping the rotation level (yaw only)
    pub fn look_at_flat(&mut self, target: Vec3) {
        let to = target - self.position;
        if to.x.abs() < 1e-6 && to.z.abs() < 1e-6 {
            return;
        }
        // forward is -Z, so yaw = atan2(-x, -z)
        let yaw = (-to.x).atan2(-to.z);
        self.rotation = Quat::from_rotation_y(yaw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_forward() {
        let t = Transform::IDENTITY;
        assert_eq!(t.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn test_yaw_forward() {
        // +90 degrees about Y turns -Z into -X
        let t = Transform::from_position_yaw(Vec3::ZERO, 90.0);
        assert!((t.forward() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_look_at_flat() {
        let mut t = Transform::from_position(Vec3::new(1.0, 0.0, 1.0));
        t.look_at_flat(Vec3::new(6.0, 3.0, 1.0));
        assert!((t.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_rotate_around_up() {
        let mut t = Transform::IDENTITY;
        t.rotate_around_axis(Vec3::Y, core::f32::consts::PI);
        assert!((t.forward() - Vec3::Z).length() < 1e-5);
    }
}
