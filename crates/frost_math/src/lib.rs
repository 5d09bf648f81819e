//! # frost_math - Frostbite Math
//!
//! The handful of 3D primitives the simulation needs: vectors, rotations,
//! transforms and axis-aligned bounds, plus scalar helpers used by the
//! integrators (`move_towards`, `inverse_lerp`).
//!
//! Conventions: right-handed, Y up, local forward is -Z.

pub mod bounds;
pub mod quaternion;
pub mod transform;
pub mod vector;

pub use bounds::*;
pub use quaternion::*;
pub use transform::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Where `value` sits between `a` and `b`, clamped to `[0, 1]`
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < consts::EPSILON {
        return 1.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Step `current` toward `target` by at most `max_delta`, never overshooting.
///
/// A negative `max_delta` is treated as zero.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let max_delta = max_delta.max(0.0);
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + max_delta * diff.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_move_towards_never_overshoots() {
        assert_eq!(move_towards(36.5, 36.0, 1.0), 36.0);
        assert_relative_eq!(move_towards(37.0, 36.0, 0.25), 36.75);
        assert_relative_eq!(move_towards(35.0, 36.0, 0.25), 35.25);
        assert_eq!(move_towards(36.0, 36.0, 0.5), 36.0);
    }

    #[test]
    fn test_move_towards_zero_delta() {
        assert_eq!(move_towards(37.2, 36.0, 0.0), 37.2);
        assert_eq!(move_towards(37.2, 36.0, -1.0), 37.2);
    }

    #[test]
    fn test_inverse_lerp() {
        assert_relative_eq!(inverse_lerp(0.0, 2.0, 0.5), 0.25);
        assert_eq!(inverse_lerp(0.0, 2.0, 5.0), 1.0);
        assert_eq!(inverse_lerp(1.0, 1.0, 0.0), 1.0);
    }

    #[test]
    fn test_angle_conversion() {
        assert_relative_eq!(radians(180.0), consts::PI);
        assert_relative_eq!(degrees(consts::PI / 2.0), 90.0, epsilon = 1e-4);
    }
}
