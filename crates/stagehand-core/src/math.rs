//! Ground-plane facing math for characters that turn about the Y axis

use glam::Vec3;

/// Project a vector onto the ground plane and normalize it.
///
/// Returns `Vec3::ZERO` when the horizontal component is (near) zero, so the
/// caller can skip facing updates for degenerate directions.
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Yaw angle (radians) of a ground-plane direction.
pub fn yaw_from_direction(direction: Vec3) -> f32 {
    direction.z.atan2(direction.x)
}

/// Ground-plane unit direction for a yaw angle.
pub fn direction_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, yaw.sin())
}

/// Signed shortest angular difference from `from` to `to`, in (-PI, PI].
pub fn angle_difference(from: f32, to: f32) -> f32 {
    let mut diff = (to - from) % std::f32::consts::TAU;
    if diff > std::f32::consts::PI {
        diff -= std::f32::consts::TAU;
    } else if diff <= -std::f32::consts::PI {
        diff += std::f32::consts::TAU;
    }
    diff
}

/// Step `current` toward `target` along the shortest arc, moving at most
/// `max_step` radians. Never overshoots.
pub fn rotate_yaw_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let diff = angle_difference(current, target);
    if diff.abs() <= max_step {
        target
    } else {
        current + max_step.copysign(diff)
    }
}
