//! Steering helper for default driving.

use super::types::{relative_location, CarState, Orientation, Vec3};

/// Proportional steer toward `target`: heading error (radians) times
/// `gain`, clamped to [-1, 1]. Positive steers right.
pub fn steer_toward_target(car: &CarState, target: &Vec3, gain: f32) -> f32 {
    let orientation = Orientation::from_rotator(&car.physics.rotation);
    let local = relative_location(&car.physics.location, &orientation, target);
    let angle = local.y.atan2(local.x);
    (angle * gain).clamp(-1.0, 1.0)
}
