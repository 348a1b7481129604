//! Car orientation axes
//!
//! Unreal-style left-handed frame: X forward, Y right, Z up at zero rotation.

use super::{Rotator, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Orientation {
    pub fn from_rotator(rotation: &Rotator) -> Self {
        let (sp, cp) = rotation.pitch.sin_cos();
        let (sy, cy) = rotation.yaw.sin_cos();
        let (sr, cr) = rotation.roll.sin_cos();

        Self {
            forward: Vec3::new(cp * cy, cp * sy, sp),
            right: Vec3::new(cy * sp * sr - cr * sy, sy * sp * sr + cr * cy, -cp * sr),
            up: Vec3::new(-cr * cy * sp - sr * sy, -cr * sy * sp + sr * cy, cp * cr),
        }
    }
}

/// Express `target` in the local frame centered at `center`:
/// x = ahead, y = to the right, z = above.
pub fn relative_location(center: &Vec3, orientation: &Orientation, target: &Vec3) -> Vec3 {
    let offset = target - center;
    Vec3::new(
        offset.dot(&orientation.forward),
        offset.dot(&orientation.right),
        offset.dot(&orientation.up),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: &Vec3, b: &Vec3) -> bool {
        (a - b).norm() < 1e-4
    }

    #[test]
    fn test_identity_axes() {
        let o = Orientation::from_rotator(&Rotator::default());
        assert!(approx(&o.forward, &Vec3::x()));
        assert!(approx(&o.right, &Vec3::y()));
        assert!(approx(&o.up, &Vec3::z()));
    }

    #[test]
    fn test_yaw_quarter_turn() {
        let o = Orientation::from_rotator(&Rotator::new(0.0, FRAC_PI_2, 0.0));
        assert!(approx(&o.forward, &Vec3::y()));
        assert!(approx(&o.right, &-Vec3::x()));
    }

    #[test]
    fn test_relative_location() {
        let o = Orientation::from_rotator(&Rotator::default());
        let local = relative_location(
            &Vec3::new(100.0, 0.0, 0.0),
            &o,
            &Vec3::new(100.0, 50.0, 10.0),
        );
        assert!(approx(&local, &Vec3::new(0.0, 50.0, 10.0)));
    }
}
