//! Aerial decision helpers
//!
//! Eligibility is a plain conjunction of independent gates; the first gate
//! that fails is reported so the controller can log why it stayed on the
//! ground. The geometry helpers below it estimate pointing, reach time and
//! boost budget for the overlay.

use super::ball_prediction::BallPrediction;
use super::config::AerialConfig;
use super::types::{horizontal_length, CarState, Orientation, Physics, Rotator, TickPacket, Vec3};

/// Everything the aerial gates look at, pulled out of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AerialInputs {
    pub ball_height: f32,
    /// Car-to-ball distance on the XY plane.
    pub distance: f32,
    pub boost: f32,
    pub time_since_aerial: f32,
    pub is_super_sonic: bool,
    pub has_wheel_contact: bool,
}

impl AerialInputs {
    pub fn gather(car: &CarState, packet: &TickPacket, last_aerial_time: f32) -> Self {
        let ball = &packet.ball.physics.location;
        Self {
            ball_height: ball.z,
            distance: horizontal_length(&(ball - car.physics.location)),
            boost: car.boost,
            time_since_aerial: packet.seconds_elapsed - last_aerial_time,
            is_super_sonic: car.is_super_sonic,
            has_wheel_contact: car.has_wheel_contact,
        }
    }
}

/// First failing aerial gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AerialRejection {
    Disabled,
    BallTooLow,
    OutOfRange,
    LowBoost,
    Cooldown,
    Supersonic,
    Airborne,
}

pub fn aerial_rejection(inputs: &AerialInputs, cfg: &AerialConfig) -> Option<AerialRejection> {
    let ball_high = inputs.ball_height > cfg.min_ball_height;
    let in_range = cfg.min_distance < inputs.distance && inputs.distance < cfg.max_distance;
    let has_boost = inputs.boost > cfg.min_boost;
    let cooled_down = inputs.time_since_aerial > cfg.cooldown;

    if !cfg.enabled {
        Some(AerialRejection::Disabled)
    } else if !ball_high {
        Some(AerialRejection::BallTooLow)
    } else if !in_range {
        Some(AerialRejection::OutOfRange)
    } else if !has_boost {
        Some(AerialRejection::LowBoost)
    } else if !cooled_down {
        Some(AerialRejection::Cooldown)
    } else if inputs.is_super_sonic {
        Some(AerialRejection::Supersonic)
    } else if !inputs.has_wheel_contact {
        Some(AerialRejection::Airborne)
    } else {
        None
    }
}

pub fn is_aerial_eligible(inputs: &AerialInputs, cfg: &AerialConfig) -> bool {
    aerial_rejection(inputs, cfg).is_none()
}

/// Seconds ahead to look for the intercept: grows with distance, capped.
pub fn aerial_lookahead(distance: f32, cfg: &AerialConfig) -> f32 {
    (cfg.base_lookahead + distance / cfg.lookahead_distance_scale).min(cfg.max_lookahead)
}

/// Predicted ball position worth jumping for, if any.
pub fn find_aerial_target(
    prediction: &BallPrediction,
    now: f32,
    distance: f32,
    cfg: &AerialConfig,
) -> Option<Vec3> {
    let slice = prediction.sample_at(now + aerial_lookahead(distance, cfg))?;
    (slice.location.z > cfg.min_target_height).then_some(slice.location)
}

/// Pitch/yaw stick values that point the nose at `target`. Roll stays level.
///
/// Axes come from the roll-aware [`Orientation`], so positive yaw turns
/// toward the car's right (+Y at identity), the same sign convention as
/// [`steer_toward_target`](super::steering::steer_toward_target).
pub fn aerial_to_target(physics: &Physics, target: &Vec3) -> (f32, f32, f32) {
    let to_target = target - physics.location;
    let distance = to_target.norm();
    if distance == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let dir = to_target / distance;
    let orientation = Orientation::from_rotator(&physics.rotation);
    (dir.dot(&orientation.up), dir.dot(&orientation.right), 0.0)
}

/// Rough seconds to cover the distance. Below 100 uu/s the car is assumed
/// to boost up to 1000 uu/s.
pub fn time_to_reach(car_location: &Vec3, target: &Vec3, car_velocity: &Vec3) -> f32 {
    let distance = (target - car_location).norm();
    let mut speed = car_velocity.norm();
    if speed < 100.0 {
        speed = 1000.0;
    }
    distance / speed
}

pub fn facing_vector(rotation: &Rotator) -> Vec3 {
    Orientation::from_rotator(rotation).forward
}

/// Angle in radians; 0 when either vector is zero.
pub fn angle_between(a: &Vec3, b: &Vec3) -> f32 {
    let mag = a.norm() * b.norm();
    if mag == 0.0 {
        return 0.0;
    }
    (a.dot(b) / mag).clamp(-1.0, 1.0).acos()
}

pub fn is_facing_target(car: &CarState, target: &Vec3, max_angle: f32) -> bool {
    let facing = facing_vector(&car.physics.rotation);
    let to_target = target - car.physics.location;
    angle_between(&facing, &to_target) < max_angle
}

/// "About `boost_per_100_units` boost per 100 units of air travel".
pub fn has_boost_for_distance(distance: f32, boost: f32, boost_per_100_units: f32) -> bool {
    boost > distance / 100.0 * boost_per_100_units
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ball_prediction::PredictedSlice;
    use crate::engine::types::BallState;
    use std::f32::consts::FRAC_PI_2;

    fn qualifying() -> AerialInputs {
        AerialInputs {
            ball_height: 500.0,
            distance: 1000.0,
            boost: 70.0,
            time_since_aerial: 5.0,
            is_super_sonic: false,
            has_wheel_contact: true,
        }
    }

    #[test]
    fn test_reference_scenario_triggers() {
        let cfg = AerialConfig::default();
        assert!(is_aerial_eligible(&qualifying(), &cfg));
        let lookahead = aerial_lookahead(1000.0, &cfg);
        assert!((lookahead - (0.5 + 1000.0 / 1500.0)).abs() < 1e-5);
        assert!((lookahead - 1.1667).abs() < 1e-3);
    }

    #[test]
    fn test_boost_38_still_triggers() {
        let inputs = AerialInputs { boost: 38.0, ..qualifying() };
        assert!(is_aerial_eligible(&inputs, &AerialConfig::default()));
        let at_threshold = AerialInputs { boost: 35.0, ..qualifying() };
        assert_eq!(
            aerial_rejection(&at_threshold, &AerialConfig::default()),
            Some(AerialRejection::LowBoost)
        );
    }

    #[test]
    fn test_each_gate_flips_eligibility() {
        let cfg = AerialConfig::default();
        let base = qualifying();
        let cases = [
            (AerialInputs { ball_height: 350.0, ..base }, AerialRejection::BallTooLow),
            (AerialInputs { distance: 400.0, ..base }, AerialRejection::OutOfRange),
            (AerialInputs { distance: 2200.0, ..base }, AerialRejection::OutOfRange),
            (AerialInputs { boost: 20.0, ..base }, AerialRejection::LowBoost),
            (AerialInputs { time_since_aerial: 3.0, ..base }, AerialRejection::Cooldown),
            (AerialInputs { is_super_sonic: true, ..base }, AerialRejection::Supersonic),
            (AerialInputs { has_wheel_contact: false, ..base }, AerialRejection::Airborne),
        ];
        for (inputs, expected) in cases {
            assert!(!is_aerial_eligible(&inputs, &cfg));
            assert_eq!(aerial_rejection(&inputs, &cfg), Some(expected));
        }
        let disabled = AerialConfig { enabled: false, ..AerialConfig::default() };
        assert_eq!(aerial_rejection(&base, &disabled), Some(AerialRejection::Disabled));
    }

    #[test]
    fn test_lookahead_is_capped() {
        let cfg = AerialConfig::default();
        assert_eq!(aerial_lookahead(10_000.0, &cfg), 2.5);
        assert_eq!(aerial_lookahead(0.0, &cfg), 0.5);
    }

    #[test]
    fn test_gather_uses_horizontal_distance() {
        let car = CarState { boost: 70.0, ..CarState::default() };
        let packet = TickPacket {
            seconds_elapsed: 10.0,
            cars: vec![car],
            ball: BallState { physics: Physics::at(Vec3::new(600.0, 800.0, 500.0)) },
        };
        let inputs = AerialInputs::gather(&car, &packet, 5.0);
        assert!((inputs.distance - 1000.0).abs() < 1e-3);
        assert_eq!(inputs.ball_height, 500.0);
        assert_eq!(inputs.time_since_aerial, 5.0);
        assert_eq!(inputs, qualifying());
    }

    #[test]
    fn test_find_aerial_target() {
        let cfg = AerialConfig::default();
        let slices: Vec<PredictedSlice> = (0..360)
            .map(|i| {
                let t = 20.0 + i as f32 / 60.0;
                let height = 300.0 + 100.0 * (t - 20.0);
                PredictedSlice::new(t, Vec3::new(0.0, 0.0, height), Vec3::zeros())
            })
            .collect();
        let prediction = BallPrediction::new(slices);

        // 1.17s ahead the ball is at ~417 > 400
        let target = find_aerial_target(&prediction, 20.0, 1000.0, &cfg).unwrap();
        assert!(target.z > 400.0);

        // Close range: 0.77s ahead the ball is only ~377
        assert!(find_aerial_target(&prediction, 20.0, 400.0, &cfg).is_none());

        // Past the horizon
        assert!(find_aerial_target(&prediction, 30.0, 1000.0, &cfg).is_none());
    }

    #[test]
    fn test_aerial_to_target_axes() {
        let physics = Physics::default();
        let (pitch, yaw, roll) = aerial_to_target(&physics, &Vec3::new(0.0, 0.0, 100.0));
        assert!((pitch - 1.0).abs() < 1e-5);
        assert!(yaw.abs() < 1e-5);
        assert_eq!(roll, 0.0);

        let (pitch, yaw, _) = aerial_to_target(&physics, &Vec3::new(0.0, 100.0, 0.0));
        assert!(pitch.abs() < 1e-5);
        assert!((yaw - 1.0).abs() < 1e-5);

        assert_eq!(aerial_to_target(&physics, &Vec3::zeros()), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_time_to_reach_assumes_boost_when_slow() {
        let target = Vec3::new(2000.0, 0.0, 0.0);
        let t = time_to_reach(&Vec3::zeros(), &target, &Vec3::new(50.0, 0.0, 0.0));
        assert!((t - 2.0).abs() < 1e-5);
        let t = time_to_reach(&Vec3::zeros(), &target, &Vec3::new(500.0, 0.0, 0.0));
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_angles_and_facing() {
        assert_eq!(angle_between(&Vec3::zeros(), &Vec3::x()), 0.0);
        assert!((angle_between(&Vec3::x(), &Vec3::y()) - FRAC_PI_2).abs() < 1e-5);

        let car = CarState::default();
        assert!(is_facing_target(&car, &Vec3::new(1000.0, 100.0, 0.0), 0.5));
        assert!(!is_facing_target(&car, &Vec3::new(0.0, 1000.0, 0.0), 0.5));
        assert!((facing_vector(&Rotator::new(0.0, FRAC_PI_2, 0.0)) - Vec3::y()).norm() < 1e-5);
    }

    #[test]
    fn test_boost_budget_heuristic() {
        assert!(has_boost_for_distance(500.0, 60.0, 10.0));
        assert!(!has_boost_for_distance(500.0, 50.0, 10.0));
    }
}
