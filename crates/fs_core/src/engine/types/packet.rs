//! Tick snapshot
//!
//! Mirrors the subset of the host game packet the controller reads: car and
//! ball physics, boost reserve, contact flags and the game clock.

use super::Vec3;
use serde::{Deserialize, Serialize};

/// Euler rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    pub location: Vec3,
    pub velocity: Vec3,
    pub rotation: Rotator,
}

impl Default for Physics {
    fn default() -> Self {
        Self { location: Vec3::zeros(), velocity: Vec3::zeros(), rotation: Rotator::default() }
    }
}

impl Physics {
    pub fn at(location: Vec3) -> Self {
        Self { location, ..Self::default() }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarState {
    pub physics: Physics,
    /// Boost reserve, 0..=100.
    pub boost: f32,
    pub has_wheel_contact: bool,
    pub is_super_sonic: bool,
}

impl Default for CarState {
    fn default() -> Self {
        Self {
            physics: Physics::default(),
            boost: 33.0,
            has_wheel_contact: true,
            is_super_sonic: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BallState {
    pub physics: Physics,
}

/// One simulation tick as seen by the agent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TickPacket {
    /// Monotonic game clock in seconds.
    pub seconds_elapsed: f32,
    pub cars: Vec<CarState>,
    pub ball: BallState,
}

impl TickPacket {
    pub fn car(&self, index: usize) -> Option<&CarState> {
        self.cars.get(index)
    }
}
