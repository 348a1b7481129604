//! Engine Types
//!
//! Snapshot types consumed by the controller each tick. The host simulation
//! fills these in; the engine treats them as read-only.

pub mod orientation;
pub mod packet;

pub use orientation::{relative_location, Orientation};
pub use packet::{BallState, CarState, Physics, Rotator, TickPacket};

/// World-space vector in game units (uu). Z is up.
pub type Vec3 = nalgebra::Vector3<f32>;

/// Length of the XY projection (ignores height).
#[inline]
pub fn horizontal_length(v: &Vec3) -> f32 {
    (v.x * v.x + v.y * v.y).sqrt()
}
